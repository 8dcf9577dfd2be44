use crate::config::ReferenceTables;
use crate::models::candidate::{EmailCandidate, LeadCandidate};
use crate::models::verdict::{ExclusionReason, LeadVerdict, Verdict};
use crate::validation::dns::DomainResolver;
use crate::validation::reputation::{self, RegistrationLookup};
use crate::validation::{provider, scoring, syntax};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::debug;

/// Sequences every check for a candidate and renders the final verdict.
///
/// The network-facing collaborators sit behind [`DomainResolver`] and
/// [`RegistrationLookup`], so everything from the provider gates to the
/// inclusion decision runs against deterministic fakes in tests.
#[derive(Clone)]
pub struct ValidationPipeline {
    resolver: Arc<dyn DomainResolver>,
    registration: Arc<dyn RegistrationLookup>,
    tables: Arc<ReferenceTables>,
}

impl ValidationPipeline {
    pub fn new(
        resolver: Arc<dyn DomainResolver>,
        registration: Arc<dyn RegistrationLookup>,
        tables: Arc<ReferenceTables>,
    ) -> Self {
        Self {
            resolver,
            registration,
            tables,
        }
    }

    /// Runs the full check sequence. Each stage can terminate the run with
    /// an exclusion reason; no stage ever returns an error, so one bad
    /// candidate cannot abort a batch.
    ///
    /// Stage order: syntax, provider gates (free, disposable), DNS
    /// existence, reputation, scoring, inclusion decision. Role-based does
    /// not short-circuit at the provider stage; it only penalizes the
    /// score and gates inclusion at the end.
    pub async fn evaluate(&self, candidate: &EmailCandidate) -> Verdict {
        let mut verdict = Verdict::pending(candidate.email.clone());

        // 1. Syntax: nothing else runs for a malformed address.
        let Some(normalized) = syntax::normalize(&candidate.email) else {
            verdict.exclusion_reason = Some(ExclusionReason::InvalidSyntax);
            return verdict;
        };
        verdict.checks.syntax = true;
        verdict.normalized_email = Some(normalized.clone());

        // 2. Provider signals, all three up front.
        let providers = provider::classify(&normalized, &self.tables);
        verdict.checks.free_provider = providers.free;
        verdict.checks.disposable = providers.disposable;
        verdict.checks.role_based = providers.role_based;

        if providers.free {
            verdict.exclusion_reason = Some(ExclusionReason::FreeProvider);
            return verdict;
        }
        if providers.disposable {
            verdict.exclusion_reason = Some(ExclusionReason::DisposableProvider);
            return verdict;
        }

        // Re-split with the quote-aware parser: a quoted local part may
        // itself contain `@`, so a naive split would hand DNS the wrong
        // string. Normalization guarantees this parse succeeds.
        let domain = match syntax::parse(&normalized) {
            Some(parsed) => parsed.domain.to_string(),
            None => {
                verdict.exclusion_reason = Some(ExclusionReason::InvalidSyntax);
                return verdict;
            }
        };

        // 3. DNS existence and mail routing.
        let dns = self.resolver.resolve(&domain).await;
        verdict.checks.domain_exists = dns.exists;
        verdict.checks.has_mx = dns.has_mx;
        verdict.domain_info.dns = Some(dns.clone());

        if !dns.exists {
            verdict.exclusion_reason = Some(ExclusionReason::DomainNotFound);
            return verdict;
        }

        // 4. Reputation; unknown age degrades gracefully.
        let age = self.registration.lookup_age(&domain).await;
        let findings = reputation::classify_age(age);
        verdict.domain_info.reputation = Some(findings.clone());

        // 5. Scoring always runs once the domain exists.
        let result = scoring::score(
            &normalized,
            &candidate.expected_domain,
            candidate.source_url.as_deref(),
            &providers,
            &dns,
            &findings,
        );
        verdict.confidence = result.confidence;
        verdict.confidence_score = result.score;
        verdict.factors = result.factors;
        verdict.valid = true;

        // 6. Inclusion: High confidence, published source, MX routing and
        // a personal (non-role) address, all at once. The first failing
        // condition, in that order, becomes the reason.
        use crate::models::verdict::Confidence;
        if verdict.confidence == Confidence::High
            && candidate.source_url.is_some()
            && verdict.checks.has_mx
            && !providers.role_based
        {
            verdict.should_include = true;
        } else if verdict.confidence != Confidence::High {
            verdict.exclusion_reason = Some(ExclusionReason::LowConfidence);
        } else if candidate.source_url.is_none() {
            verdict.exclusion_reason = Some(ExclusionReason::NoSource);
        } else if !verdict.checks.has_mx {
            verdict.exclusion_reason = Some(ExclusionReason::NoMxRecords);
        } else {
            verdict.exclusion_reason = Some(ExclusionReason::RoleBasedAddress);
        }

        debug!(
            email = %candidate.email,
            score = verdict.confidence_score,
            include = verdict.should_include,
            "candidate evaluated"
        );
        verdict
    }

    /// Evaluates one lead and re-attaches its pass-through metadata.
    pub async fn evaluate_lead(&self, lead: LeadCandidate) -> LeadVerdict {
        let verdict = self.evaluate(&lead.candidate()).await;
        LeadVerdict {
            verdict,
            company: lead.company,
            person: lead.person,
            role: lead.role,
        }
    }

    /// Evaluates a batch with bounded concurrency, preserving input order.
    /// Candidates share no state, so the only coordination is the worker
    /// limit itself.
    pub async fn evaluate_batch(
        &self,
        leads: Vec<LeadCandidate>,
        concurrency: usize,
    ) -> Vec<LeadVerdict> {
        stream::iter(leads)
            .map(|lead| self.evaluate_lead(lead))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

/// Keeps only the verdicts that made the inclusion cut, preserving order.
pub fn filter_includable(verdicts: Vec<LeadVerdict>) -> Vec<LeadVerdict> {
    verdicts
        .into_iter()
        .filter(|v| v.verdict.should_include)
        .collect()
}
