use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    proto::op::ResponseCode,
    proto::rr::RecordType,
};
use utoipa::ToSchema;

/// Outcome of one DNS resolution attempt for a domain. All failures are
/// captured here rather than returned as errors: a DNS hiccup on one
/// candidate must not abort a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DnsFindings {
    pub exists: bool,
    pub has_a: bool,
    pub has_mx: bool,
    pub mx_records: Vec<String>,
    pub error: Option<String>,
}

/// Capability: resolve a domain's address and mail-exchange records.
/// Narrow by design so pipeline tests run on deterministic fakes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainResolver: Send + Sync {
    async fn resolve(&self, domain: &str) -> DnsFindings;
}

/// Production resolver on top of trust-dns with a bounded per-query
/// timeout, so a single slow domain cannot stall a batch.
pub struct TrustDnsResolver {
    resolver: TokioAsyncResolver,
}

impl TrustDnsResolver {
    pub fn new(timeout: Duration, attempts: usize) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = attempts;

        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
        }
    }
}

#[async_trait]
impl DomainResolver for TrustDnsResolver {
    /// 1. A lookup; "no record" falls back to AAAA; any hard failure
    ///    records an error and stops (MX is pointless without existence).
    /// 2. Once existence is confirmed, MX; "no record" is not an error
    ///    there (RFC 5321 allows falling back to the A record), while a
    ///    hard failure records an error without invalidating existence.
    async fn resolve(&self, domain: &str) -> DnsFindings {
        let mut findings = DnsFindings::default();

        match self.resolver.lookup(domain, RecordType::A).await {
            Ok(_) => {
                findings.has_a = true;
                findings.exists = true;
            }
            Err(e) if is_no_records(&e) => {
                if self.resolver.lookup(domain, RecordType::AAAA).await.is_ok() {
                    findings.has_a = true;
                    findings.exists = true;
                }
            }
            Err(e) => {
                warn!(domain, error = %e, "address lookup failed");
                findings.error = Some(format!("DNS lookup failed: {}", e));
                return findings;
            }
        }

        if !findings.exists {
            debug!(domain, "no A or AAAA records");
            return findings;
        }

        match self.resolver.mx_lookup(domain).await {
            Ok(records) => {
                findings.mx_records = records
                    .iter()
                    .map(|mx| mx.exchange().to_string())
                    .collect();
                findings.has_mx = !findings.mx_records.is_empty();
                debug!(domain, mx_count = findings.mx_records.len(), "mx lookup");
            }
            Err(e) if is_no_records(&e) => {
                // Domain may still accept mail on its A record.
            }
            Err(e) => {
                warn!(domain, error = %e, "mx lookup failed");
                findings.error = Some(format!("MX lookup failed: {}", e));
            }
        }

        findings
    }
}

/// True only for an authoritative empty answer. NXDOMAIN is a hard
/// failure for our purposes, matching how a "no such domain" differs
/// from "domain exists but has no records of this type".
fn is_no_records(err: &ResolveError) -> bool {
    matches!(
        err.kind(),
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NoError
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_findings_are_empty() {
        let findings = DnsFindings::default();
        assert!(!findings.exists);
        assert!(!findings.has_a);
        assert!(!findings.has_mx);
        assert!(findings.mx_records.is_empty());
        assert!(findings.error.is_none());
    }

    #[test]
    fn test_findings_serialization_shape() {
        let findings = DnsFindings {
            exists: true,
            has_a: true,
            has_mx: true,
            mx_records: vec!["mx1.brandx.in.".to_string()],
            error: None,
        };
        let value = serde_json::to_value(&findings).unwrap();
        assert_eq!(value["exists"], true);
        assert_eq!(value["mx_records"][0], "mx1.brandx.in.");
        assert_eq!(value["error"], serde_json::Value::Null);
    }

    // Live lookups are exercised only when a network is around; the
    // pipeline tests use MockDomainResolver.
    #[tokio::test]
    #[ignore]
    async fn test_live_lookup_with_mx() {
        let resolver = TrustDnsResolver::new(Duration::from_secs(2), 2);
        let findings = resolver.resolve("gmail.com").await;
        assert!(findings.exists);
        assert!(findings.has_mx);
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_nonexistent_domain() {
        let resolver = TrustDnsResolver::new(Duration::from_secs(2), 2);
        let findings = resolver.resolve("definitely-not-registered.invalid").await;
        assert!(!findings.exists);
    }
}
