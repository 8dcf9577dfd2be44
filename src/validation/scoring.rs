use crate::models::verdict::Confidence;
use crate::validation::dns::DnsFindings;
use crate::validation::provider::ProviderClassification;
use crate::validation::reputation::ReputationFindings;
use crate::validation::syntax;

/// Numeric score, label and the ordered factor trail for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub confidence: Confidence,
    pub score: u8,
    pub factors: Vec<String>,
}

/// Combines every signal into an additive score, clamped to [0, 100].
///
/// Pure and deterministic: identical findings always produce the same
/// score, label and factor order, so this is fully unit-testable without
/// network access. The factor list preserves evaluation order, penalties
/// included, and callers may assert on it.
pub fn score(
    normalized_email: &str,
    expected_domain: &str,
    source_url: Option<&str>,
    providers: &ProviderClassification,
    dns: &DnsFindings,
    reputation: &ReputationFindings,
) -> ScoreResult {
    let mut score: i32 = 0;
    let mut factors: Vec<String> = Vec::new();

    let mut add = |points: i32, factor: &str| {
        score += points;
        factors.push(factor.to_string());
    };

    // Base credit for having an address at all.
    add(20, "has_email");

    // Source attribution: the expected domain appearing inside the source
    // URL counts as official publication.
    match source_url {
        Some(url) if url.contains(expected_domain) => add(30, "official_source"),
        Some(_) => add(15, "published_source"),
        None => {}
    }

    // Mail routing: MX beats a bare A record.
    if dns.has_mx {
        add(20, "mx_valid");
    } else if dns.has_a {
        add(10, "a_record");
    }

    // Domain maturity.
    if reputation.is_established {
        add(20, "established_domain");
    } else if !reputation.is_new {
        add(10, "mature_domain");
    }

    // Domain alignment: equality or containment in either direction.
    // Deliberately loose; see DESIGN.md on short-domain false positives.
    // Quote-aware split, since a quoted local part may contain `@`.
    let email_domain = syntax::parse(normalized_email).map_or("", |p| p.domain);
    if email_domain == expected_domain
        || expected_domain.contains(email_domain)
        || email_domain.contains(expected_domain)
    {
        add(10, "domain_match");
    }

    // Penalties apply independently of everything above.
    if providers.free {
        add(-40, "free_provider_penalty");
    }
    if providers.disposable {
        add(-50, "disposable_penalty");
    }
    if providers.role_based {
        add(-10, "role_based");
    }
    if reputation.is_new {
        add(-20, "new_domain_penalty");
    }

    let clamped = score.clamp(0, 100) as u8;
    ScoreResult {
        confidence: label_for(clamped),
        score: clamped,
        factors,
    }
}

/// Label boundaries are closed at 80/60/40 exactly.
fn label_for(score: u8) -> Confidence {
    if score >= 80 {
        Confidence::High
    } else if score >= 60 {
        Confidence::Medium
    } else if score >= 40 {
        Confidence::Low
    } else {
        Confidence::VeryLow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::reputation::classify_age;

    fn no_penalties() -> ProviderClassification {
        ProviderClassification::default()
    }

    fn dns_with_mx() -> DnsFindings {
        DnsFindings {
            exists: true,
            has_a: true,
            has_mx: true,
            mx_records: vec!["mx.brandx.in.".to_string()],
            error: None,
        }
    }

    fn dns_a_only() -> DnsFindings {
        DnsFindings {
            exists: true,
            has_a: true,
            ..DnsFindings::default()
        }
    }

    #[test]
    fn test_full_score_official_source_established_domain() {
        // 20 + 30 + 20 + 20 + 10 = 100 -> High
        let result = score(
            "founder@brandx.in",
            "brandx.in",
            Some("https://brandx.in/about"),
            &no_penalties(),
            &dns_with_mx(),
            &classify_age(Some(500)),
        );
        assert_eq!(result.score, 100);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(
            result.factors,
            vec![
                "has_email",
                "official_source",
                "mx_valid",
                "established_domain",
                "domain_match"
            ]
        );
    }

    #[test]
    fn test_new_domain_role_based_lands_low() {
        // 20 + 30 + 20 + 0 + 10 - 10 - 20 = 50 -> Low
        let providers = ProviderClassification {
            role_based: true,
            ..ProviderClassification::default()
        };
        let result = score(
            "hello@newbrand.co",
            "newbrand.co",
            Some("https://newbrand.co/team"),
            &providers,
            &dns_with_mx(),
            &classify_age(Some(10)),
        );
        assert_eq!(result.score, 50);
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(
            result.factors,
            vec![
                "has_email",
                "official_source",
                "mx_valid",
                "domain_match",
                "role_based",
                "new_domain_penalty"
            ]
        );
    }

    #[test]
    fn test_published_but_unrelated_source() {
        // 20 + 15 + 20 + 20 + 10 = 85 -> High
        let result = score(
            "founder@brandx.in",
            "brandx.in",
            Some("https://news.example.com/article"),
            &no_penalties(),
            &dns_with_mx(),
            &classify_age(Some(400)),
        );
        assert_eq!(result.score, 85);
        assert!(result.factors.contains(&"published_source".to_string()));
        assert!(!result.factors.contains(&"official_source".to_string()));
    }

    #[test]
    fn test_a_record_fallback_scores_less_than_mx() {
        let with_mx = score(
            "founder@brandx.in",
            "brandx.in",
            None,
            &no_penalties(),
            &dns_with_mx(),
            &classify_age(None),
        );
        let a_only = score(
            "founder@brandx.in",
            "brandx.in",
            None,
            &no_penalties(),
            &dns_a_only(),
            &classify_age(None),
        );
        assert_eq!(with_mx.score - a_only.score, 10);
        assert!(a_only.factors.contains(&"a_record".to_string()));
    }

    #[test]
    fn test_penalties_push_below_zero_clamp() {
        // 20 + 10 - 40 - 50 - 10 = -70 -> clamped to 0
        let providers = ProviderClassification {
            free: true,
            disposable: true,
            role_based: true,
        };
        let result = score(
            "support@mailinator.com",
            "brandx.in",
            None,
            &providers,
            &DnsFindings::default(),
            &classify_age(None),
        );
        assert_eq!(result.score, 0);
        assert_eq!(result.confidence, Confidence::VeryLow);
        // Penalties keep evaluation order too.
        assert_eq!(
            result.factors,
            vec![
                "has_email",
                "mature_domain",
                "free_provider_penalty",
                "disposable_penalty",
                "role_based"
            ]
        );
    }

    #[test]
    fn test_label_boundaries_are_closed() {
        assert_eq!(label_for(80), Confidence::High);
        assert_eq!(label_for(79), Confidence::Medium);
        assert_eq!(label_for(60), Confidence::Medium);
        assert_eq!(label_for(59), Confidence::Low);
        assert_eq!(label_for(40), Confidence::Low);
        assert_eq!(label_for(39), Confidence::VeryLow);
        assert_eq!(label_for(0), Confidence::VeryLow);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let run = || {
            score(
                "founder@brandx.in",
                "brandx.in",
                Some("https://brandx.in/about"),
                &no_penalties(),
                &dns_with_mx(),
                &classify_age(Some(500)),
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_quoted_local_part_aligns_on_real_domain() {
        // `@` inside a quoted local part must not truncate the domain
        // used for the alignment check.
        let result = score(
            "\"founder@x\"@example.com",
            "example.com",
            None,
            &no_penalties(),
            &dns_with_mx(),
            &classify_age(None),
        );
        assert!(result.factors.contains(&"domain_match".to_string()));
    }

    #[test]
    fn test_domain_alignment_is_substring_based() {
        // Subdomain relationships match in either direction.
        let result = score(
            "founder@mail.brandx.in",
            "brandx.in",
            None,
            &no_penalties(),
            &dns_with_mx(),
            &classify_age(None),
        );
        assert!(result.factors.contains(&"domain_match".to_string()));

        // Short expected domains can over-match; preserved behavior.
        let result = score(
            "founder@company.co",
            "co",
            None,
            &no_penalties(),
            &dns_with_mx(),
            &classify_age(None),
        );
        assert!(result.factors.contains(&"domain_match".to_string()));
    }
}
