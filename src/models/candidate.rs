use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single address to evaluate: the raw email, the domain the organization
/// is expected to use, and (when known) the URL where the address was
/// published.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailCandidate {
    pub email: String,
    pub expected_domain: String,
    #[serde(default)]
    pub source_url: Option<String>,
}

/// A candidate plus the lead metadata discovered alongside it. The pipeline
/// never interprets the metadata; it is carried through onto the verdict.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeadCandidate {
    pub email: String,
    pub expected_domain: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub person: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl LeadCandidate {
    pub fn candidate(&self) -> EmailCandidate {
        EmailCandidate {
            email: self.email.clone(),
            expected_domain: self.expected_domain.clone(),
            source_url: self.source_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_deserialization() {
        let json = r#"{"email": "a@b.com", "expected_domain": "b.com"}"#;
        let candidate: EmailCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.email, "a@b.com");
        assert_eq!(candidate.expected_domain, "b.com");
        assert!(candidate.source_url.is_none());
    }

    #[test]
    fn test_missing_expected_domain_is_rejected() {
        let json = r#"{"email": "a@b.com"}"#;
        let result: Result<EmailCandidate, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_lead_candidate_metadata_defaults() {
        let json = r#"{"email": "a@b.com", "expected_domain": "b.com", "company": "B Inc"}"#;
        let lead: LeadCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(lead.company.as_deref(), Some("B Inc"));
        assert!(lead.person.is_none());
        assert!(lead.role.is_none());

        let candidate = lead.candidate();
        assert_eq!(candidate.email, "a@b.com");
    }
}
