use crate::validation::dns::DnsFindings;
use crate::validation::reputation::ReputationFindings;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Categorical confidence label, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
}

/// Why a candidate was not included. Serialized as the wire-level tag
/// consumers match on, so variant names must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    InvalidSyntax,
    FreeProvider,
    DisposableProvider,
    DomainNotFound,
    LowConfidence,
    NoSource,
    NoMxRecords,
    RoleBasedAddress,
}

/// The boolean outcome of each individual check, reported regardless of
/// where the pipeline stopped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Checks {
    pub syntax: bool,
    pub free_provider: bool,
    pub disposable: bool,
    pub role_based: bool,
    pub domain_exists: bool,
    pub has_mx: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DomainInfo {
    pub dns: Option<DnsFindings>,
    pub reputation: Option<ReputationFindings>,
}

/// Full evaluation outcome for one candidate.
///
/// Exactly one of `should_include == true` or `exclusion_reason == Some(_)`
/// holds once the pipeline completes. A verdict that exited early (bad
/// syntax, excluded provider, dead domain) keeps its downstream fields at
/// their zero state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Verdict {
    pub email: String,
    pub valid: bool,
    pub normalized_email: Option<String>,
    pub confidence: Confidence,
    pub confidence_score: u8,
    pub factors: Vec<String>,
    pub checks: Checks,
    pub domain_info: DomainInfo,
    pub should_include: bool,
    pub exclusion_reason: Option<ExclusionReason>,
}

impl Verdict {
    /// Starting state for a pipeline run: nothing checked, nothing scored.
    pub fn pending(email: String) -> Self {
        Self {
            email,
            valid: false,
            normalized_email: None,
            confidence: Confidence::VeryLow,
            confidence_score: 0,
            factors: Vec::new(),
            checks: Checks::default(),
            domain_info: DomainInfo::default(),
            should_include: false,
            exclusion_reason: None,
        }
    }
}

/// A verdict with the lead metadata carried through from the candidate.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeadVerdict {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub company: Option<String>,
    pub person: Option<String>,
    pub role: Option<String>,
}
