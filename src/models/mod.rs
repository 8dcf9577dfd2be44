pub mod candidate;
pub mod health;
pub mod job;
pub mod verdict;

pub use candidate::{EmailCandidate, LeadCandidate};
pub use health::HealthResponse;
pub use job::{JobProgress, JobStatus, VettingJob};
pub use verdict::{Checks, Confidence, DomainInfo, ExclusionReason, LeadVerdict, Verdict};
