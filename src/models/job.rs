use crate::models::verdict::LeadVerdict;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Per-candidate progress counters, updated as each verdict lands so a
/// status poll can report partial results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct JobProgress {
    pub total: usize,
    pub processed: usize,
    pub included: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VettingJob {
    pub id: String,
    pub status: JobStatus,
    pub progress: JobProgress,
    pub results: Vec<LeadVerdict>,
    pub created_at: i64,
    pub completed_at: Option<i64>,
}

impl VettingJob {
    pub fn new(id: String, total: usize) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            progress: JobProgress {
                total,
                ..JobProgress::default()
            },
            results: Vec::new(),
            created_at: chrono::Utc::now().timestamp(),
            completed_at: None,
        }
    }
}
