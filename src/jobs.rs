use crate::models::candidate::LeadCandidate;
use crate::models::job::{JobStatus, VettingJob};
use crate::models::verdict::LeadVerdict;
use crate::validation::pipeline::ValidationPipeline;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Volatile in-process job bookkeeping. Jobs live for the lifetime of the
/// process only; there is deliberately no persistence behind this.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<String, VettingJob>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, total: usize) -> String {
        let id = Uuid::new_v4().to_string();
        let job = VettingJob::new(id.clone(), total);
        self.jobs.write().await.insert(id.clone(), job);
        id
    }

    pub async fn get(&self, id: &str) -> Option<VettingJob> {
        self.jobs.read().await.get(id).cloned()
    }

    pub async fn mark_running(&self, id: &str) {
        if let Some(job) = self.jobs.write().await.get_mut(id) {
            job.status = JobStatus::Running;
        }
    }

    pub async fn mark_completed(&self, id: &str) {
        if let Some(job) = self.jobs.write().await.get_mut(id) {
            job.status = JobStatus::Completed;
            job.completed_at = Some(chrono::Utc::now().timestamp());
        }
    }

    pub async fn mark_failed(&self, id: &str) {
        if let Some(job) = self.jobs.write().await.get_mut(id) {
            job.status = JobStatus::Failed;
            job.completed_at = Some(chrono::Utc::now().timestamp());
        }
    }

    /// Records one verdict and bumps the progress counters, so a status
    /// poll mid-run sees partial results.
    pub async fn push_result(&self, id: &str, verdict: LeadVerdict) {
        if let Some(job) = self.jobs.write().await.get_mut(id) {
            job.progress.processed += 1;
            if verdict.verdict.should_include {
                job.progress.included += 1;
            }
            job.results.push(verdict);
        }
    }
}

/// Drives one vetting job to completion: bounded-concurrency evaluation,
/// one store update per candidate, completion mark at the end.
pub async fn run_job(
    pipeline: ValidationPipeline,
    store: JobStore,
    job_id: String,
    leads: Vec<LeadCandidate>,
    concurrency: usize,
) {
    store.mark_running(&job_id).await;
    info!(job_id = %job_id, candidates = leads.len(), "vetting job started");

    let mut verdicts = stream::iter(leads)
        .map(|lead| pipeline.evaluate_lead(lead))
        .buffered(concurrency.max(1));

    while let Some(verdict) = verdicts.next().await {
        store.push_result(&job_id, verdict).await;
    }

    store.mark_completed(&job_id).await;
    info!(job_id = %job_id, "vetting job completed");
}

/// Spawns a job and a watchdog that flips it to `Failed` if the task dies
/// instead of silently dropping the candidates.
pub fn spawn_job(
    pipeline: ValidationPipeline,
    store: JobStore,
    job_id: String,
    leads: Vec<LeadCandidate>,
    concurrency: usize,
) {
    let watchdog_store = store.clone();
    let watchdog_id = job_id.clone();
    let handle = tokio::spawn(run_job(pipeline, store, job_id, leads, concurrency));
    tokio::spawn(async move {
        if handle.await.is_err() {
            warn!(job_id = %watchdog_id, "vetting job aborted");
            watchdog_store.mark_failed(&watchdog_id).await;
        }
    });
}
