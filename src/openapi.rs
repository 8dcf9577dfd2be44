use utoipa::OpenApi;

/// OpenAPI contract for the vetting service, generated at compile time
/// from the route annotations. Changes to the API surface should be
/// reflected here first.
///
/// # Endpoints
/// - Health Check: `GET /api/v1/health`
/// - Single vetting: `POST /api/v1/vet-email`
/// - Bulk vetting: `POST /api/v1/vet-emails-bulk`
/// - Job status: `GET /api/v1/job-status/{job_id}`
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::vet::vet_email,
        crate::routes::vet::vet_emails_bulk,
        crate::routes::vet::job_status,
    ),
    components(
        schemas(
            crate::models::health::HealthResponse,
            crate::models::candidate::EmailCandidate,
            crate::models::candidate::LeadCandidate,
            crate::models::verdict::Verdict,
            crate::models::verdict::LeadVerdict,
            crate::models::verdict::Confidence,
            crate::models::verdict::ExclusionReason,
            crate::models::verdict::Checks,
            crate::models::verdict::DomainInfo,
            crate::validation::dns::DnsFindings,
            crate::validation::reputation::ReputationFindings,
            crate::models::job::VettingJob,
            crate::models::job::JobStatus,
            crate::models::job::JobProgress,
            crate::routes::vet::BulkVetRequest,
        )
    ),
    tags(
        (name = "Health Check", description = "Service health monitoring endpoints"),
        (name = "Email Vetting", description = "Email trust evaluation endpoints")
    ),
    info(
        description = "Trust evaluation for publicly published contact addresses: confidence scoring, provider gates, DNS and domain-age signals",
        title = "Email Vetter API",
        version = "0.3.0",
    )
)]
pub struct ApiDoc;
