use crate::jobs::{self, JobStore};
use crate::models::candidate::{EmailCandidate, LeadCandidate};
use crate::validation::pipeline::ValidationPipeline;
use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct BulkVetRequest {
    pub candidates: Vec<LeadCandidate>,
}

#[derive(Deserialize)]
pub struct JobStatusQuery {
    #[serde(default)]
    includable_only: bool,
}

/// Evaluation concurrency for background jobs, injected from config.
#[derive(Clone, Copy)]
pub struct BatchConcurrency(pub usize);

/// # Single Email Vetting Endpoint
///
/// Runs the full trust evaluation for one candidate and returns the
/// verdict synchronously: syntax, provider gates, DNS, domain reputation,
/// confidence score and the inclusion decision.
///
/// ## Request
/// - Method: POST
/// - Body: JSON object with `email`, `expected_domain` and optional
///   `source_url`
///
/// ## Responses
/// - **200 OK**: verdict for the candidate; exclusions are reported inside
///   the body (`should_include`, `exclusion_reason`), not as HTTP errors
#[utoipa::path(
    post,
    path = "/api/v1/vet-email",
    request_body = EmailCandidate,
    responses(
        (status = 200, description = "Verdict for the candidate", body = crate::models::Verdict)
    ),
    tag = "Email Vetting"
)]
#[post("/vet-email")]
pub async fn vet_email(
    req: web::Json<EmailCandidate>,
    pipeline: web::Data<ValidationPipeline>,
) -> impl Responder {
    let verdict = pipeline.evaluate(&req).await;
    HttpResponse::Ok().json(verdict)
}

/// # Bulk Vetting Endpoint
///
/// Queues a background vetting job for a batch of candidates and returns
/// immediately with the job id. Progress and per-candidate verdicts are
/// available incrementally from the job-status endpoint.
///
/// ## Responses
/// - **202 Accepted**: job queued, body carries `job_id`
#[utoipa::path(
    post,
    path = "/api/v1/vet-emails-bulk",
    request_body = BulkVetRequest,
    responses(
        (status = 202, description = "Vetting job queued")
    ),
    tag = "Email Vetting"
)]
#[post("/vet-emails-bulk")]
pub async fn vet_emails_bulk(
    req: web::Json<BulkVetRequest>,
    pipeline: web::Data<ValidationPipeline>,
    store: web::Data<JobStore>,
    concurrency: web::Data<BatchConcurrency>,
) -> impl Responder {
    let candidates = req.into_inner().candidates;
    let job_id = store.create(candidates.len()).await;

    jobs::spawn_job(
        pipeline.get_ref().clone(),
        store.get_ref().clone(),
        job_id.clone(),
        candidates,
        concurrency.get_ref().0,
    );

    HttpResponse::Accepted().json(json!({
        "job_id": job_id,
        "status": "queued",
        "message": "Vetting job queued for processing"
    }))
}

/// # Job Status Endpoint
///
/// Reports a job's status, progress counters and the verdicts produced so
/// far. Pass `?includable_only=true` to filter the result list to the
/// candidates that made the inclusion cut.
#[utoipa::path(
    get,
    path = "/api/v1/job-status/{job_id}",
    params(
        ("includable_only" = Option<bool>, Query, description = "Return only includable verdicts")
    ),
    responses(
        (status = 200, description = "Job status retrieved", body = crate::models::VettingJob),
        (status = 404, description = "Job not found")
    ),
    tag = "Email Vetting"
)]
#[get("/job-status/{job_id}")]
pub async fn job_status(
    path: web::Path<String>,
    query: web::Query<JobStatusQuery>,
    store: web::Data<JobStore>,
) -> impl Responder {
    let job_id = path.into_inner();

    match store.get(&job_id).await {
        Some(mut job) => {
            if query.includable_only {
                job.results = crate::validation::pipeline::filter_includable(job.results);
            }
            HttpResponse::Ok().json(job)
        }
        None => HttpResponse::NotFound().json(json!({
            "error": "Job not found"
        })),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(vet_email)
        .service(vet_emails_bulk)
        .service(job_status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReferenceTables;
    use crate::validation::dns::{DnsFindings, MockDomainResolver};
    use crate::validation::reputation::MockRegistrationLookup;
    use actix_web::{App, test};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_pipeline() -> ValidationPipeline {
        let mut resolver = MockDomainResolver::new();
        resolver.expect_resolve().returning(|_| DnsFindings {
            exists: true,
            has_a: true,
            has_mx: true,
            mx_records: vec!["mx.brandx.in.".to_string()],
            error: None,
        });
        let mut registration = MockRegistrationLookup::new();
        registration.expect_lookup_age().returning(|_| Some(500));
        ValidationPipeline::new(
            Arc::new(resolver),
            Arc::new(registration),
            Arc::new(ReferenceTables::builtin()),
        )
    }

    async fn create_test_app() -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(web::Data::new(test_pipeline()))
                .app_data(web::Data::new(JobStore::new()))
                .app_data(web::Data::new(BatchConcurrency(2)))
                .configure(configure_routes),
        )
        .await
    }

    #[actix_web::test]
    async fn test_vet_email_includable() {
        let app = create_test_app().await;
        let req = test::TestRequest::post()
            .uri("/vet-email")
            .set_json(serde_json::json!({
                "email": "founder@brandx.in",
                "expected_domain": "brandx.in",
                "source_url": "https://brandx.in/about"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["confidence"], "High");
        assert_eq!(body["confidence_score"], 100);
        assert_eq!(body["should_include"], true);
        assert_eq!(body["exclusion_reason"], serde_json::Value::Null);
    }

    #[actix_web::test]
    async fn test_vet_email_free_provider() {
        let app = create_test_app().await;
        let req = test::TestRequest::post()
            .uri("/vet-email")
            .set_json(serde_json::json!({
                "email": "press@gmail.com",
                "expected_domain": "brandx.in"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["valid"], false);
        assert_eq!(body["exclusion_reason"], "free_provider");
        assert_eq!(body["checks"]["free_provider"], true);
    }

    #[actix_web::test]
    async fn test_vet_email_invalid_syntax() {
        let app = create_test_app().await;
        let req = test::TestRequest::post()
            .uri("/vet-email")
            .set_json(serde_json::json!({
                "email": "not-an-address",
                "expected_domain": "brandx.in"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["exclusion_reason"], "invalid_syntax");
        assert_eq!(body["normalized_email"], serde_json::Value::Null);
    }

    #[actix_web::test]
    async fn test_bulk_vetting_roundtrip() {
        let app = create_test_app().await;
        let req = test::TestRequest::post()
            .uri("/vet-emails-bulk")
            .set_json(serde_json::json!({
                "candidates": [
                    {
                        "email": "founder@brandx.in",
                        "expected_domain": "brandx.in",
                        "source_url": "https://brandx.in/about",
                        "company": "BrandX"
                    },
                    {
                        "email": "press@gmail.com",
                        "expected_domain": "brandx.in"
                    }
                ]
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 202);

        let body: serde_json::Value = test::read_body_json(resp).await;
        let job_id = body["job_id"].as_str().unwrap().to_string();

        // The job runs on the same runtime; poll until it settles.
        let mut status_body = serde_json::Value::Null;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let req = test::TestRequest::get()
                .uri(&format!("/job-status/{}", job_id))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
            status_body = test::read_body_json(resp).await;
            if status_body["status"] == "Completed" {
                break;
            }
        }

        assert_eq!(status_body["status"], "Completed");
        assert_eq!(status_body["progress"]["total"], 2);
        assert_eq!(status_body["progress"]["processed"], 2);
        assert_eq!(status_body["progress"]["included"], 1);
        assert_eq!(status_body["results"].as_array().unwrap().len(), 2);
        assert_eq!(status_body["results"][0]["company"], "BrandX");

        // Includable-only filter keeps just the verdict that made the cut.
        let req = test::TestRequest::get()
            .uri(&format!("/job-status/{}?includable_only=true", job_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let filtered: serde_json::Value = test::read_body_json(resp).await;
        let results = filtered["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["email"], "founder@brandx.in");
    }

    #[actix_web::test]
    async fn test_job_status_not_found() {
        let app = create_test_app().await;
        let req = test::TestRequest::get()
            .uri("/job-status/does-not-exist")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
    }
}
