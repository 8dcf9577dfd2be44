use actix_web::web;

pub mod health;

/// Email vetting endpoints: synchronous single-candidate evaluation, bulk
/// job submission and job-status polling.
pub mod vet;

/// Mounts the versioned API under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure_routes)
            .configure(vet::configure_routes),
    );
}
