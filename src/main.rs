use actix_web::{App, HttpServer, web::Data};
use email_vetter::config::{AppConfig, ReferenceTables};
use email_vetter::jobs::JobStore;
use email_vetter::openapi::ApiDoc;
use email_vetter::routes;
use email_vetter::routes::vet::BatchConcurrency;
use email_vetter::validation::dns::TrustDnsResolver;
use email_vetter::validation::pipeline::ValidationPipeline;
use email_vetter::validation::reputation::WhoisClient;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Email Vetter Service Entry Point
///
/// Configures and launches the Actix-web HTTP server with:
/// - Email trust evaluation endpoints under `/api/v1`
/// - Swagger UI at `/swagger-ui/` with the OpenAPI spec at
///   `/api-docs/openapi.json`
/// - Environment configuration via `.env` file
///
/// Reference tables and lookup timeouts come from the environment; a
/// malformed reference table aborts startup rather than corrupting
/// per-candidate evaluation later.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let tables = ReferenceTables::from_env().map_err(std::io::Error::other)?;

    let pipeline = ValidationPipeline::new(
        Arc::new(TrustDnsResolver::new(
            config.dns_timeout,
            config.dns_attempts,
        )),
        Arc::new(WhoisClient::new(config.whois_timeout)),
        Arc::new(tables),
    );
    let store = JobStore::new();
    let concurrency = BatchConcurrency(config.batch_concurrency);

    info!(
        addr = %config.bind_addr,
        port = config.port,
        "starting email vetter"
    );

    HttpServer::new(move || {
        let openapi = ApiDoc::openapi();

        App::new()
            .app_data(Data::new(pipeline.clone()))
            .app_data(Data::new(store.clone()))
            .app_data(Data::new(concurrency))
            .configure(routes::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
    })
    .bind((config.bind_addr.clone(), config.port))?
    .run()
    .await
}
