//! HTTP surface of the proxy
//!
//! Exposes `GET /api/apod?date=YYYY-MM-DD` on actix-web. Successful lookups
//! answer 200 with the picture record; every failure answers 500 with a fixed
//! message so no upstream detail (or API key) reaches the client.

use actix_web::{error::InternalError, web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::data::{ApodSource, NasaClient};
use crate::proxy::ApodService;

/// Message returned to clients on any failure
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch APOD data";

/// Query string of `GET /api/apod`
#[derive(Debug, Deserialize)]
pub struct ApodQuery {
    /// Requested date; absent or empty means today
    pub date: Option<String>,
}

/// Body of a 500 response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

fn error_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: FETCH_ERROR_MESSAGE,
    })
}

async fn get_apod<S: ApodSource>(
    service: web::Data<ApodService<S>>,
    query: web::Query<ApodQuery>,
) -> HttpResponse {
    match service.get_apod(query.date.as_deref()).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(_) => error_response(),
    }
}

/// Registers the APOD route and its shared service on an actix app
pub fn configure<S: ApodSource>(
    service: web::Data<ApodService<S>>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let query_config = web::QueryConfig::default().error_handler(|err, _req| {
            warn!(error = %err, "rejected malformed query string");
            InternalError::from_response(err, error_response()).into()
        });

        cfg.app_data(service)
            .app_data(query_config)
            .route("/api/apod", web::get().to(get_apod::<S>));
    }
}

/// Runs the proxy until the process is stopped
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let source = NasaClient::new(config.api_key.clone()).with_base_url(config.upstream_url.clone());
    let service = web::Data::new(ApodService::new(
        source,
        config.cache_ttl,
        config.upstream_timeout,
    ));

    let server = HttpServer::new(move || App::new().configure(configure(service.clone())))
        .bind(config.listen_addr)?;

    info!(
        addr = %config.listen_addr,
        upstream = %config.upstream_url,
        cache_ttl_hours = config.cache_ttl.num_hours(),
        timeout_secs = config.upstream_timeout.as_secs(),
        "starting APOD proxy"
    );

    server.run().await
}
