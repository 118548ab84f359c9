use actix_web::{web, HttpResponse, Responder};
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{constants::START_TIME, repositories::store::Store, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    start_at: String,
    database: &'static str,
    version: &'static str,
}

pub async fn health_check<S: Store>(state: web::Data<AppState<S>>) -> impl Responder {
    let now_utc = chrono::Utc::now();
    let uptime_seconds = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let database = match state.store.check_connection().await {
        Ok(()) => "OK",
        Err(e) => {
            tracing::warn!("Health check could not reach the database: {}", e);
            "Unavailable"
        }
    };

    let response = HealthCheckResponse {
        status: if database == "OK" { "healthy" } else { "degraded" },
        uptime: format_duration(Duration::from_secs(uptime_seconds)).to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        database,
        version: env!("CARGO_PKG_VERSION"),
    };

    if database == "OK" {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
