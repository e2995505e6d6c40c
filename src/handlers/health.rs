use crate::models::HealthStatus;
use axum::{extract::State, Json};
use chrono::Utc;
use std::time::Instant;

#[derive(Clone)]
pub struct HealthState {
    pub started_at: Instant,
}

pub async fn health_check(State(state): State<HealthState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}
