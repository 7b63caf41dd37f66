use axum::{Json, extract::State, http::StatusCode};
use tracing::warn;

use biovault_core::health::{HealthBody, readiness};

use crate::state::AppState;

/// `GET /readyz`: ready once the database answers a ping.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    match state.db.ping().await {
        Ok(()) => readiness(true),
        Err(e) => {
            warn!(error = %e, "database ping failed");
            readiness(false)
        }
    }
}
