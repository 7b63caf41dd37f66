use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> (StatusCode, Json<HealthBody>) {
    readiness(true)
}

/// Map a readiness probe result to a response. Services call this from their
/// own `/readyz` handler after checking their dependencies.
pub fn readiness(ready: bool) -> (StatusCode, Json<HealthBody>) {
    if ready {
        (StatusCode::OK, Json(HealthBody { status: "ok" }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthBody {
                status: "unavailable",
            }),
        )
    }
}
