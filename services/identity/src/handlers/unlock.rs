use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::domain::types::UnlockMethod;
use crate::error::IdentityServiceError;
use crate::state::AppState;
use crate::usecase::unlock::{UnlockInput, UnlockOutcome, UnlockUseCase};

// ── POST /api/auth/unlock ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UnlockRequest {
    #[serde(alias = "userId")]
    pub username: String,
    pub method: String,
    #[serde(default)]
    pub proof: String,
}

#[derive(Serialize)]
pub struct UnlockResponse {
    pub success: bool,
    pub confidence: f64,
    pub token: Option<String>,
}

/// Accepted → 200, denied → 401, same body shape either way.
pub fn unlock_response(outcome: UnlockOutcome) -> (StatusCode, Json<UnlockResponse>) {
    let status = if outcome.accepted {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (
        status,
        Json(UnlockResponse {
            success: outcome.accepted,
            confidence: outcome.confidence,
            token: outcome.token,
        }),
    )
}

pub async fn unlock(
    State(state): State<AppState>,
    body: Result<Json<UnlockRequest>, JsonRejection>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let Json(body) = body?;
    let usecase = UnlockUseCase {
        users: state.user_repo(),
        face: state.face_port(),
        voice: state.voice_port(),
    };

    let outcome = usecase
        .execute(UnlockInput {
            username: body.username,
            method: UnlockMethod::parse(&body.method),
            proof: body.proof,
        })
        .await?;

    Ok(unlock_response(outcome))
}
