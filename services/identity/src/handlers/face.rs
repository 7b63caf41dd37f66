use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::error::IdentityServiceError;
use crate::state::AppState;
use crate::usecase::face::{EnrollFaceInput, EnrollFaceUseCase};

// ── POST /api/biometrics/face/enroll ─────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollFaceRequest {
    pub username: String,
    /// Base64 image, optionally as a data URL.
    pub face_embedding: String,
}

#[derive(Serialize)]
pub struct EnrollFaceResponse {
    pub success: bool,
    pub message: String,
}

pub async fn enroll_face(
    State(state): State<AppState>,
    body: Result<Json<EnrollFaceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let Json(body) = body?;
    let usecase = EnrollFaceUseCase {
        users: state.user_repo(),
        face: state.face_port(),
    };

    let username = body.username.trim().to_owned();
    usecase
        .execute(EnrollFaceInput {
            username: body.username,
            image: body.face_embedding,
        })
        .await?;

    Ok(Json(EnrollFaceResponse {
        success: true,
        message: format!("Face enrolled successfully for {username}."),
    }))
}
