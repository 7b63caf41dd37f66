use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use biovault_core::serde::to_rfc3339_ms;

use crate::domain::types::User;
use crate::error::IdentityServiceError;
use crate::state::AppState;
use crate::usecase::user::{DeleteUserUseCase, GetUserUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    pub username: String,
    pub face_enrolled: bool,
    pub voice_enrolled: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            face_enrolled: u.face_embedding_path.is_some(),
            voice_enrolled: u.voice_profile_id.is_some(),
            name: u.name,
            email: u.email,
            username: u.username,
            created_at: u.created_at,
        }
    }
}

fn user_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, IdentityServiceError> {
    let Path(id) = path.map_err(|e| IdentityServiceError::BadRequest(e.body_text()))?;
    Ok(id)
}

// ── GET /api/users/{id} ──────────────────────────────────────────────────────

pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(user_id(path)?).await?;
    Ok(Json(UserResponse::from(user)))
}

// ── DELETE /api/users/{id} ───────────────────────────────────────────────────

pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(user_id(path)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
