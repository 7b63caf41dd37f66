use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::error::IdentityServiceError;
use crate::state::AppState;
use crate::usecase::register::{RegisterInput, RegisterUseCase};

// ── POST /api/register ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
    pub username: String,
    #[serde(alias = "passwordHash")]
    pub password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: i64,
    pub message: &'static str,
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let Json(body) = body?;
    let usecase = RegisterUseCase {
        users: state.user_repo(),
    };

    let user = usecase
        .execute(RegisterInput {
            name: body.name,
            email: body.email,
            username: body.username,
            password: body.password,
        })
        .await?;

    Ok(Json(RegisterResponse {
        success: true,
        user_id: user.id,
        message: "Registration successful!",
    }))
}
