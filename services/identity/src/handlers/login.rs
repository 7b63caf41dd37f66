use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::error::IdentityServiceError;
use crate::state::AppState;
use crate::usecase::login::{Credentials, LoginUseCase};
use crate::usecase::otp::{RequestOtpInput, RequestOtpUseCase};

// ── POST /api/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    #[serde(alias = "passwordHash")]
    pub password: Option<String>,
    pub email: Option<String>,
    pub otp: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let Json(body) = body?;
    let credentials = Credentials::from_fields(body.username, body.password, body.email, body.otp)?;
    let usecase = LoginUseCase {
        users: state.user_repo(),
    };

    let out = usecase.execute(credentials).await?;

    Ok(Json(LoginResponse {
        success: true,
        user_id: out.user.id,
        username: out.user.username,
        token: out.token,
    }))
}

// ── POST /api/request-otp ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestOtpRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct RequestOtpResponse {
    pub success: bool,
    pub message: &'static str,
}

pub async fn request_otp(
    State(state): State<AppState>,
    body: Result<Json<RequestOtpRequest>, JsonRejection>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let Json(body) = body?;
    let usecase = RequestOtpUseCase {
        users: state.user_repo(),
        ttl_secs: state.otp_ttl_secs,
    };

    usecase.execute(RequestOtpInput { email: body.email }).await?;

    Ok(Json(RequestOtpResponse {
        success: true,
        message: "OTP sent.",
    }))
}
