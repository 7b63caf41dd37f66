use axum::{
    Json,
    extract::{Multipart, Query, State, multipart::MultipartRejection},
    response::IntoResponse,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::IdentityServiceError;
use crate::handlers::unlock::unlock_response;
use crate::state::AppState;
use crate::usecase::voice::{
    EnrollVoiceInput, EnrollVoiceUseCase, VoiceUnlockInput, VoiceUnlockUseCase,
};

/// Older clients send `username` as a query parameter instead of a form field.
#[derive(Deserialize)]
pub struct VoiceQuery {
    pub username: Option<String>,
}

#[derive(Serialize)]
pub struct VoiceMessageResponse {
    pub success: bool,
    pub message: &'static str,
}

struct VoiceUpload {
    username: String,
    audio: Bytes,
}

async fn read_voice_upload(
    query: VoiceQuery,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<VoiceUpload, IdentityServiceError> {
    let mut multipart = multipart?;
    let mut username = query.username;
    let mut audio = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "username" => username = Some(field.text().await?),
            "audio" => audio = Some(field.bytes().await?),
            _ => {}
        }
    }

    let username = username
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| IdentityServiceError::BadRequest("username is required".to_owned()))?;
    let audio =
        audio.ok_or_else(|| IdentityServiceError::BadRequest("audio is required".to_owned()))?;
    Ok(VoiceUpload { username, audio })
}

// ── POST /api/auth/voice/enroll ──────────────────────────────────────────────

pub async fn enroll_voice(
    State(state): State<AppState>,
    Query(query): Query<VoiceQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let upload = read_voice_upload(query, multipart).await?;
    let usecase = EnrollVoiceUseCase {
        users: state.user_repo(),
        voice: state.voice_port(),
    };

    usecase
        .execute(EnrollVoiceInput {
            username: upload.username,
            audio: upload.audio,
        })
        .await?;

    Ok(Json(VoiceMessageResponse {
        success: true,
        message: "Voice profile enrolled successfully.",
    }))
}

// ── POST /api/auth/voice/unlock ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct VoiceUnlockResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub confidence: f64,
}

pub async fn unlock_voice(
    State(state): State<AppState>,
    Query(query): Query<VoiceQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, IdentityServiceError> {
    let upload = read_voice_upload(query, multipart).await?;
    let usecase = VoiceUnlockUseCase {
        users: state.user_repo(),
        voice: state.voice_port(),
    };

    let outcome = usecase
        .execute(VoiceUnlockInput {
            username: upload.username,
            audio: upload.audio,
        })
        .await?;

    let (status, Json(body)) = unlock_response(outcome);
    let message = if body.success {
        "Vault unlocked!"
    } else {
        "Voice verification failed. Access denied."
    };
    Ok((
        status,
        Json(VoiceUnlockResponse {
            success: body.success,
            message,
            token: body.token,
            confidence: body.confidence,
        }),
    ))
}
