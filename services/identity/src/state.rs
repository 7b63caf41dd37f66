use std::sync::Arc;

use axum::http::HeaderValue;
use sea_orm::DatabaseConnection;

use crate::infra::db::DbUserRepository;
use crate::infra::face::HttpFaceClient;
use crate::infra::voice::AzureVoiceClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub face: HttpFaceClient,
    pub voice: AzureVoiceClient,
    pub otp_ttl_secs: i64,
    pub cors_allowed_origin: HeaderValue,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn face_port(&self) -> HttpFaceClient {
        self.face.clone()
    }

    pub fn voice_port(&self) -> AzureVoiceClient {
        self.voice.clone()
    }
}
