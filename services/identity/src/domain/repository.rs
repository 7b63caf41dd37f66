#![allow(async_fn_in_trait)]

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::domain::types::{
    BiometricVerdict, FaceEnrollmentStatus, NewUser, OutboxEvent, User, VoiceEnrollmentStatus,
};
use crate::error::IdentityServiceError;

/// Repository for vault users.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, IdentityServiceError>;
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, IdentityServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityServiceError>;

    /// Insert a user. Unique violations surface as `UsernameTaken` / `EmailTaken`.
    async fn create(&self, user: &NewUser) -> Result<User, IdentityServiceError>;

    /// Delete a user. Returns `true` if a row was deleted.
    async fn delete(&self, id: i64) -> Result<bool, IdentityServiceError>;

    /// Store a freshly issued OTP and its outbox event atomically (same transaction).
    async fn store_otp_with_outbox(
        &self,
        user_id: i64,
        otp: &str,
        expires_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<(), IdentityServiceError>;

    /// Atomically clear the OTP if it still equals `otp` and is unexpired at `now`.
    /// Returns `false` when no row matched (wrong, expired or already consumed).
    async fn consume_otp(
        &self,
        user_id: i64,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, IdentityServiceError>;

    async fn set_face_embedding_path(
        &self,
        user_id: i64,
        path: &str,
    ) -> Result<(), IdentityServiceError>;

    async fn set_voice_profile_id(
        &self,
        user_id: i64,
        profile_id: &str,
    ) -> Result<(), IdentityServiceError>;
}

/// Port for the external face-recognition service.
pub trait FacePort: Send + Sync {
    /// Enroll `image` as the reference face for `username`.
    async fn enroll(
        &self,
        username: &str,
        image: Bytes,
    ) -> Result<FaceEnrollmentStatus, IdentityServiceError>;

    async fn verify(
        &self,
        username: &str,
        image: Bytes,
    ) -> Result<BiometricVerdict, IdentityServiceError>;
}

/// Port for the external speaker-recognition service.
pub trait VoicePort: Send + Sync {
    /// Create an empty text-independent verification profile and return its id.
    async fn create_profile(&self) -> Result<String, IdentityServiceError>;

    async fn enroll(
        &self,
        profile_id: &str,
        audio: Bytes,
    ) -> Result<VoiceEnrollmentStatus, IdentityServiceError>;

    async fn verify(
        &self,
        profile_id: &str,
        audio: Bytes,
    ) -> Result<BiometricVerdict, IdentityServiceError>;

    async fn delete_profile(&self, profile_id: &str) -> Result<(), IdentityServiceError>;
}
