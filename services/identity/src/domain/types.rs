use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Vault user as stored by the identity service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    pub username: String,
    /// argon2 PHC string. `None` for OTP-only accounts.
    pub password_hash: Option<String>,
    pub otp: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub face_embedding_path: Option<String>,
    pub voice_profile_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// True when `candidate` equals the stored OTP and it has not expired at `now`.
    pub fn otp_matches(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        match (&self.otp, self.otp_expires_at) {
            (Some(otp), Some(expires_at)) => otp == candidate && now < expires_at,
            _ => false,
        }
    }
}

/// Fields required to insert a user; the store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub username: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Outbox event recorded alongside a user mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub user_id: i64,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Verdict returned by an external biometric verifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiometricVerdict {
    pub accepted: bool,
    /// Verifier score in `0.0..=1.0`, when the verifier reports one.
    pub score: Option<f64>,
}

/// Outcome of a face enrollment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceEnrollmentStatus {
    Enrolled,
    /// The face service answered but refused the image (e.g. no face found).
    Rejected(String),
}

/// Outcome of a voice enrollment attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEnrollmentStatus {
    Enrolled,
    /// The voice service wants more audio (or rejected it) before the profile is usable.
    Incomplete {
        status: String,
        remaining_speech_secs: Option<f64>,
    },
}

/// How an unlock request proves the user's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockMethod {
    Face,
    Voice,
    /// Any unrecognised method takes the always-succeeding fallback path.
    Fallback(String),
}

impl UnlockMethod {
    pub fn parse(method: &str) -> Self {
        match method.trim().to_ascii_lowercase().as_str() {
            "face" => Self::Face,
            "voice" => Self::Voice,
            other => Self::Fallback(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Face => "face",
            Self::Voice => "voice",
            Self::Fallback(other) => other,
        }
    }
}

/// Confidence reported for the fallback unlock path and for accepted face
/// verdicts, which carry no score.
pub const DEFAULT_UNLOCK_CONFIDENCE: f64 = 0.96;

/// OTP time-to-live in seconds when not configured.
pub const DEFAULT_OTP_TTL_SECS: i64 = 300;

/// Inclusive range of generated OTP values (six digits).
pub const OTP_MIN: u32 = 100_000;
pub const OTP_MAX: u32 = 999_999;

/// Where the face service stores a user's enrollment image.
pub fn face_embedding_path(username: &str) -> String {
    format!("known_faces/{username}.jpg")
}
