use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Identity service error variants.
#[derive(Debug, thiserror::Error)]
pub enum IdentityServiceError {
    #[error("Username '{0}' is already taken.")]
    UsernameTaken(String),
    #[error("Email '{0}' is already registered.")]
    EmailTaken(String),
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("Invalid or expired OTP.")]
    InvalidOtp,
    #[error("User not found.")]
    UserNotFound,
    #[error("User not found or no voice profile enrolled.")]
    VoiceProfileNotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("Request body exceeds the upload size limit.")]
    PayloadTooLarge,
    #[error("Biometric enrollment rejected: {0}")]
    BiometricRejected(String),
    #[error("An unexpected error occurred.")]
    Internal(#[from] anyhow::Error),
}

impl IdentityServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::EmailTaken(_) => "EMAIL_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidOtp => "INVALID_OTP",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::VoiceProfileNotFound => "VOICE_PROFILE_NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::BiometricRejected(_) => "BIOMETRIC_REJECTED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UsernameTaken(_) | Self::EmailTaken(_) => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::InvalidOtp => StatusCode::UNAUTHORIZED,
            Self::UserNotFound | Self::VoiceProfileNotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::BiometricRejected(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IdentityServiceError {
    /// Map an axum body rejection: over-limit bodies keep their 413,
    /// everything else is a malformed request.
    pub fn from_rejection(status: StatusCode, body_text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::BadRequest(body_text)
        }
    }
}

impl From<JsonRejection> for IdentityServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for IdentityServiceError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for IdentityServiceError {
    fn from(err: MultipartError) -> Self {
        Self::from_rejection(err.status(), err.body_text())
    }
}

impl IntoResponse for IdentityServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are visible through the trace layer; only 500s carry an anyhow chain.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
