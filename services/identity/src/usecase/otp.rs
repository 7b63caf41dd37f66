use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::{OTP_MAX, OTP_MIN, OutboxEvent};
use crate::error::IdentityServiceError;

pub const OTP_ISSUED_EVENT: &str = "otp_issued";

fn generate_otp() -> String {
    let mut rng = rand::rng();
    rng.random_range(OTP_MIN..=OTP_MAX).to_string()
}

pub struct RequestOtpInput {
    pub email: String,
}

pub struct RequestOtpUseCase<R: UserRepository> {
    pub users: R,
    pub ttl_secs: i64,
}

impl<R: UserRepository> RequestOtpUseCase<R> {
    /// Issue a new OTP for the user owning `email`, replacing any previous one.
    /// Returns the expiry of the new code.
    pub async fn execute(
        &self,
        input: RequestOtpInput,
    ) -> Result<DateTime<Utc>, IdentityServiceError> {
        let user = self
            .users
            .find_by_email(input.email.trim())
            .await?
            .ok_or(IdentityServiceError::UserNotFound)?;

        let otp = generate_otp();
        let expires_at = Utc::now() + Duration::seconds(self.ttl_secs);

        let event_id = Uuid::new_v4();
        let event = OutboxEvent {
            id: event_id,
            user_id: user.id,
            kind: OTP_ISSUED_EVENT.to_owned(),
            payload: json!({
                "email": user.email,
                "otp": otp,
                "expiresAt": expires_at.to_rfc3339(),
            }),
            idempotency_key: format!("{OTP_ISSUED_EVENT}:{}:{event_id}", user.id),
        };

        self.users
            .store_otp_with_outbox(user.id, &otp, expires_at, &event)
            .await?;

        info!(user_id = user.id, %expires_at, "otp issued");
        Ok(expires_at)
    }
}
