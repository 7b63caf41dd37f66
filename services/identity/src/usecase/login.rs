use chrono::Utc;
use tracing::info;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::IdentityServiceError;
use crate::usecase::password::verify_password;
use crate::usecase::token::issue_session_token;

/// Credentials accepted by `POST /api/login`.
#[derive(Debug)]
pub enum Credentials {
    Password { username: String, password: String },
    Otp { email: String, otp: String },
}

impl Credentials {
    /// Pick the credential pair present in a login request. A complete
    /// username/password pair wins over an email/OTP pair.
    pub fn from_fields(
        username: Option<String>,
        password: Option<String>,
        email: Option<String>,
        otp: Option<String>,
    ) -> Result<Self, IdentityServiceError> {
        match (username, password, email, otp) {
            (Some(username), Some(password), _, _) => Ok(Self::Password { username, password }),
            (_, _, Some(email), Some(otp)) => Ok(Self::Otp { email, otp }),
            _ => Err(IdentityServiceError::BadRequest(
                "expected username and password, or email and otp".to_owned(),
            )),
        }
    }
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub token: String,
}

pub struct LoginUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, credentials: Credentials) -> Result<LoginOutput, IdentityServiceError> {
        let user = match credentials {
            Credentials::Password { username, password } => {
                let user = self
                    .users
                    .find_by_username(username.trim())
                    .await?
                    .ok_or(IdentityServiceError::InvalidCredentials)?;
                let hash = user
                    .password_hash
                    .as_deref()
                    .ok_or(IdentityServiceError::InvalidCredentials)?;
                if !verify_password(&password, hash) {
                    return Err(IdentityServiceError::InvalidCredentials);
                }
                user
            }
            Credentials::Otp { email, otp } => {
                let user = self
                    .users
                    .find_by_email(email.trim())
                    .await?
                    .ok_or(IdentityServiceError::InvalidCredentials)?;
                let now = Utc::now();
                if !user.otp_matches(otp.trim(), now) {
                    return Err(IdentityServiceError::InvalidOtp);
                }
                // single use: a concurrent login may have consumed it since the read
                if !self.users.consume_otp(user.id, otp.trim(), now).await? {
                    return Err(IdentityServiceError::InvalidOtp);
                }
                user
            }
        };

        info!(user_id = user.id, "login succeeded");
        Ok(LoginOutput {
            user,
            token: issue_session_token(),
        })
    }
}
