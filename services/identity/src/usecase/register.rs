use chrono::Utc;
use tracing::info;

use crate::domain::repository::UserRepository;
use crate::domain::types::{NewUser, User};
use crate::error::IdentityServiceError;
use crate::usecase::password::hash_password;

pub struct RegisterInput {
    pub name: Option<String>,
    pub email: String,
    pub username: String,
    /// Plain-text password. `None` registers an OTP-only account.
    pub password: Option<String>,
}

pub struct RegisterUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, IdentityServiceError> {
        let email = input.email.trim();
        let username = input.username.trim();
        if email.is_empty() {
            return Err(IdentityServiceError::BadRequest(
                "email must not be empty".to_owned(),
            ));
        }
        if username.is_empty() {
            return Err(IdentityServiceError::BadRequest(
                "username must not be empty".to_owned(),
            ));
        }

        // The unique indexes are the real guard; these checks give the
        // caller a precise message before we pay for hashing.
        if self.users.find_by_username(username).await?.is_some() {
            return Err(IdentityServiceError::UsernameTaken(username.to_owned()));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(IdentityServiceError::EmailTaken(email.to_owned()));
        }

        let password_hash = match input.password.as_deref() {
            Some(p) if !p.is_empty() => Some(hash_password(p)?),
            _ => None,
        };

        let user = self
            .users
            .create(&NewUser {
                name: input.name.filter(|n| !n.trim().is_empty()),
                email: email.to_owned(),
                username: username.to_owned(),
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }
}
