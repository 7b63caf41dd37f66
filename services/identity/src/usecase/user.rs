use tracing::info;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::IdentityServiceError;

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: i64) -> Result<User, IdentityServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityServiceError::UserNotFound)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, user_id: i64) -> Result<(), IdentityServiceError> {
        if !self.users.delete(user_id).await? {
            return Err(IdentityServiceError::UserNotFound);
        }
        info!(user_id, "user deleted");
        Ok(())
    }
}
