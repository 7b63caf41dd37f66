use tracing::info;

use crate::domain::repository::{FacePort, UserRepository};
use crate::domain::types::{FaceEnrollmentStatus, face_embedding_path};
use crate::error::IdentityServiceError;
use crate::usecase::proof::decode_proof;

pub struct EnrollFaceInput {
    pub username: String,
    /// Base64 (or data URL) encoded face image.
    pub image: String,
}

pub struct EnrollFaceUseCase<U: UserRepository, F: FacePort> {
    pub users: U,
    pub face: F,
}

impl<U: UserRepository, F: FacePort> EnrollFaceUseCase<U, F> {
    /// Returns the stored face embedding path.
    pub async fn execute(&self, input: EnrollFaceInput) -> Result<String, IdentityServiceError> {
        let user = self
            .users
            .find_by_username(input.username.trim())
            .await?
            .ok_or(IdentityServiceError::UserNotFound)?;
        let image = decode_proof(&input.image)?;

        match self.face.enroll(&user.username, image).await? {
            FaceEnrollmentStatus::Enrolled => {
                let path = face_embedding_path(&user.username);
                self.users.set_face_embedding_path(user.id, &path).await?;
                info!(user_id = user.id, "face enrolled");
                Ok(path)
            }
            FaceEnrollmentStatus::Rejected(message) => {
                Err(IdentityServiceError::BiometricRejected(message))
            }
        }
    }
}
