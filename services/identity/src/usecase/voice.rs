use bytes::Bytes;
use tracing::{info, warn};

use crate::domain::repository::{UserRepository, VoicePort};
use crate::domain::types::VoiceEnrollmentStatus;
use crate::error::IdentityServiceError;
use crate::usecase::unlock::UnlockOutcome;

async fn discard_profile<V: VoicePort>(voice: &V, profile_id: &str) {
    if let Err(e) = voice.delete_profile(profile_id).await {
        warn!(profile_id, error = %e, "failed to delete voice profile");
    }
}

fn require_audio(audio: &Bytes) -> Result<(), IdentityServiceError> {
    if audio.is_empty() {
        return Err(IdentityServiceError::BadRequest(
            "audio must not be empty".to_owned(),
        ));
    }
    Ok(())
}

// ── EnrollVoice ──────────────────────────────────────────────────────────────

pub struct EnrollVoiceInput {
    pub username: String,
    pub audio: Bytes,
}

pub struct EnrollVoiceUseCase<U: UserRepository, V: VoicePort> {
    pub users: U,
    pub voice: V,
}

impl<U: UserRepository, V: VoicePort> EnrollVoiceUseCase<U, V> {
    /// Create and enroll a fresh voice profile. Returns the new profile id.
    pub async fn execute(&self, input: EnrollVoiceInput) -> Result<String, IdentityServiceError> {
        let user = self
            .users
            .find_by_username(input.username.trim())
            .await?
            .ok_or(IdentityServiceError::UserNotFound)?;
        require_audio(&input.audio)?;

        let profile_id = self.voice.create_profile().await?;
        info!(user_id = user.id, %profile_id, "created voice profile");

        let status = match self.voice.enroll(&profile_id, input.audio).await {
            Ok(status) => status,
            Err(e) => {
                discard_profile(&self.voice, &profile_id).await;
                return Err(e);
            }
        };

        match status {
            VoiceEnrollmentStatus::Enrolled => {
                if let Err(e) = self.users.set_voice_profile_id(user.id, &profile_id).await {
                    discard_profile(&self.voice, &profile_id).await;
                    return Err(e);
                }
                if let Some(previous) = user.voice_profile_id.as_deref() {
                    discard_profile(&self.voice, previous).await;
                }
                info!(user_id = user.id, %profile_id, "voice enrolled");
                Ok(profile_id)
            }
            VoiceEnrollmentStatus::Incomplete {
                status,
                remaining_speech_secs,
            } => {
                discard_profile(&self.voice, &profile_id).await;
                let message = match remaining_speech_secs {
                    Some(secs) => format!("status {status}, {secs:.1}s more speech required"),
                    None => format!("status {status}"),
                };
                Err(IdentityServiceError::BiometricRejected(message))
            }
        }
    }
}

// ── VoiceUnlock ──────────────────────────────────────────────────────────────

pub struct VoiceUnlockInput {
    pub username: String,
    pub audio: Bytes,
}

pub struct VoiceUnlockUseCase<U: UserRepository, V: VoicePort> {
    pub users: U,
    pub voice: V,
}

impl<U: UserRepository, V: VoicePort> VoiceUnlockUseCase<U, V> {
    pub async fn execute(
        &self,
        input: VoiceUnlockInput,
    ) -> Result<UnlockOutcome, IdentityServiceError> {
        let user = self
            .users
            .find_by_username(input.username.trim())
            .await?
            .ok_or(IdentityServiceError::VoiceProfileNotFound)?;
        let profile_id = user
            .voice_profile_id
            .as_deref()
            .ok_or(IdentityServiceError::VoiceProfileNotFound)?;
        require_audio(&input.audio)?;

        let verdict = self.voice.verify(profile_id, input.audio).await?;
        let outcome = UnlockOutcome::from_verdict(verdict);
        info!(
            user_id = user.id,
            accepted = outcome.accepted,
            confidence = outcome.confidence,
            "voice unlock evaluated"
        );
        Ok(outcome)
    }
}
