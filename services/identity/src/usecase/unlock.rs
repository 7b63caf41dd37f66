use tracing::info;

use crate::domain::repository::{FacePort, UserRepository, VoicePort};
use crate::domain::types::{BiometricVerdict, DEFAULT_UNLOCK_CONFIDENCE, UnlockMethod};
use crate::error::IdentityServiceError;
use crate::usecase::proof::decode_proof;
use crate::usecase::token::issue_session_token;

pub struct UnlockInput {
    pub username: String,
    pub method: UnlockMethod,
    /// Base64 face image or audio clip; ignored by the fallback path.
    pub proof: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnlockOutcome {
    pub accepted: bool,
    pub confidence: f64,
    pub token: Option<String>,
}

impl UnlockOutcome {
    pub fn denied() -> Self {
        Self {
            accepted: false,
            confidence: 0.0,
            token: None,
        }
    }

    /// Trust the verifier: accepted verdicts get a session token.
    pub fn from_verdict(verdict: BiometricVerdict) -> Self {
        if verdict.accepted {
            Self {
                accepted: true,
                confidence: verdict.score.unwrap_or(DEFAULT_UNLOCK_CONFIDENCE),
                token: Some(issue_session_token()),
            }
        } else {
            Self {
                accepted: false,
                confidence: verdict.score.unwrap_or(0.0),
                token: None,
            }
        }
    }
}

pub struct UnlockUseCase<U, F, V>
where
    U: UserRepository,
    F: FacePort,
    V: VoicePort,
{
    pub users: U,
    pub face: F,
    pub voice: V,
}

impl<U, F, V> UnlockUseCase<U, F, V>
where
    U: UserRepository,
    F: FacePort,
    V: VoicePort,
{
    pub async fn execute(&self, input: UnlockInput) -> Result<UnlockOutcome, IdentityServiceError> {
        let Some(user) = self.users.find_by_username(input.username.trim()).await? else {
            info!(method = input.method.as_str(), "unlock denied: unknown user");
            return Ok(UnlockOutcome::denied());
        };

        let verdict = match &input.method {
            UnlockMethod::Face => {
                let image = decode_proof(&input.proof)?;
                self.face.verify(&user.username, image).await?
            }
            UnlockMethod::Voice => {
                let Some(profile_id) = user.voice_profile_id.as_deref() else {
                    info!(user_id = user.id, "unlock denied: no voice profile enrolled");
                    return Ok(UnlockOutcome::denied());
                };
                let audio = decode_proof(&input.proof)?;
                self.voice.verify(profile_id, audio).await?
            }
            UnlockMethod::Fallback(_) => BiometricVerdict {
                accepted: true,
                score: Some(DEFAULT_UNLOCK_CONFIDENCE),
            },
        };

        let outcome = UnlockOutcome::from_verdict(verdict);
        info!(
            user_id = user.id,
            method = input.method.as_str(),
            accepted = outcome.accepted,
            confidence = outcome.confidence,
            "unlock evaluated"
        );
        Ok(outcome)
    }
}
