use anyhow::Context as _;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::domain::repository::VoicePort;
use crate::domain::types::{BiometricVerdict, VoiceEnrollmentStatus};
use crate::error::IdentityServiceError;

pub const API_VERSION: &str = "2021-09-05";
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const PROFILES_PATH: &str = "/speaker-recognition/verification/text-independent/profiles";
const DEFAULT_LOCALE: &str = "en-us";

/// Regional Speaker Recognition endpoint.
pub fn endpoint_for_region(region: &str) -> String {
    format!("https://{region}.api.cognitive.microsoft.com")
}

#[derive(Serialize)]
struct CreateProfileRequest<'a> {
    locale: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProfileResponse {
    profile_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnrollmentResponse {
    enrollment_status: String,
    #[serde(default, alias = "remainingEnrollmentsSpeechLength")]
    remaining_enrollments_speech_length_in_sec: Option<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    recognition_result: String,
    #[serde(default)]
    score: Option<f64>,
}

/// Azure Speaker Recognition (text-independent verification) over REST.
#[derive(Clone)]
pub struct AzureVoiceClient {
    pub client: reqwest::Client,
    pub endpoint: String,
    pub key: String,
    pub locale: String,
}

impl AzureVoiceClient {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
            key: key.into(),
            locale: DEFAULT_LOCALE.to_owned(),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!(
            "{}{PROFILES_PATH}{suffix}?api-version={API_VERSION}",
            self.endpoint
        )
    }

    async fn post_audio<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        audio: Bytes,
        what: &'static str,
    ) -> anyhow::Result<T> {
        let reply = self
            .client
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .body(audio)
            .send()
            .await
            .with_context(|| format!("voice service {what} request"))?
            .error_for_status()
            .with_context(|| format!("voice service {what} status"))?
            .json::<T>()
            .await
            .with_context(|| format!("voice service {what} body"))?;
        Ok(reply)
    }
}

impl VoicePort for AzureVoiceClient {
    async fn create_profile(&self) -> Result<String, IdentityServiceError> {
        let reply = self
            .client
            .post(self.url(""))
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .json(&CreateProfileRequest {
                locale: &self.locale,
            })
            .send()
            .await
            .context("voice service create profile request")?
            .error_for_status()
            .context("voice service create profile status")?
            .json::<CreateProfileResponse>()
            .await
            .context("voice service create profile body")?;
        Ok(reply.profile_id)
    }

    async fn enroll(
        &self,
        profile_id: &str,
        audio: Bytes,
    ) -> Result<VoiceEnrollmentStatus, IdentityServiceError> {
        let reply: EnrollmentResponse = self
            .post_audio(self.url(&format!("/{profile_id}/enrollments")), audio, "enroll")
            .await?;
        if reply.enrollment_status == "Enrolled" {
            return Ok(VoiceEnrollmentStatus::Enrolled);
        }
        Ok(VoiceEnrollmentStatus::Incomplete {
            status: reply.enrollment_status,
            remaining_speech_secs: reply
                .remaining_enrollments_speech_length_in_sec
                .as_ref()
                .and_then(serde_json::Value::as_f64),
        })
    }

    async fn verify(
        &self,
        profile_id: &str,
        audio: Bytes,
    ) -> Result<BiometricVerdict, IdentityServiceError> {
        let reply: VerifyResponse = self
            .post_audio(self.url(&format!("/{profile_id}:verify")), audio, "verify")
            .await?;
        Ok(BiometricVerdict {
            accepted: reply.recognition_result == "Accept",
            score: reply.score,
        })
    }

    async fn delete_profile(&self, profile_id: &str) -> Result<(), IdentityServiceError> {
        self.client
            .delete(self.url(&format!("/{profile_id}")))
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .send()
            .await
            .context("voice service delete profile request")?
            .error_for_status()
            .context("voice service delete profile status")?;
        Ok(())
    }
}
