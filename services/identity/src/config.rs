use anyhow::bail;

use biovault_core::config::{optional, parse_or, require};

use crate::domain::types::DEFAULT_OTP_TTL_SECS;
use crate::infra::voice::endpoint_for_region;

/// Identity service configuration loaded from environment variables.
#[derive(Debug)]
pub struct IdentityConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 8080). Env var: `IDENTITY_PORT`.
    pub port: u16,
    /// Face-recognition service base URL. Env var: `FACE_SERVICE_URL`.
    pub face_service_url: String,
    pub azure_speech_key: String,
    pub azure_speech_region: Option<String>,
    /// Overrides the regional Speaker Recognition endpoint.
    pub azure_speech_endpoint: Option<String>,
    pub cors_allowed_origin: String,
    pub otp_ttl_secs: i64,
    /// Timeout applied to every face/voice service call.
    pub external_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl IdentityConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            database_url: require("DATABASE_URL")?,
            port: parse_or("IDENTITY_PORT", 8080)?,
            face_service_url: optional("FACE_SERVICE_URL")
                .unwrap_or_else(|| "http://localhost:5000".to_owned()),
            azure_speech_key: require("AZURE_SPEECH_KEY")?,
            azure_speech_region: optional("AZURE_SPEECH_REGION"),
            azure_speech_endpoint: optional("AZURE_SPEECH_ENDPOINT"),
            cors_allowed_origin: optional("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_owned()),
            otp_ttl_secs: parse_or("OTP_TTL_SECS", DEFAULT_OTP_TTL_SECS)?,
            external_timeout_secs: parse_or("EXTERNAL_TIMEOUT_SECS", 10)?,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        };
        config.voice_endpoint()?;
        Ok(config)
    }

    /// Speaker Recognition base URL: the explicit endpoint, else the regional one.
    pub fn voice_endpoint(&self) -> anyhow::Result<String> {
        resolve_voice_endpoint(
            self.azure_speech_endpoint.as_deref(),
            self.azure_speech_region.as_deref(),
        )
    }
}

fn resolve_voice_endpoint(
    endpoint: Option<&str>,
    region: Option<&str>,
) -> anyhow::Result<String> {
    match (endpoint, region) {
        (Some(endpoint), _) => Ok(endpoint.to_owned()),
        (None, Some(region)) => Ok(endpoint_for_region(region)),
        (None, None) => bail!("set AZURE_SPEECH_REGION or AZURE_SPEECH_ENDPOINT"),
    }
}
