use anyhow::Context as _;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::domain::repository::FacePort;
use crate::domain::types::{BiometricVerdict, FaceEnrollmentStatus};
use crate::error::IdentityServiceError;

/// Reply shape shared by the face service's `/enroll` and `/verify`.
#[derive(Debug, Deserialize)]
struct FaceServiceReply {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Client for the face-recognition service (`FACE_SERVICE_URL`).
#[derive(Clone)]
pub struct HttpFaceClient {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl HttpFaceClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    async fn post_image(
        &self,
        path: &str,
        username: &str,
        image: Bytes,
    ) -> anyhow::Result<FaceServiceReply> {
        let part = Part::bytes(image.to_vec())
            .file_name(format!("{username}.jpg"))
            .mime_str("image/jpeg")?;
        let form = Form::new()
            .text("username", username.to_owned())
            .part("image", part);

        let reply = self
            .client
            .post(format!("{}{path}", self.base_url))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("face service {path} request"))?
            .error_for_status()
            .with_context(|| format!("face service {path} status"))?
            .json::<FaceServiceReply>()
            .await
            .with_context(|| format!("face service {path} body"))?;
        Ok(reply)
    }
}

impl FacePort for HttpFaceClient {
    async fn enroll(
        &self,
        username: &str,
        image: Bytes,
    ) -> Result<FaceEnrollmentStatus, IdentityServiceError> {
        let reply = self.post_image("/enroll", username, image).await?;
        if reply.status == "success" {
            Ok(FaceEnrollmentStatus::Enrolled)
        } else {
            Ok(FaceEnrollmentStatus::Rejected(
                reply
                    .message
                    .unwrap_or_else(|| format!("face service status {}", reply.status)),
            ))
        }
    }

    async fn verify(
        &self,
        username: &str,
        image: Bytes,
    ) -> Result<BiometricVerdict, IdentityServiceError> {
        let reply = self.post_image("/verify", username, image).await?;
        Ok(BiometricVerdict {
            accepted: reply.status == "success",
            score: reply.confidence,
        })
    }
}
