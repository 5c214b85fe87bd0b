use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use super::encode::TransportPayload;

/// Errors from the upload gateway.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The payload was empty; no network call was made.
    #[error("upload payload is empty")]
    InvalidPayload,

    /// The endpoint answered with a non-success status.
    #[error("upload failed ({status}): {message}")]
    Failed { status: u16, message: String },

    /// The request never completed (connection error, timeout).
    #[error("upload transport error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Stable reference to an uploaded artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub reference: String,
}

/// One-shot handoff of an encoded artifact to durable storage.
///
/// Single attempt, no internal retry; a failed upload returns no partial
/// reference. Retrying is the caller's decision.
#[async_trait::async_trait]
pub trait UploadGateway: Send + Sync {
    async fn upload(
        &self,
        payload: &TransportPayload,
        destination_hint: &str,
    ) -> Result<UploadResult, UploadError>;

    /// Gateway name for logging.
    fn name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file: &'a str,
    name: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// HTTP upload gateway: POST `{file, name}` as JSON, expect `{url}`.
pub struct HttpUploadGateway {
    client: Client,
    endpoint: String,
}

impl HttpUploadGateway {
    pub fn new(endpoint: String) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// Destination names carry a random suffix so concurrent uploads from
    /// the same session can never overwrite each other.
    fn destination_name(hint: &str) -> String {
        format!("{}/{}.wav", hint.trim_end_matches('/'), uuid::Uuid::new_v4())
    }
}

#[async_trait::async_trait]
impl UploadGateway for HttpUploadGateway {
    async fn upload(
        &self,
        payload: &TransportPayload,
        destination_hint: &str,
    ) -> Result<UploadResult, UploadError> {
        if payload.is_empty() {
            return Err(UploadError::InvalidPayload);
        }

        let name = Self::destination_name(destination_hint);
        let request = UploadRequest {
            file: payload.as_str(),
            name: name.clone(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), message = %message, "Upload rejected");
            return Err(UploadError::Failed {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response.json().await?;

        info!("Uploaded artifact as {} -> {}", name, body.url);

        Ok(UploadResult { reference: body.url })
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_names_do_not_collide() {
        let a = HttpUploadGateway::destination_name("dream-recordings");
        let b = HttpUploadGateway::destination_name("dream-recordings");
        assert_ne!(a, b);
        assert!(a.starts_with("dream-recordings/"));
        assert!(a.ends_with(".wav"));
    }

    #[test]
    fn destination_hint_trailing_slash_is_normalized() {
        let name = HttpUploadGateway::destination_name("dream-recordings/");
        assert!(!name.contains("//"));
    }
}
