//! Signed uploads to the Cloudinary image API.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{ImageHost, ImageFile, UPLOAD_TAG, sign_params};
use crate::config::CloudinaryConfig;
use crate::error::GatewayError;

/// Production API root.
pub const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// [`ImageHost`] backed by Cloudinary's upload endpoint.
#[derive(Clone)]
pub struct CloudinaryImageHost {
    http_client: Client,
    api_base: String,
    config: CloudinaryConfig,
}

impl std::fmt::Debug for CloudinaryImageHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryImageHost")
            .field("api_base", &self.api_base)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryImageHost {
    /// Creates a client for the production API.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the HTTP client cannot
    /// be built.
    pub fn new(config: CloudinaryConfig, timeout: Duration) -> Result<Self, GatewayError> {
        Self::with_api_base(config, timeout, CLOUDINARY_API_BASE)
    }

    /// Creates a client against a custom API root.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the HTTP client cannot
    /// be built.
    pub fn with_api_base(
        config: CloudinaryConfig,
        timeout: Duration,
        api_base: &str,
    ) -> Result<Self, GatewayError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("image host client: {e}")))?;
        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            config,
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_base, self.config.cloud_name
        )
    }
}

#[async_trait]
impl ImageHost for CloudinaryImageHost {
    async fn upload(&self, image: ImageFile) -> Result<String, GatewayError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signed = BTreeMap::from([
            ("tags".to_string(), UPLOAD_TAG.to_string()),
            ("timestamp".to_string(), timestamp.clone()),
            ("upload_preset".to_string(), UPLOAD_TAG.to_string()),
        ]);
        let signature = sign_params(&signed, &self.config.api_secret);

        let file = Part::bytes(image.bytes).file_name(image.filename.clone());
        let form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("tags", UPLOAD_TAG)
            .text("timestamp", timestamp)
            .text("upload_preset", UPLOAD_TAG)
            .text("signature", signature)
            .part("file", file);

        let response = self
            .http_client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| GatewayError::ImageUpload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(GatewayError::ImageUpload(format!("{status}: {detail}")));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::ImageUpload(format!("unexpected response: {e}")))?;

        tracing::info!(filename = %image.filename, url = %uploaded.secure_url, "image uploaded");
        Ok(uploaded.secure_url)
    }
}
