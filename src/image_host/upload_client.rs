use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde_json::Value;

use super::ImageUploader;
use crate::{
    config::ImageHostConfig,
    error::{GatewayError, Result},
    models::{ImageBlob, UploadedImage, UPLOAD_FILE_NAME},
};

/// Multipart uploader for the image host.
#[derive(Clone)]
pub struct UploadClient {
    client: Client,
    upload_url: String,
}

impl UploadClient {
    pub fn new(config: &ImageHostConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    pub fn with_http_client(client: Client, config: &ImageHostConfig) -> Self {
        Self {
            client,
            upload_url: config.upload_url.clone(),
        }
    }

    async fn try_upload(&self, image: ImageBlob) -> Result<UploadedImage> {
        let size = image.len();
        let part = Part::bytes(image.bytes)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(image.content_type)?;
        let form = Form::new().part("file", part);

        log::debug!("Uploading {} bytes to {}", size, self.upload_url);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::ImageHostError(format!(
                "image host returned {}: {}",
                status,
                message.trim()
            )));
        }

        let body = response.text().await?;
        parse_upload_body(&body)
    }
}

#[async_trait]
impl ImageUploader for UploadClient {
    async fn upload(&self, image: ImageBlob) -> Option<UploadedImage> {
        match self.try_upload(image).await {
            Ok(uploaded) => {
                log::info!("✅ Image uploaded: {:?}", uploaded.src);
                Some(uploaded)
            }
            Err(e) => {
                log::error!("❌ Image upload failed: {}", e);
                None
            }
        }
    }
}

/// The host answers with a JSON array; the first element describes the file.
fn parse_upload_body(body: &str) -> Result<UploadedImage> {
    let malformed = || {
        GatewayError::ImageHostError(format!("unexpected upload response: {}", body.trim()))
    };

    let value: Value = serde_json::from_str(body).map_err(|_| malformed())?;
    let first = value
        .as_array()
        .and_then(|items| items.first())
        .filter(|item| item.is_object())
        .cloned()
        .ok_or_else(malformed)?;

    serde_json::from_value(first).map_err(|_| malformed())
}
