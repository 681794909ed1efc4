pub mod image_client;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::Result,
    models::{ImageModel, InferenceInputs, InferenceResult},
};

pub use image_client::ImageClient;

/// Text-to-image backend keyed by model.
///
/// Implementations must return `InferenceResult::Base64Image` for models whose
/// encoding is `Base64Json` and `InferenceResult::BinaryStream` otherwise.
#[async_trait]
pub trait ImageInference: Send + Sync {
    async fn run(&self, model: ImageModel, inputs: &InferenceInputs) -> Result<InferenceResult>;
}

/// Cloudflare API response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u32,
    pub message: String,
}

/// `result` payload of base64-returning models.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Base64ImageResult {
    pub image: Option<String>,
}
