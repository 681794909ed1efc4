pub mod upload_client;

use async_trait::async_trait;

use crate::models::{ImageBlob, UploadedImage};

pub use upload_client::UploadClient;

/// Image hosting service.
///
/// Failures never escape: network errors, non-2xx replies and unreadable
/// bodies all come back as `None`.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, image: ImageBlob) -> Option<UploadedImage>;
}
