pub mod config;
pub mod error;
pub mod image_host;
pub mod logger;
pub mod models;
pub mod server;
pub mod workers_ai;

pub use config::{Config, ImageHostConfig, ServerConfig, WorkersAiConfig};
pub use error::{GatewayError, Result};
pub use image_host::{ImageUploader, UploadClient};
pub use models::*;
pub use server::{AppState, LandingPage};
pub use workers_ai::{ImageClient, ImageInference};
