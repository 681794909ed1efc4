use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::ErrorEnvelope;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Missing prompt")]
    MissingPrompt,

    #[error("No image found in the response")]
    MissingImage,

    #[error("Image upload failed")]
    UploadFailed,

    #[error("Image host error: {0}")]
    ImageHostError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid base64 image data: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("Image stream error: {0}")]
    StreamError(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    /// Message placed in the `errors` array of the JSON error body.
    fn client_message(&self) -> String {
        match self {
            GatewayError::BadRequest(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

// CORS headers are added by the server-wide DefaultHeaders middleware, so
// these responses carry them without repeating the header set here.
impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingPrompt | GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("❌ Request failed: {}", self);
        }

        match self {
            GatewayError::MissingPrompt => HttpResponse::build(status)
                .content_type("text/plain;charset=UTF-8")
                .body("Missing prompt"),
            other => HttpResponse::build(status)
                .json(ErrorEnvelope::single(other.client_message())),
        }
    }
}
