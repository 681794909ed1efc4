use serde::{Deserialize, Serialize};

/// JSON error body shared by every failing JSON response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<String>,
    pub messages: Vec<String>,
}

impl ErrorEnvelope {
    pub fn single(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            messages: Vec::new(),
        }
    }
}

/// Success body for `upload: true` requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrlResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl ImageUrlResponse {
    pub fn hosted(base_url: &str, src: &str) -> Self {
        Self {
            image_url: format!("{}{}", base_url, src),
        }
    }
}

/// First element of the image host's upload reply. Only `src` is consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub src: Option<String>,
}
