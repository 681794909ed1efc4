use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, Result};

pub const DEFAULT_DIMENSION: u32 = 1024;
pub const FLUX_NUM_STEPS: u32 = 8;

/// Body of a generation POST.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationRequest {
    pub prompt: Option<String>,
    /// Kept loose: anything that is not a recognized key, strings or not,
    /// resolves to the default model.
    pub model: Option<Value>,
    pub resolution: Option<Resolution>,
    pub upload: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Resolution {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl GenerationRequest {
    /// Only JSON objects carry fields. An array parses as a request with no
    /// fields at all, so it fails later on the missing prompt; any other
    /// value is a bad request.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| GatewayError::BadRequest(e.to_string()))?;
        match value {
            Value::Object(_) => {
                serde_json::from_value(value).map_err(|e| GatewayError::BadRequest(e.to_string()))
            }
            Value::Array(_) => Ok(Self::default()),
            other => Err(GatewayError::BadRequest(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    /// The trimmed prompt, or `MissingPrompt` when absent or blank.
    pub fn prompt(&self) -> Result<&str> {
        match self.prompt.as_deref().map(str::trim) {
            Some(prompt) if !prompt.is_empty() => Ok(prompt),
            _ => Err(GatewayError::MissingPrompt),
        }
    }

    pub fn upload(&self) -> bool {
        self.upload.unwrap_or(false)
    }

    pub fn model(&self) -> ImageModel {
        ImageModel::from_key(self.model.as_ref().and_then(Value::as_str))
    }
}

/// How a model hands back its image. Fixed per model, never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseEncoding {
    /// JSON envelope with a base64 `image` field.
    Base64Json,
    /// Raw PNG bytes as the response body.
    BinaryStream,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageModel {
    DreamshaperLcm,
    SdxlBase,
    SdxlLightning,
    #[default]
    FluxSchnell,
}

impl ImageModel {
    pub const ALL: [ImageModel; 4] = [
        ImageModel::DreamshaperLcm,
        ImageModel::SdxlBase,
        ImageModel::SdxlLightning,
        ImageModel::FluxSchnell,
    ];

    /// Resolves a request key. Unknown keys and a missing key both yield the
    /// default model; no error is reported.
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("dreamshaper-8-lcm") => ImageModel::DreamshaperLcm,
            Some("stable-diffusion-xl-base-1.0") => ImageModel::SdxlBase,
            Some("stable-diffusion-xl-lightning") => ImageModel::SdxlLightning,
            Some("flux-1-schnell") => ImageModel::FluxSchnell,
            _ => ImageModel::default(),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ImageModel::DreamshaperLcm => "dreamshaper-8-lcm",
            ImageModel::SdxlBase => "stable-diffusion-xl-base-1.0",
            ImageModel::SdxlLightning => "stable-diffusion-xl-lightning",
            ImageModel::FluxSchnell => "flux-1-schnell",
        }
    }

    /// Workers AI model identifier.
    pub fn id(&self) -> &'static str {
        match self {
            ImageModel::DreamshaperLcm => "@cf/lykon/dreamshaper-8-lcm",
            ImageModel::SdxlBase => "@cf/stabilityai/stable-diffusion-xl-base-1.0",
            ImageModel::SdxlLightning => "@cf/bytedance/stable-diffusion-xl-lightning",
            ImageModel::FluxSchnell => "@cf/black-forest-labs/flux-1-schnell",
        }
    }

    pub fn encoding(&self) -> ResponseEncoding {
        match self {
            ImageModel::FluxSchnell => ResponseEncoding::Base64Json,
            _ => ResponseEncoding::BinaryStream,
        }
    }

    /// (key, identifier, description) for every model the gateway accepts.
    pub fn supported_models() -> Vec<(&'static str, &'static str, &'static str)> {
        Self::ALL
            .iter()
            .map(|model| {
                let description = match model {
                    ImageModel::DreamshaperLcm => "DreamShaper 8 LCM, photorealistic fine-tune",
                    ImageModel::SdxlBase => "Stable Diffusion XL base 1.0",
                    ImageModel::SdxlLightning => "SDXL-Lightning, few-step distillation",
                    ImageModel::FluxSchnell => "FLUX.1 [schnell] (default)",
                };
                (model.key(), model.id(), description)
            })
            .collect()
    }
}

/// Inputs sent to the inference backend. Flux takes `num_steps`; every
/// other model takes `width`/`height`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceInputs {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_steps: Option<u32>,
}

impl InferenceInputs {
    pub fn for_model(model: ImageModel, prompt: &str, resolution: Option<Resolution>) -> Self {
        let prompt = prompt.trim().to_string();
        match model {
            ImageModel::FluxSchnell => Self {
                prompt,
                width: None,
                height: None,
                num_steps: Some(FLUX_NUM_STEPS),
            },
            _ => {
                let resolution = resolution.unwrap_or_default();
                Self {
                    prompt,
                    width: Some(resolution.width.unwrap_or(DEFAULT_DIMENSION)),
                    height: Some(resolution.height.unwrap_or(DEFAULT_DIMENSION)),
                    num_steps: None,
                }
            }
        }
    }
}
