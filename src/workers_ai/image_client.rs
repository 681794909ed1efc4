use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{Client, StatusCode};

use super::{ApiResponse, Base64ImageResult, ImageInference};
use crate::{
    config::WorkersAiConfig,
    error::{GatewayError, Result},
    models::{ImageModel, ImageStream, InferenceInputs, InferenceResult, ResponseEncoding},
};

/// Workers AI REST client for the text-to-image models.
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base_url: String,
    account_id: String,
    api_token: String,
}

impl ImageClient {
    pub fn new(config: &WorkersAiConfig) -> Result<Self> {
        Self::with_http_client(Client::new(), config)
    }

    pub fn with_http_client(client: Client, config: &WorkersAiConfig) -> Result<Self> {
        let (account_id, api_token) = config.credentials()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn run_url(&self, model: ImageModel) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url,
            self.account_id,
            model.id()
        )
    }
}

#[async_trait]
impl ImageInference for ImageClient {
    async fn run(&self, model: ImageModel, inputs: &InferenceInputs) -> Result<InferenceResult> {
        log::info!("Generating image with model: {}", model.id());

        let response = self
            .client
            .post(self.run_url(model))
            .bearer_auth(&self.api_token)
            .json(inputs)
            .send()
            .await?;

        let status = response.status();
        log::debug!("Workers AI answered {} for {}", status, model.id());

        match model.encoding() {
            ResponseEncoding::Base64Json => {
                let body = response.text().await?;
                parse_base64_response(status, &body)
            }
            ResponseEncoding::BinaryStream => {
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(upstream_error(status, &body));
                }
                let stream: ImageStream =
                    Box::pin(response.bytes_stream().map_err(GatewayError::from));
                Ok(InferenceResult::BinaryStream(stream))
            }
        }
    }
}

fn parse_base64_response(status: StatusCode, body: &str) -> Result<InferenceResult> {
    let envelope: ApiResponse<Base64ImageResult> = serde_json::from_str(body)
        .map_err(|_| upstream_error(status, body))?;

    if !envelope.success || !status.is_success() {
        return Err(envelope_error(status, &envelope));
    }

    Ok(InferenceResult::Base64Image {
        image: envelope.result.and_then(|result| result.image),
    })
}

fn envelope_error<T>(status: StatusCode, envelope: &ApiResponse<T>) -> GatewayError {
    match envelope.errors.first() {
        Some(detail) => GatewayError::InferenceError(format!(
            "Workers AI error (code: {}): {}",
            detail.code, detail.message
        )),
        None => GatewayError::InferenceError(format!("Workers AI returned {}", status)),
    }
}

/// Builds an error from a failed response, preferring the envelope's message.
fn upstream_error(status: StatusCode, body: &str) -> GatewayError {
    match serde_json::from_str::<ApiResponse<serde_json::Value>>(body) {
        Ok(envelope) => envelope_error(status, &envelope),
        Err(_) => GatewayError::InferenceError(format!(
            "Workers AI returned {}: {}",
            status,
            body.trim()
        )),
    }
}
