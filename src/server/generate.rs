use actix_web::HttpResponse;
use uuid::Uuid;

use super::AppState;
use crate::{
    error::{GatewayError, Result},
    logger,
    models::{
        GenerationRequest, ImageBlob, ImageUrlResponse, InferenceInputs, InferenceResult,
        ResponseEncoding, PNG_CONTENT_TYPE,
    },
};

/// Runs one generation request: validate, infer, normalize, then either
/// return the image or relay it to the image host.
pub async fn handle(state: &AppState, body: &[u8]) -> Result<HttpResponse> {
    let request = GenerationRequest::from_slice(body)?;
    let upload = request.upload();
    let prompt = request.prompt()?;
    let model = request.model();
    let inputs = InferenceInputs::for_model(model, prompt, request.resolution);

    let request_id = Uuid::new_v4();
    log::info!(
        "[req:{}] 🎨 {} ({} chars), upload={}",
        request_id,
        model.key(),
        inputs.prompt.chars().count(),
        upload
    );

    let result = {
        let _timer = logger::timer(&format!("[req:{}] inference", request_id));
        state.inference.run(model, &inputs).await?
    };

    match model.encoding() {
        ResponseEncoding::Base64Json => {
            let image = match result {
                InferenceResult::Base64Image { image: Some(image) } if !image.is_empty() => image,
                _ => return Err(GatewayError::MissingImage),
            };
            let blob = ImageBlob::from_base64(&image)?;

            if upload {
                relay(state, blob, request_id).await
            } else {
                Ok(HttpResponse::Ok()
                    .content_type(PNG_CONTENT_TYPE)
                    .body(blob.bytes))
            }
        }
        ResponseEncoding::BinaryStream => {
            let stream = match result {
                InferenceResult::BinaryStream(stream) => stream,
                InferenceResult::Base64Image { .. } => {
                    return Err(GatewayError::InferenceError(format!(
                        "{} returned JSON where an image body was expected",
                        model.id()
                    )))
                }
            };

            if upload {
                let blob = ImageBlob::collect(stream).await?;
                relay(state, blob, request_id).await
            } else {
                Ok(HttpResponse::Ok()
                    .content_type(PNG_CONTENT_TYPE)
                    .streaming(stream))
            }
        }
    }
}

async fn relay(state: &AppState, blob: ImageBlob, request_id: Uuid) -> Result<HttpResponse> {
    log::debug!("[req:{}] relaying {} bytes to image host", request_id, blob.len());

    let uploaded = {
        let _timer = logger::timer(&format!("[req:{}] upload", request_id));
        state.uploader.upload(blob).await
    };

    match uploaded.and_then(|uploaded| uploaded.src).filter(|src| !src.is_empty()) {
        Some(src) => {
            let hosted = ImageUrlResponse::hosted(&state.image_host_base, &src);
            log::info!("[req:{}] 🔗 {}", request_id, hosted.image_url);
            Ok(HttpResponse::Ok().json(hosted))
        }
        None => Err(GatewayError::UploadFailed),
    }
}
