use std::fmt;
use std::pin::Pin;

use actix_web::web::Bytes;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use futures::stream::{Stream, StreamExt};

use crate::error::Result;

pub const PNG_CONTENT_TYPE: &str = "image/png";
pub const UPLOAD_FILE_NAME: &str = "image.png";

/// Standard alphabet, padding optional, non-zero trailing bits ignored.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Image body streamed from the inference backend.
pub type ImageStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// What the inference backend returned, shaped by the model's encoding.
pub enum InferenceResult {
    Base64Image { image: Option<String> },
    BinaryStream(ImageStream),
}

impl fmt::Debug for InferenceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceResult::Base64Image { image } => f
                .debug_struct("Base64Image")
                .field("image_len", &image.as_ref().map(String::len))
                .finish(),
            InferenceResult::BinaryStream(_) => f.write_str("BinaryStream(..)"),
        }
    }
}

/// An in-memory image ready to be returned or uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl ImageBlob {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: PNG_CONTENT_TYPE,
        }
    }

    /// Decodes a base64 image, with or without a `data:image/<type>;base64,`
    /// prefix. The result is always tagged as PNG.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let payload: String = strip_data_uri(encoded)
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = LENIENT_BASE64.decode(payload)?;
        Ok(Self::png(bytes))
    }

    /// Buffers a streamed body so it can be sent as a multipart part.
    pub async fn collect(mut stream: ImageStream) -> Result<Self> {
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk?);
        }
        Ok(Self::png(bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn strip_data_uri(encoded: &str) -> &str {
    let Some(rest) = encoded.strip_prefix("data:image/") else {
        return encoded;
    };
    match rest.split_once(";base64,") {
        Some((subtype, payload))
            if !subtype.is_empty()
                && subtype.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            payload
        }
        _ => encoded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use futures::stream;

    // 1x1 transparent PNG
    const PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    #[test]
    fn test_data_uri_prefix_is_optional() {
        let raw = ImageBlob::from_base64(PIXEL).unwrap();
        let wrapped =
            ImageBlob::from_base64(&format!("data:image/png;base64,{}", PIXEL)).unwrap();
        assert_eq!(raw, wrapped);
        assert_eq!(&raw.bytes[1..4], b"PNG");
        assert_eq!(raw.content_type, "image/png");
    }

    #[test]
    fn test_other_image_subtypes_are_stripped() {
        let jpeg = ImageBlob::from_base64("data:image/jpeg;base64,AAAA").unwrap();
        assert_eq!(jpeg.bytes, vec![0, 0, 0]);
        assert_eq!(jpeg.content_type, "image/png");
    }

    #[test]
    fn test_unpadded_and_wrapped_input() {
        assert_eq!(ImageBlob::from_base64("AAA").unwrap().bytes, vec![0, 0]);
        assert_eq!(ImageBlob::from_base64("AA\nAA").unwrap().bytes, vec![0, 0, 0]);
    }

    #[test]
    fn test_non_canonical_trailing_bits_decode() {
        // "AB==" sets bits past the single encoded byte
        assert_eq!(ImageBlob::from_base64("AB==").unwrap().bytes, vec![0]);
        assert_eq!(
            ImageBlob::from_base64("data:image/png;base64,AAB").unwrap().bytes,
            vec![0, 0]
        );
    }

    #[test]
    fn test_invalid_base64_fails() {
        let err = ImageBlob::from_base64("not*base64").unwrap_err();
        assert!(matches!(err, GatewayError::DecodeError(_)));
        // a non-image data URI is not stripped, so the colon is rejected
        assert!(ImageBlob::from_base64("data:text/plain;base64,AAAA").is_err());
    }

    #[actix_web::test]
    async fn test_collect_concatenates_chunks() {
        let chunks: ImageStream = Box::pin(stream::iter(vec![
            Ok(Bytes::from_static(b"\x89PN")),
            Ok(Bytes::from_static(b"G")),
        ]));
        let blob = ImageBlob::collect(chunks).await.unwrap();
        assert_eq!(blob.bytes, b"\x89PNG".to_vec());
        assert_eq!(blob.len(), 4);
    }

    #[actix_web::test]
    async fn test_collect_propagates_stream_errors() {
        let chunks: ImageStream = Box::pin(stream::iter(vec![
            Ok(Bytes::from_static(b"\x89PN")),
            Err(GatewayError::StreamError("connection reset".into())),
        ]));
        assert!(ImageBlob::collect(chunks).await.is_err());
    }
}
