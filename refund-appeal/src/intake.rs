//! Evidence intake: media type check and transport encoding.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{Result, ValidationError};

/// The only media type accepted as evidence.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A user-supplied evidence file, read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceDocument {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl EvidenceDocument {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring the media type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;

        let media_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "evidence".to_string());

        info!(document = %name, media_type = %media_type, bytes = bytes.len(), "Loaded evidence file");

        Ok(Self::new(name, media_type, bytes))
    }
}

/// Base64 form of an accepted document, ready for inline embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPayload {
    pub name: String,
    pub media_type: String,
    pub data: String,
}

impl EncodedPayload {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Reject anything that is not exactly `application/pdf`, then base64 the bytes.
pub fn encode(document: &EvidenceDocument) -> std::result::Result<EncodedPayload, ValidationError> {
    if document.media_type != PDF_MEDIA_TYPE {
        return Err(ValidationError::UnsupportedType(document.media_type.clone()));
    }

    Ok(EncodedPayload {
        name: document.name.clone(),
        media_type: PDF_MEDIA_TYPE.to_string(),
        data: STANDARD.encode(&document.bytes),
    })
}

/// Inverse of [`encode`]. Only fails on data that did not come from `encode`.
pub fn decode(payload: &EncodedPayload) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(&payload.data)
}
