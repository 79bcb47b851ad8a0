//! Signature capture: an image file becomes a `data:` URL stored as
//! `BusinessSettings::signature_data_url`.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("Unsupported signature image type '{0}' (use png, jpg, gif or svg)")]
    UnsupportedType(String),

    #[error("Signature image is empty")]
    Empty,

    #[error("Failed to read signature image: {0}")]
    Io(#[from] std::io::Error),
}

/// MIME type by file extension.
fn mime_for(path: &Path) -> Result<&'static str, SignatureError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "svg" => Ok("image/svg+xml"),
        _ => Err(SignatureError::UnsupportedType(ext)),
    }
}

/// Encodes raw image bytes as a data URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Reads an image file and returns it as a data URL.
pub async fn capture_from_file(path: &Path) -> Result<String, SignatureError> {
    let mime = mime_for(path)?;
    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(SignatureError::Empty);
    }
    Ok(to_data_url(mime, &bytes))
}
