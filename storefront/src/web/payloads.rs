// storefront/src/web/payloads.rs

//! Request bodies shared by several handlers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use crate::errors::{AppError, Result};
use horas_core::models::FileUpload;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file sent inline as base64. A `data:<type>;base64,` prefix is accepted
/// and its media type used when `content_type` is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadPayload {
  pub file_name: String,
  #[serde(default)]
  pub content_type: Option<String>,
  pub data: String,
}

impl UploadPayload {
  pub fn decode(self) -> Result<FileUpload> {
    let (prefix_type, encoded) = match self.data.split_once(";base64,") {
      Some((head, body)) if head.starts_with("data:") => (Some(head.trim_start_matches("data:").to_string()), body),
      _ => (None, self.data.as_str()),
    };
    let bytes = STANDARD
      .decode(encoded.trim())
      .map_err(|e| AppError::Validation(format!("File data is not valid base64: {}", e)))?;
    let content_type = self
      .content_type
      .clone()
      .filter(|ct| !ct.trim().is_empty())
      .or(prefix_type)
      .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    Ok(FileUpload::new(self.file_name.clone(), content_type, bytes))
  }
}
