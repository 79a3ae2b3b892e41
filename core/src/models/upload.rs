// core/src/models/upload.rs

use serde::{Deserialize, Serialize};

const FALLBACK_EXTENSION: &str = "jpg";

/// A file handed to the storefront for blob storage (payment screenshots,
/// product images).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileUpload {
  pub file_name: String,
  pub content_type: String,
  #[serde(skip)]
  pub bytes: Vec<u8>,
}

impl FileUpload {
  pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
    FileUpload {
      file_name: file_name.into(),
      content_type: content_type.into(),
      bytes,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }

  /// Lower-cased text after the last `.`, or `jpg` when there is none.
  pub fn extension(&self) -> String {
    match self.file_name.rsplit_once('.') {
      Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => ext.to_ascii_lowercase(),
      _ => FALLBACK_EXTENSION.to_string(),
    }
  }

  /// Object key `<stem>.<ext>` inside a bucket.
  pub fn storage_path(&self, stem: &str) -> String {
    format!("{}.{}", stem, self.extension())
  }
}
