// storefront/src/platform/storage.rs

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use super::client::{send_empty, SupabaseClient};
use super::{BlobStorage, PlatformResult};

#[async_trait]
impl BlobStorage for SupabaseClient {
  #[instrument(name = "storage::upload", skip(self, bytes), fields(size = bytes.len()))]
  async fn upload(
    &self,
    bucket: &str,
    path: &str,
    bytes: Vec<u8>,
    content_type: &str,
    upsert: bool,
  ) -> PlatformResult<()> {
    send_empty(
      self
        .storage(Method::POST, bucket, Some(path))
        .header(CONTENT_TYPE, content_type)
        .header("x-upsert", if upsert { "true" } else { "false" })
        .body(bytes),
    )
    .await
  }

  #[instrument(name = "storage::remove", skip(self))]
  async fn remove(&self, bucket: &str, path: &str) -> PlatformResult<()> {
    send_empty(
      self
        .storage(Method::DELETE, bucket, None)
        .json(&json!({ "prefixes": [path] })),
    )
    .await
  }

  fn public_url(&self, bucket: &str, path: &str) -> String {
    self.url(&format!("/storage/v1/object/public/{}/{}", bucket, path))
  }
}
