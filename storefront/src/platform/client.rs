// storefront/src/platform/client.rs

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{PlatformError, PlatformResult};
use crate::config::AppConfig;

const USER_AGENT: &str = concat!("horas-storefront/", env!("CARGO_PKG_VERSION"));

/// Thin HTTP client for the hosted data, storage and auth APIs.
///
/// Data and storage calls use the service-role key when one is configured,
/// otherwise the anon key. Admin user management always needs the
/// service-role key.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
  http: Client,
  base_url: String,
  anon_key: String,
  service_role_key: Option<String>,
}

impl SupabaseClient {
  pub fn new(
    base_url: impl Into<String>,
    anon_key: impl Into<String>,
    service_role_key: Option<String>,
  ) -> PlatformResult<Self> {
    let http = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(SupabaseClient {
      http,
      base_url: base_url.into().trim_end_matches('/').to_string(),
      anon_key: anon_key.into(),
      service_role_key,
    })
  }

  pub fn from_config(config: &AppConfig) -> PlatformResult<Self> {
    Self::new(
      config.supabase_url.clone(),
      config.supabase_anon_key.clone(),
      config.supabase_service_role_key.clone(),
    )
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn has_service_role(&self) -> bool {
    self.service_role_key.is_some()
  }

  fn data_key(&self) -> &str {
    self.service_role_key.as_deref().unwrap_or(&self.anon_key)
  }

  pub(crate) fn anon_key(&self) -> &str {
    &self.anon_key
  }

  pub(crate) fn service_role_key(&self) -> PlatformResult<&str> {
    self
      .service_role_key
      .as_deref()
      .ok_or_else(|| PlatformError::Config("SUPABASE_SERVICE_ROLE_KEY is required for admin user management".to_string()))
  }

  pub(crate) fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  /// `{url}/rest/v1/{table}` authorised with the data key.
  pub(crate) fn rest(&self, method: Method, table: &str) -> RequestBuilder {
    let url = self.url(&format!("/rest/v1/{}", table));
    with_key(self.http.request(method, url), self.data_key())
  }

  /// `{url}/storage/v1/object/{bucket}[/{path}]` authorised with the data key.
  pub(crate) fn storage(&self, method: Method, bucket: &str, path: Option<&str>) -> RequestBuilder {
    let url = match path {
      Some(path) => self.url(&format!("/storage/v1/object/{}/{}", bucket, path)),
      None => self.url(&format!("/storage/v1/object/{}", bucket)),
    };
    with_key(self.http.request(method, url), self.data_key())
  }

  /// `{url}/auth/v1{path}` with the given bearer; `apikey` stays the anon key
  /// unless the caller is acting with the service role.
  pub(crate) fn auth(&self, method: Method, path: &str, apikey: &str, bearer: &str) -> RequestBuilder {
    let url = self.url(&format!("/auth/v1{}", path));
    self.http.request(method, url).header("apikey", apikey).bearer_auth(bearer)
  }
}

fn with_key(request: RequestBuilder, key: &str) -> RequestBuilder {
  request.header("apikey", key).bearer_auth(key)
}

/// Sends the request and fails on any non-success status.
#[instrument(name = "platform::send", skip_all, level = "debug")]
pub(crate) async fn send(request: RequestBuilder) -> PlatformResult<Response> {
  let response = request.send().await?;
  let status = response.status();
  debug!(status = status.as_u16(), url = %response.url().path(), "Platform responded.");
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().await.unwrap_or_default();
  Err(PlatformError::Api {
    status: status.as_u16(),
    message: error_message(status, &body),
  })
}

pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> PlatformResult<T> {
  let response = send(request).await?;
  let body = response.bytes().await?;
  serde_json::from_slice(&body).map_err(|e| PlatformError::Decode(e.to_string()))
}

pub(crate) async fn send_empty(request: RequestBuilder) -> PlatformResult<()> {
  send(request).await.map(|_| ())
}

/// The data API says `message`, auth says `error_description` or `msg`.
fn error_message(status: StatusCode, body: &str) -> String {
  if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
    for key in ["message", "error_description", "msg", "error"] {
      if let Some(Value::String(message)) = fields.get(key) {
        if !message.is_empty() {
          return message.clone();
        }
      }
    }
  }
  let trimmed = body.trim();
  if trimmed.is_empty() {
    status.canonical_reason().unwrap_or("Request failed").to_string()
  } else {
    trimmed.to_string()
  }
}
