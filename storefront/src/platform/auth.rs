// storefront/src/platform/auth.rs

//! Password sign-in, token introspection and admin provisioning.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use super::client::{send_empty, send_json, SupabaseClient};
use super::{AuthUser, IdentityProvider, PlatformResult, Session};

pub const ADMIN_ROLE: &str = "admin";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=minimal";
const USERS_PAGE_SIZE: &str = "1000";

#[derive(Deserialize)]
struct UserList {
  #[serde(default)]
  users: Vec<AuthUser>,
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
  #[instrument(name = "auth::sign_in", skip(self, password))]
  async fn sign_in(&self, email: &str, password: &str) -> PlatformResult<Session> {
    let anon = self.anon_key();
    send_json(
      self
        .auth(Method::POST, "/token", anon, anon)
        .query(&[("grant_type", "password")])
        .json(&json!({ "email": email, "password": password })),
    )
    .await
  }

  #[instrument(name = "auth::user_for_token", skip_all)]
  async fn user_for_token(&self, access_token: &str) -> PlatformResult<AuthUser> {
    send_json(self.auth(Method::GET, "/user", self.anon_key(), access_token)).await
  }

  #[instrument(name = "auth::is_admin", skip(self))]
  async fn is_admin(&self, user_id: Uuid) -> PlatformResult<bool> {
    let rows: Vec<Value> = send_json(self.rest(Method::GET, "user_roles").query(&[
      ("select", "role".to_string()),
      ("user_id", format!("eq.{}", user_id)),
      ("role", format!("eq.{}", ADMIN_ROLE)),
    ]))
    .await?;
    Ok(!rows.is_empty())
  }

  #[instrument(name = "auth::find_user_by_email", skip(self))]
  async fn find_user_by_email(&self, email: &str) -> PlatformResult<Option<AuthUser>> {
    let key = self.service_role_key()?;
    let list: UserList = send_json(
      self
        .auth(Method::GET, "/admin/users", key, key)
        .query(&[("page", "1"), ("per_page", USERS_PAGE_SIZE)]),
    )
    .await?;
    Ok(
      list
        .users
        .into_iter()
        .find(|user| user.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email))),
    )
  }

  #[instrument(name = "auth::create_user", skip(self, password))]
  async fn create_user(&self, email: &str, password: &str) -> PlatformResult<AuthUser> {
    let key = self.service_role_key()?;
    send_json(
      self
        .auth(Method::POST, "/admin/users", key, key)
        .json(&json!({ "email": email, "password": password, "email_confirm": true })),
    )
    .await
  }

  #[instrument(name = "auth::grant_admin_role", skip(self))]
  async fn grant_admin_role(&self, user_id: Uuid) -> PlatformResult<()> {
    self.service_role_key()?;
    send_empty(
      self
        .rest(Method::POST, "user_roles")
        .query(&[("on_conflict", "user_id,role")])
        .header("Prefer", MERGE_DUPLICATES)
        .json(&json!({ "user_id": user_id, "role": ADMIN_ROLE })),
    )
    .await
  }

  #[instrument(name = "auth::upsert_admin_user", skip(self))]
  async fn upsert_admin_user(&self, user_id: Uuid, email: &str) -> PlatformResult<()> {
    self.service_role_key()?;
    send_empty(
      self
        .rest(Method::POST, "admin_users")
        .query(&[("on_conflict", "user_id")])
        .header("Prefer", MERGE_DUPLICATES)
        .json(&json!({ "user_id": user_id, "email": email })),
    )
    .await
  }
}
