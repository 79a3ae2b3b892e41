// storefront/src/pipelines/admin_pipeline.rs

//! Admin provisioning: find or create the account, grant the admin role,
//! then record it in `admin_users`. Every write is an upsert, so re-running
//! for the same email is safe.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::pipelines::contexts::AdminCtxData;
use crate::platform::IdentityProvider;
use horas_core::{ContextData, Pipeline, PipelineControl, PipelineResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedAdmin {
  pub user_id: Uuid,
  pub email: String,
  pub created: bool,
}

pub fn build_admin_pipeline() -> Pipeline<AdminCtxData, AppError> {
  let mut p = Pipeline::<AdminCtxData, AppError>::new(&[
    ("resolve_or_create_user", false),
    ("grant_admin_role", false),
    ("register_admin_user", false),
  ]);
  p.on_root("resolve_or_create_user", resolve_or_create_user);
  p.on_root("grant_admin_role", grant_admin_role);
  p.on_root("register_admin_user", register_admin_user);
  p
}

#[instrument(name = "admin::provision", skip(identity, password))]
pub async fn provision_admin(identity: Arc<dyn IdentityProvider>, email: &str, password: &str) -> Result<ProvisionedAdmin> {
  let email = email.trim();
  if email.is_empty() || password.is_empty() {
    return Err(AppError::Validation("Email and password are required".to_string()));
  }

  let ctx_data = ContextData::new(AdminCtxData {
    identity,
    email: email.to_string(),
    password: password.to_string(),
    user_id: None,
    created: false,
  });
  if let PipelineResult::Stopped = build_admin_pipeline().run(ctx_data.clone()).await? {
    return Err(AppError::Internal("Admin provisioning stopped early".to_string()));
  }

  let guard = ctx_data.read();
  let user_id = guard
    .user_id
    .ok_or_else(|| AppError::Internal("Admin provisioning finished without a user id".to_string()))?;
  Ok(ProvisionedAdmin {
    user_id,
    email: guard.email.clone(),
    created: guard.created,
  })
}

fn identity_and_user(ctx_data: &ContextData<AdminCtxData>) -> Result<(Arc<dyn IdentityProvider>, Uuid, String)> {
  let guard = ctx_data.read();
  let user_id = guard
    .user_id
    .ok_or_else(|| AppError::Internal("User was not resolved before granting access".to_string()))?;
  Ok((guard.identity.clone(), user_id, guard.email.clone()))
}

async fn resolve_or_create_user(ctx_data: ContextData<AdminCtxData>) -> Result<PipelineControl> {
  let (identity, email, password) = {
    let guard = ctx_data.read();
    (guard.identity.clone(), guard.email.clone(), guard.password.clone())
  };

  let (user, created) = match identity.find_user_by_email(&email).await? {
    Some(user) => (user, false),
    None => (identity.create_user(&email, &password).await?, true),
  };
  info!(user_id = %user.id, created, "Admin account resolved.");

  let mut guard = ctx_data.write();
  guard.user_id = Some(user.id);
  guard.created = created;
  Ok(PipelineControl::Continue)
}

async fn grant_admin_role(ctx_data: ContextData<AdminCtxData>) -> Result<PipelineControl> {
  let (identity, user_id, _) = identity_and_user(&ctx_data)?;
  identity.grant_admin_role(user_id).await?;
  Ok(PipelineControl::Continue)
}

async fn register_admin_user(ctx_data: ContextData<AdminCtxData>) -> Result<PipelineControl> {
  let (identity, user_id, email) = identity_and_user(&ctx_data)?;
  identity.upsert_admin_user(user_id, &email).await?;
  Ok(PipelineControl::Continue)
}
