// storefront/src/services/auth_service.rs

use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::platform::{AuthUser, IdentityProvider, PlatformError, Session};

pub const MISSING_CREDENTIALS: &str = "Email and password are required";
pub const NOT_AN_ADMIN: &str = "Access denied. Admin privileges required.";
pub const INVALID_TOKEN: &str = "Invalid or expired session";

/// Credential failures come back from the identity API as 4xx; those are
/// the shopper's problem, everything else is upstream.
fn credential_error(err: PlatformError) -> AppError {
  match err {
    PlatformError::Api { status, message } if (400..500).contains(&status) => AppError::Auth(message),
    other => other.into(),
  }
}

/// Signs an admin in. The session is only handed out when the user holds
/// the admin role.
#[instrument(name = "auth::admin_sign_in", skip(identity, password))]
pub async fn admin_sign_in(identity: &dyn IdentityProvider, email: &str, password: &str) -> Result<Session> {
  let email = email.trim();
  if email.is_empty() || password.is_empty() {
    return Err(AppError::Validation(MISSING_CREDENTIALS.to_string()));
  }
  let session = identity.sign_in(email, password).await.map_err(credential_error)?;
  if !identity.is_admin(session.user.id).await? {
    warn!(user_id = %session.user.id, "Sign-in by a user without the admin role.");
    return Err(AppError::Forbidden(NOT_AN_ADMIN.to_string()));
  }
  info!(user_id = %session.user.id, "Admin signed in.");
  Ok(session)
}

/// Resolves a bearer token to an admin user.
#[instrument(name = "auth::verify_admin", skip_all)]
pub async fn verify_admin(identity: &dyn IdentityProvider, access_token: &str) -> Result<AuthUser> {
  let user = identity.user_for_token(access_token).await.map_err(|err| match err {
    PlatformError::Api { status, .. } if (400..500).contains(&status) => AppError::Auth(INVALID_TOKEN.to_string()),
    other => other.into(),
  })?;
  if !identity.is_admin(user.id).await? {
    return Err(AppError::Forbidden(NOT_AN_ADMIN.to_string()));
  }
  Ok(user)
}
