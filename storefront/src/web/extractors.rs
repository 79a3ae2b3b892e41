// storefront/src/web/extractors.rs

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::platform::AuthUser;
use crate::services::auth_service;
use crate::state::AppState;

pub const CART_ID_HEADER: &str = "X-Cart-ID";

/// Shopper session id from the `X-Cart-ID` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSession {
  pub id: Uuid,
}

impl FromRequest for CartSession {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let id = req
      .headers()
      .get(CART_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| Uuid::parse_str(value.trim()).ok());
    ready(match id {
      Some(id) => Ok(CartSession { id }),
      None => {
        warn!("Missing or invalid {} header.", CART_ID_HEADER);
        Err(AppError::Validation(format!(
          "Missing or invalid {} header. Create a cart with POST /api/v1/cart first.",
          CART_ID_HEADER
        )))
      }
    })
  }
}

/// An authenticated admin, resolved from the `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AdminUser {
  pub user: AuthUser,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
  let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.split_once(' ')?;
  let token = token.trim();
  (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let token = bearer_token(req);
    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("Application state is not configured".to_string()))?;
      let token = token.ok_or_else(|| AppError::Auth("Missing bearer token".to_string()))?;
      let user = auth_service::verify_admin(state.platform.identity.as_ref(), &token).await?;
      Ok(AdminUser { user })
    })
  }
}
