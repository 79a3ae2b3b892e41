// storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AdminLoginPayload {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::admin_login", skip(app_state, payload), fields(email = %payload.email))]
pub async fn admin_login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AdminLoginPayload>,
) -> Result<HttpResponse, AppError> {
  let session =
    auth_service::admin_sign_in(app_state.platform.identity.as_ref(), &payload.email, &payload.password).await?;
  Ok(HttpResponse::Ok().json(session))
}
