// storefront/src/web/handlers/admin_handlers.rs

//! Admin console endpoints. Every handler takes an [`AdminUser`], so an
//! unauthenticated or non-admin caller never reaches the service layer.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::admin_service::{self, ProductForm};
use crate::state::AppState;
use crate::web::extractors::AdminUser;
use crate::web::payloads::UploadPayload;

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
  pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct NewArrivalPayload {
  pub is_new_arrival: bool,
}

/// Product form with an optional inline image.
#[derive(Debug, Deserialize)]
pub struct CreateProductPayload {
  #[serde(flatten)]
  pub form: ProductForm,
  #[serde(default)]
  pub image: Option<UploadPayload>,
}

#[instrument(name = "handler::admin_dashboard", skip_all, fields(admin = %admin.user.id))]
pub async fn dashboard_handler(app_state: web::Data<AppState>, admin: AdminUser) -> Result<HttpResponse, AppError> {
  let stats = admin_service::dashboard(&app_state.platform).await?;
  Ok(HttpResponse::Ok().json(stats))
}

#[instrument(name = "handler::admin_list_orders", skip_all, fields(admin = %admin.user.id))]
pub async fn list_orders_handler(app_state: web::Data<AppState>, admin: AdminUser) -> Result<HttpResponse, AppError> {
  let orders = admin_service::list_orders(&app_state.platform).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(name = "handler::admin_order_items", skip_all, fields(admin = %admin.user.id))]
pub async fn order_items_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let items = admin_service::order_items(&app_state.platform, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "items": items })))
}

#[instrument(name = "handler::admin_update_order_status", skip_all, fields(admin = %admin.user.id))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
  payload: web::Json<StatusPayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let status = admin_service::update_order_status(&app_state.platform, order_id, &payload.status).await?;
  Ok(HttpResponse::Ok().json(json!({ "id": order_id, "status": status })))
}

#[instrument(name = "handler::admin_list_products", skip_all, fields(admin = %admin.user.id))]
pub async fn list_products_handler(app_state: web::Data<AppState>, admin: AdminUser) -> Result<HttpResponse, AppError> {
  let products = admin_service::list_products(&app_state.platform).await?;
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::admin_create_product", skip_all, fields(admin = %admin.user.id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  payload: web::Json<CreateProductPayload>,
) -> Result<HttpResponse, AppError> {
  let CreateProductPayload { mut form, image } = payload.into_inner();
  form.image = image.map(UploadPayload::decode).transpose()?;
  let product = admin_service::create_product(&app_state.platform, form).await?;
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::admin_delete_product", skip_all, fields(admin = %admin.user.id))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  admin_service::delete_product(&app_state.platform, path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::admin_set_new_arrival", skip_all, fields(admin = %admin.user.id))]
pub async fn set_new_arrival_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
  payload: web::Json<NewArrivalPayload>,
) -> Result<HttpResponse, AppError> {
  let id = path.into_inner();
  admin_service::set_new_arrival(&app_state.platform, id, payload.is_new_arrival).await?;
  Ok(HttpResponse::Ok().json(json!({ "id": id, "is_new_arrival": payload.is_new_arrival })))
}
