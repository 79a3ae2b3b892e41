// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::catalog_service;
use crate::state::AppState;
use crate::web::extractors::CartSession;
use horas_core::models::Product;
use horas_core::pricing::format_price;
use horas_core::Cart;

pub const SELECT_SIZE_MESSAGE: &str = "Please select a size";

#[derive(Debug, Serialize)]
pub struct CartLineView {
  pub product: Product,
  pub size: String,
  pub quantity: u32,
  pub unit_price: i64,
  pub line_total: i64,
}

#[derive(Debug, Serialize)]
pub struct CartView {
  pub cart_id: Uuid,
  pub items: Vec<CartLineView>,
  pub total_items: u64,
  pub total_price: i64,
  pub total_display: String,
}

impl CartView {
  pub fn new(cart_id: Uuid, cart: &Cart) -> Self {
    CartView {
      cart_id,
      items: cart
        .items()
        .iter()
        .map(|item| CartLineView {
          product: item.product.clone(),
          size: item.size.clone(),
          quantity: item.quantity,
          unit_price: item.unit_price(),
          line_total: item.line_total(),
        })
        .collect(),
      total_items: cart.total_items(),
      total_price: cart.total_price(),
      total_display: format_price(cart.total_price()),
    }
  }
}

fn default_quantity() -> u32 {
  1
}

#[derive(Debug, Deserialize)]
pub struct AddItemPayload {
  pub product_id: Uuid,
  #[serde(default)]
  pub size: String,
  #[serde(default = "default_quantity")]
  pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemPayload {
  pub product_id: Uuid,
  pub size: String,
  pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemPayload {
  pub product_id: Uuid,
  pub size: String,
}

#[instrument(name = "handler::create_cart", skip(app_state))]
pub async fn create_cart_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let id = app_state.carts.create();
  Ok(HttpResponse::Created().json(CartView::new(id, &Cart::new())))
}

#[instrument(name = "handler::get_cart", skip(app_state), fields(cart_id = %session.id))]
pub async fn get_cart_handler(app_state: web::Data<AppState>, session: CartSession) -> Result<HttpResponse, AppError> {
  let snapshot = app_state.carts.snapshot(&session.id)?;
  Ok(HttpResponse::Ok().json(CartView::new(session.id, &snapshot.cart)))
}

/// Snapshots the product from the catalog so later price edits do not touch
/// carts in flight.
#[instrument(name = "handler::add_cart_item", skip(app_state, payload), fields(cart_id = %session.id, product_id = %payload.product_id))]
pub async fn add_item_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  payload: web::Json<AddItemPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let size = payload.size.trim().to_string();
  if size.is_empty() {
    return Err(AppError::Validation(SELECT_SIZE_MESSAGE.to_string()));
  }
  let product = catalog_service::find_product(app_state.platform.catalog.as_ref(), payload.product_id).await?;
  if !product.offers_size(&size) {
    return Err(AppError::Validation(SELECT_SIZE_MESSAGE.to_string()));
  }

  let view = app_state.carts.with_session(session.id, |shopper| {
    shopper.cart.add(product, size, payload.quantity)?;
    Ok(CartView::new(session.id, &shopper.cart))
  })?;
  info!(total_items = view.total_items, "Item added to cart.");
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::update_cart_item", skip(app_state, payload), fields(cart_id = %session.id))]
pub async fn update_item_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  payload: web::Json<UpdateItemPayload>,
) -> Result<HttpResponse, AppError> {
  let view = app_state.carts.with_session(session.id, |shopper| {
    shopper
      .cart
      .update_quantity(&payload.product_id, &payload.size, payload.quantity);
    Ok(CartView::new(session.id, &shopper.cart))
  })?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::remove_cart_item", skip(app_state, payload), fields(cart_id = %session.id))]
pub async fn remove_item_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  payload: web::Json<RemoveItemPayload>,
) -> Result<HttpResponse, AppError> {
  let view = app_state.carts.with_session(session.id, |shopper| {
    shopper.cart.remove(&payload.product_id, &payload.size);
    Ok(CartView::new(session.id, &shopper.cart))
  })?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::clear_cart", skip(app_state), fields(cart_id = %session.id))]
pub async fn clear_cart_handler(app_state: web::Data<AppState>, session: CartSession) -> Result<HttpResponse, AppError> {
  let view = app_state.carts.with_session(session.id, |shopper| {
    shopper.cart.clear();
    Ok(CartView::new(session.id, &shopper.cart))
  })?;
  Ok(HttpResponse::Ok().json(view))
}
