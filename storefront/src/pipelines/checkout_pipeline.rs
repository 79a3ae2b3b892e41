// storefront/src/pipelines/checkout_pipeline.rs

//! Order submission: upload the payment screenshot, insert the order, then
//! its items. A failure after the upload undoes what was already written.

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::platform::PAYMENT_SCREENSHOTS_BUCKET;
use horas_core::models::{NewOrder, NewOrderItem};
use horas_core::{ContextData, Pipeline, PipelineControl, PipelineResult};

pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

pub const UPLOAD_STEP: &str = "upload_payment_screenshot";
pub const ORDER_STEP: &str = "insert_order";
pub const ITEMS_STEP: &str = "insert_order_items";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedOrder {
  pub order_id: Uuid,
  pub order_ref: String,
  pub total_amount: i64,
  pub payment_screenshot_url: String,
}

pub fn build_checkout_pipeline() -> Pipeline<CheckoutCtxData, AppError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[(UPLOAD_STEP, false), (ORDER_STEP, false), (ITEMS_STEP, false)]);

  p.on_root(UPLOAD_STEP, upload_payment_screenshot);
  p.compensate(UPLOAD_STEP, remove_payment_screenshot);

  p.on_root(ORDER_STEP, insert_order);
  p.compensate(ORDER_STEP, delete_order);

  p.on_root(ITEMS_STEP, insert_order_items);

  p
}

/// Runs the checkout pipeline for a non-empty cart and reports the stored
/// order.
#[instrument(name = "checkout::submit_order", skip_all, fields(order_ref = %data.order_ref, lines = data.items.len()))]
pub async fn submit_order(pipeline: &Pipeline<CheckoutCtxData, AppError>, data: CheckoutCtxData) -> Result<PlacedOrder> {
  if data.items.is_empty() {
    return Err(AppError::Validation(EMPTY_CART_MESSAGE.to_string()));
  }

  let ctx_data = ContextData::new(data);
  if let PipelineResult::Stopped = pipeline.run(ctx_data.clone()).await? {
    return Err(AppError::Internal("Checkout stopped before the order was saved".to_string()));
  }

  let guard = ctx_data.read();
  let order_id = guard
    .order_id
    .ok_or_else(|| AppError::Internal("Checkout completed without an order id".to_string()))?;
  let placed = PlacedOrder {
    order_id,
    order_ref: guard.order_ref.to_string(),
    total_amount: guard.total_amount,
    payment_screenshot_url: guard.screenshot_url.clone().unwrap_or_default(),
  };
  info!(%order_id, "Order placed.");
  Ok(placed)
}

async fn upload_payment_screenshot(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let (storage, path, bytes, content_type) = {
    let guard = ctx_data.read();
    (
      guard.platform.storage.clone(),
      guard.screenshot.storage_path(guard.order_ref.as_str()),
      guard.screenshot.bytes.clone(),
      guard.screenshot.content_type.clone(),
    )
  };

  storage
    .upload(PAYMENT_SCREENSHOTS_BUCKET, &path, bytes, &content_type, true)
    .await
    .map_err(|e| AppError::Upstream(format!("Failed to upload screenshot: {}", e)))?;
  let url = storage.public_url(PAYMENT_SCREENSHOTS_BUCKET, &path);
  info!(%path, "Payment screenshot uploaded.");

  let mut guard = ctx_data.write();
  guard.screenshot_path = Some(path);
  guard.screenshot_url = Some(url);
  Ok(PipelineControl::Continue)
}

async fn insert_order(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let (orders, new_order) = {
    let guard = ctx_data.read();
    let url = guard.screenshot_url.clone().unwrap_or_default();
    (
      guard.platform.orders.clone(),
      NewOrder::new(guard.order_ref.as_str(), &guard.shipping, guard.total_amount, url),
    )
  };

  let order_id = orders
    .insert_order(&new_order)
    .await
    .map_err(|e| AppError::Upstream(format!("Failed to create order: {}", e)))?;
  info!(%order_id, "Order row inserted.");

  ctx_data.write().order_id = Some(order_id);
  Ok(PipelineControl::Continue)
}

async fn insert_order_items(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let (orders, items) = {
    let guard = ctx_data.read();
    let order_id = guard
      .order_id
      .ok_or_else(|| AppError::Internal("Order items step ran before the order was created".to_string()))?;
    let items: Vec<NewOrderItem> = guard
      .items
      .iter()
      .map(|item| NewOrderItem::from_cart_item(order_id, item))
      .collect();
    (guard.platform.orders.clone(), items)
  };

  orders
    .insert_order_items(&items)
    .await
    .map_err(|e| AppError::Upstream(format!("Failed to save order items: {}", e)))?;
  info!(count = items.len(), "Order items inserted.");
  Ok(PipelineControl::Continue)
}

async fn remove_payment_screenshot(ctx_data: ContextData<CheckoutCtxData>) -> anyhow::Result<()> {
  let (storage, path) = {
    let guard = ctx_data.read();
    (guard.platform.storage.clone(), guard.screenshot_path.clone())
  };
  match path {
    Some(path) => {
      storage.remove(PAYMENT_SCREENSHOTS_BUCKET, &path).await?;
      warn!(%path, "Removed payment screenshot of a failed checkout.");
    }
    None => warn!("No screenshot path recorded; nothing to remove."),
  }
  Ok(())
}

async fn delete_order(ctx_data: ContextData<CheckoutCtxData>) -> anyhow::Result<()> {
  let (orders, order_id) = {
    let guard = ctx_data.read();
    (guard.platform.orders.clone(), guard.order_id)
  };
  if let Some(order_id) = order_id {
    orders.delete_order(order_id).await?;
    warn!(%order_id, "Deleted order row of a failed checkout.");
  }
  Ok(())
}
