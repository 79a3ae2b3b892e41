// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::checkout_pipeline::{submit_order, EMPTY_CART_MESSAGE};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::services::cart_store::ShopperSession;
use crate::state::AppState;
use crate::web::extractors::CartSession;
use crate::web::payloads::UploadPayload;
use horas_core::checkout::validate_screenshot;
use horas_core::models::ShippingInfo;
use horas_core::{CheckoutStep, CheckoutWizard, OrderSummary};

pub const CHECKOUT_NOT_STARTED: &str = "Checkout has not been started";

/// Where the shopper stands in checkout, plus what the payment step shows.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
  pub order_ref: String,
  pub step: CheckoutStep,
  pub shipping: Option<ShippingInfo>,
  pub summary: OrderSummary,
  pub wallet_number: String,
}

impl CheckoutView {
  fn new(wizard: &CheckoutWizard, shopper: &ShopperSession, wallet_number: &str) -> Self {
    CheckoutView {
      order_ref: wizard.order_ref().to_string(),
      step: wizard.step(),
      shipping: wizard.shipping().cloned(),
      summary: OrderSummary::from_cart(&shopper.cart),
      wallet_number: wallet_number.to_string(),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct PaymentPayload {
  #[serde(default)]
  pub screenshot: Option<UploadPayload>,
}

fn wizard_mut(shopper: &mut ShopperSession) -> Result<&mut CheckoutWizard, AppError> {
  shopper
    .checkout
    .as_mut()
    .ok_or_else(|| AppError::Conflict(CHECKOUT_NOT_STARTED.to_string()))
}

/// Opens checkout for a non-empty cart. An unfinished checkout is resumed;
/// one that already succeeded is replaced with a fresh order reference.
#[instrument(name = "handler::start_checkout", skip(app_state), fields(cart_id = %session.id))]
pub async fn start_checkout_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let wallet = app_state.config.payment_wallet_number.clone();
  let view = app_state.carts.with_session(session.id, |shopper| {
    if shopper.cart.is_empty() {
      return Err(AppError::Validation(EMPTY_CART_MESSAGE.to_string()));
    }
    let resumable = matches!(&shopper.checkout, Some(w) if w.step() != CheckoutStep::Success);
    if !resumable {
      shopper.checkout = Some(CheckoutWizard::start());
    }
    let wizard = wizard_mut(shopper)?.clone();
    Ok(CheckoutView::new(&wizard, shopper, &wallet))
  })?;
  info!(order_ref = %view.order_ref, "Checkout started.");
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::submit_shipping", skip(app_state, payload), fields(cart_id = %session.id))]
pub async fn submit_shipping_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  payload: web::Json<ShippingInfo>,
) -> Result<HttpResponse, AppError> {
  let wallet = app_state.config.payment_wallet_number.clone();
  let view = app_state.carts.with_session(session.id, |shopper| {
    let wizard = wizard_mut(shopper)?;
    wizard.submit_shipping(&payload)?;
    let wizard = wizard.clone();
    Ok(CheckoutView::new(&wizard, shopper, &wallet))
  })?;
  Ok(HttpResponse::Ok().json(view))
}

/// Confirms payment with the uploaded screenshot and writes the order.
/// The cart is emptied only once every write succeeded.
#[instrument(name = "handler::confirm_payment", skip(app_state, payload), fields(cart_id = %session.id))]
pub async fn confirm_payment_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  payload: web::Json<PaymentPayload>,
) -> Result<HttpResponse, AppError> {
  let screenshot = payload.into_inner().screenshot.map(UploadPayload::decode).transpose()?;
  let screenshot = validate_screenshot(screenshot.as_ref())?.clone();

  let (order_ref, shipping, items) = app_state.carts.with_session(session.id, |shopper| {
    if shopper.cart.is_empty() {
      return Err(AppError::Validation(EMPTY_CART_MESSAGE.to_string()));
    }
    let (order_ref, shipping) = wizard_mut(shopper)?.begin_submission()?;
    Ok((order_ref, shipping, shopper.cart.items().to_vec()))
  })?;

  let data = CheckoutCtxData::new(app_state.platform.clone(), order_ref, shipping, items, screenshot);
  let outcome = submit_order(&app_state.checkout_pipeline, data).await;

  let settled = app_state.carts.with_session(session.id, |shopper| {
    let wizard = wizard_mut(shopper)?;
    if outcome.is_ok() {
      wizard.complete()?;
      shopper.cart.clear();
    } else {
      wizard.fail_submission();
    }
    Ok(())
  });
  if let Err(e) = settled {
    // Session expired mid-write, or checkout had left the submitting step.
    warn!(error = %e, "Checkout session could not be updated after submission.");
  }

  match outcome {
    Ok(placed) => Ok(HttpResponse::Created().json(json!({
      "step": CheckoutStep::Success,
      "order": placed,
    }))),
    Err(e) => {
      warn!(error = %e, "Order submission failed.");
      Err(e)
    }
  }
}

/// Back to the shipping step. Refused while an order is being written; after
/// a placed order the checkout starts over under a new order reference.
#[instrument(name = "handler::reset_checkout", skip(app_state), fields(cart_id = %session.id))]
pub async fn reset_checkout_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let wallet = app_state.config.payment_wallet_number.clone();
  let view = app_state.carts.with_session(session.id, |shopper| {
    let wizard = wizard_mut(shopper)?;
    wizard.reset()?;
    let wizard = wizard.clone();
    Ok(CheckoutView::new(&wizard, shopper, &wallet))
  })?;
  Ok(HttpResponse::Ok().json(view))
}
