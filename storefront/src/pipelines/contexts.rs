// storefront/src/pipelines/contexts.rs

//! Data carried through each pipeline. Handlers receive it wrapped in
//! `horas_core::ContextData`.

use std::sync::Arc;
use uuid::Uuid;

use crate::platform::{IdentityProvider, Platform};
use horas_core::models::{FileUpload, NewProduct, ProductRow, ShippingInfo};
use horas_core::{CartItem, OrderRef};

pub struct CheckoutCtxData {
  pub platform: Platform,
  pub order_ref: OrderRef,
  pub shipping: ShippingInfo,
  pub items: Vec<CartItem>,
  pub total_amount: i64,
  pub screenshot: FileUpload,

  // Filled in as steps complete; compensations read them back.
  pub screenshot_path: Option<String>,
  pub screenshot_url: Option<String>,
  pub order_id: Option<Uuid>,
}

impl CheckoutCtxData {
  pub fn new(
    platform: Platform,
    order_ref: OrderRef,
    shipping: ShippingInfo,
    items: Vec<CartItem>,
    screenshot: FileUpload,
  ) -> Self {
    let total_amount = items
      .iter()
      .fold(0i64, |total, item| total.saturating_add(item.line_total()));
    CheckoutCtxData {
      platform,
      order_ref,
      shipping,
      items,
      total_amount,
      screenshot,
      screenshot_path: None,
      screenshot_url: None,
      order_id: None,
    }
  }
}

pub struct AdminCtxData {
  pub identity: Arc<dyn IdentityProvider>,
  pub email: String,
  pub password: String,
  pub user_id: Option<Uuid>,
  /// True when the account did not exist before this run.
  pub created: bool,
}

/// `product.image_url` and `product.images` are filled by the image step.
pub struct ProductCtxData {
  pub platform: Platform,
  pub product: NewProduct,
  pub image: Option<FileUpload>,
  pub image_path: Option<String>,
  pub row: Option<ProductRow>,
}
