// core/src/models/order_item.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::CartItem;

/// Line item snapshot written at checkout. Product name, size and price are
/// copied so later catalog edits do not rewrite order history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrderItem {
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub size: String,
  pub quantity: u32,
  pub unit_price: i64,
}

impl NewOrderItem {
  pub fn from_cart_item(order_id: Uuid, item: &CartItem) -> Self {
    NewOrderItem {
      order_id,
      product_id: item.product.id,
      product_name: item.product.name.clone(),
      size: item.size.clone(),
      quantity: item.quantity,
      unit_price: item.unit_price(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  #[serde(default)]
  pub product_id: Option<Uuid>,
  pub product_name: String,
  pub size: String,
  pub quantity: u32,
  pub unit_price: i64,
}
