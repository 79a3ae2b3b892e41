// core/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

/// Review state of an order. Only admins move an order out of `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
  Pending,
  Completed,
  Rejected,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 3] = [OrderStatus::Pending, OrderStatus::Completed, OrderStatus::Rejected];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "Pending",
      OrderStatus::Completed => "Completed",
      OrderStatus::Rejected => "Rejected",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| CoreError::UnknownOrderStatus(s.to_string()))
  }
}

/// Delivery details collected on the first checkout step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingInfo {
  pub full_name: String,
  pub phone: String,
  pub email: String,
  pub city: String,
  pub address: String,
  #[serde(default)]
  pub notes: String,
}

/// Insert payload for the `orders` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
  pub order_ref: String,
  pub full_name: String,
  pub phone: String,
  pub email: String,
  pub city: String,
  pub address: String,
  pub notes: Option<String>,
  pub total_amount: i64,
  pub payment_screenshot_url: String,
}

impl NewOrder {
  pub fn new(order_ref: &str, shipping: &ShippingInfo, total_amount: i64, payment_screenshot_url: String) -> Self {
    let notes = shipping.notes.trim();
    NewOrder {
      order_ref: order_ref.to_string(),
      full_name: shipping.full_name.clone(),
      phone: shipping.phone.clone(),
      email: shipping.email.clone(),
      city: shipping.city.clone(),
      address: shipping.address.clone(),
      notes: (!notes.is_empty()).then(|| notes.to_string()),
      total_amount,
      payment_screenshot_url,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
  pub id: Uuid,
  pub order_ref: String,
  pub full_name: String,
  pub phone: String,
  pub email: String,
  pub city: String,
  pub address: String,
  #[serde(default)]
  pub notes: Option<String>,
  pub total_amount: i64,
  #[serde(default)]
  pub payment_screenshot_url: Option<String>,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}
