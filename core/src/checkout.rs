// core/src/checkout.rs

//! Checkout wizard state, shipping validation and order references.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::models::{FileUpload, ShippingInfo};
use crate::pricing::format_price;

pub const ORDER_REF_PREFIX: &str = "WNK-";
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email";
pub const MISSING_SCREENSHOT_MESSAGE: &str = "Please upload your payment confirmation screenshot";

/// Last millisecond stamp handed out; keeps generated refs unique per process.
static LAST_REF_MILLIS: AtomicU64 = AtomicU64::new(0);

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("static email pattern"));

/// Trims every field and checks the required ones.
pub fn validate_shipping(info: &ShippingInfo) -> CoreResult<ShippingInfo> {
  let cleaned = ShippingInfo {
    full_name: info.full_name.trim().to_string(),
    phone: info.phone.trim().to_string(),
    email: info.email.trim().to_string(),
    city: info.city.trim().to_string(),
    address: info.address.trim().to_string(),
    notes: info.notes.trim().to_string(),
  };

  let required = [
    &cleaned.full_name,
    &cleaned.phone,
    &cleaned.email,
    &cleaned.city,
    &cleaned.address,
  ];
  if required.iter().any(|field| field.is_empty()) {
    return Err(CoreError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
  }
  if !EMAIL_PATTERN.is_match(&cleaned.email) {
    return Err(CoreError::Validation(INVALID_EMAIL_MESSAGE.to_string()));
  }
  Ok(cleaned)
}

pub fn validate_screenshot(upload: Option<&FileUpload>) -> CoreResult<&FileUpload> {
  match upload {
    Some(file) if !file.is_empty() => Ok(file),
    _ => Err(CoreError::Validation(MISSING_SCREENSHOT_MESSAGE.to_string())),
  }
}

/// Human-readable order reference, `WNK-` followed by the base-36 creation
/// time in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRef(String);

impl OrderRef {
  /// Stamps the current time. Two calls never return the same ref: a call
  /// landing in an already used millisecond takes the next one.
  pub fn generate() -> Self {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    let previous = LAST_REF_MILLIS
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
      .unwrap_or_else(|last| last);
    Self::from_millis(now.max(previous + 1))
  }

  pub fn from_millis(millis: u64) -> Self {
    OrderRef(format!("{}{}", ORDER_REF_PREFIX, to_base36(millis)))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for OrderRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

fn to_base36(mut value: u64) -> String {
  const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
  if value == 0 {
    return "0".to_string();
  }
  let mut out = Vec::new();
  while value > 0 {
    out.push(DIGITS[(value % 36) as usize]);
    value /= 36;
  }
  out.reverse();
  String::from_utf8_lossy(&out).into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
  Shipping,
  Payment,
  Submitting,
  Success,
}

impl CheckoutStep {
  pub fn as_str(&self) -> &'static str {
    match self {
      CheckoutStep::Shipping => "shipping",
      CheckoutStep::Payment => "payment",
      CheckoutStep::Submitting => "submitting",
      CheckoutStep::Success => "success",
    }
  }
}

/// Linear checkout: shipping, then payment, then success.
///
/// `Submitting` guards the payment step while the order is being written so
/// a second confirmation cannot start a parallel submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutWizard {
  order_ref: OrderRef,
  step: CheckoutStep,
  shipping: Option<ShippingInfo>,
}

impl CheckoutWizard {
  pub fn new(order_ref: OrderRef) -> Self {
    CheckoutWizard {
      order_ref,
      step: CheckoutStep::Shipping,
      shipping: None,
    }
  }

  pub fn start() -> Self {
    Self::new(OrderRef::generate())
  }

  pub fn order_ref(&self) -> &OrderRef {
    &self.order_ref
  }

  pub fn step(&self) -> CheckoutStep {
    self.step
  }

  pub fn shipping(&self) -> Option<&ShippingInfo> {
    self.shipping.as_ref()
  }

  pub fn submit_shipping(&mut self, info: &ShippingInfo) -> CoreResult<&ShippingInfo> {
    self.expect_step(CheckoutStep::Shipping, "submit shipping details")?;
    let cleaned = validate_shipping(info)?;
    self.step = CheckoutStep::Payment;
    let stored: &ShippingInfo = self.shipping.insert(cleaned);
    Ok(stored)
  }

  /// Marks the payment as being submitted and hands back what the order
  /// write needs.
  pub fn begin_submission(&mut self) -> CoreResult<(OrderRef, ShippingInfo)> {
    self.expect_step(CheckoutStep::Payment, "confirm payment")?;
    let shipping = self
      .shipping
      .clone()
      .ok_or_else(|| CoreError::Validation(MISSING_FIELDS_MESSAGE.to_string()))?;
    self.step = CheckoutStep::Submitting;
    Ok((self.order_ref.clone(), shipping))
  }

  pub fn complete(&mut self) -> CoreResult<()> {
    self.expect_step(CheckoutStep::Submitting, "complete the order")?;
    self.step = CheckoutStep::Success;
    Ok(())
  }

  /// Returns to the payment step after a failed submission.
  pub fn fail_submission(&mut self) {
    if self.step == CheckoutStep::Submitting {
      self.step = CheckoutStep::Payment;
    }
  }

  /// Clears the collected fields and returns to shipping.
  ///
  /// An unfinished checkout keeps its order reference. Once the order is
  /// placed its reference belongs to that order, so a reset after success
  /// starts over with a fresh one. Resetting mid-submission is refused.
  pub fn reset(&mut self) -> CoreResult<()> {
    match self.step {
      CheckoutStep::Submitting => Err(CoreError::CheckoutOutOfOrder {
        action: "reset",
        current: self.step.as_str(),
      }),
      CheckoutStep::Success => {
        *self = Self::start();
        Ok(())
      }
      CheckoutStep::Shipping | CheckoutStep::Payment => {
        self.step = CheckoutStep::Shipping;
        self.shipping = None;
        Ok(())
      }
    }
  }

  fn expect_step(&self, expected: CheckoutStep, action: &'static str) -> CoreResult<()> {
    if self.step == expected {
      Ok(())
    } else {
      Err(CoreError::CheckoutOutOfOrder {
        action,
        current: self.step.as_str(),
      })
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
  pub label: String,
  pub line_total: i64,
  pub line_total_display: String,
}

/// What the payment step shows before the shopper uploads proof of payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
  pub lines: Vec<SummaryLine>,
  pub total: i64,
  pub total_display: String,
}

impl OrderSummary {
  pub fn from_cart(cart: &Cart) -> Self {
    let lines = cart
      .items()
      .iter()
      .map(|item| SummaryLine {
        label: format!("{} × {} ({})", item.product.name, item.quantity, item.size),
        line_total: item.line_total(),
        line_total_display: format_price(item.line_total()),
      })
      .collect();
    let total = cart.total_price();
    OrderSummary {
      lines,
      total,
      total_display: format_price(total),
    }
  }
}
