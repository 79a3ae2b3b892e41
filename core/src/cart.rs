// core/src/cart.rs

//! In-memory shopping cart keyed by `(product id, size)`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::Product;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
  pub product: Product,
  pub size: String,
  pub quantity: u32,
}

impl CartItem {
  pub fn unit_price(&self) -> i64 {
    self.product.unit_price()
  }

  pub fn line_total(&self) -> i64 {
    self.unit_price().saturating_mul(i64::from(self.quantity))
  }

  fn matches(&self, product_id: &Uuid, size: &str) -> bool {
    self.product.id == *product_id && self.size == size
  }
}

/// Cart lines in insertion order. A line never holds a zero quantity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
  items: Vec<CartItem>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn items(&self) -> &[CartItem] {
    &self.items
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn quantity_of(&self, product_id: &Uuid, size: &str) -> Option<u32> {
    self
      .items
      .iter()
      .find(|i| i.matches(product_id, size))
      .map(|i| i.quantity)
  }

  /// Adds `quantity` units, merging with an existing line for the same
  /// product and size.
  pub fn add(&mut self, product: Product, size: impl Into<String>, quantity: u32) -> CoreResult<()> {
    if quantity == 0 {
      return Err(CoreError::InvalidQuantity(0));
    }
    let size = size.into();
    match self.items.iter_mut().find(|i| i.matches(&product.id, &size)) {
      Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
      None => self.items.push(CartItem { product, size, quantity }),
    }
    Ok(())
  }

  /// Returns whether a line was removed.
  pub fn remove(&mut self, product_id: &Uuid, size: &str) -> bool {
    let before = self.items.len();
    self.items.retain(|i| !i.matches(product_id, size));
    self.items.len() != before
  }

  /// Sets the quantity of an existing line; zero or negative removes it.
  pub fn update_quantity(&mut self, product_id: &Uuid, size: &str, quantity: i64) {
    if quantity <= 0 {
      self.remove(product_id, size);
      return;
    }
    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    if let Some(item) = self.items.iter_mut().find(|i| i.matches(product_id, size)) {
      item.quantity = quantity;
    }
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  pub fn total_items(&self) -> u64 {
    self.items.iter().map(|i| u64::from(i.quantity)).sum()
  }

  /// Sum of discounted line totals in minor units.
  pub fn total_price(&self) -> i64 {
    self.items
      .iter()
      .fold(0i64, |total, item| total.saturating_add(item.line_total()))
  }
}
