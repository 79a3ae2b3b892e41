// core/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing;

pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";
pub const DEFAULT_SIZES: [&str; 4] = ["S", "M", "L", "XL"];
pub const DEFAULT_RATING: f64 = 4.5;

/// A row of the `products` table as the data API returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRow {
  pub id: Uuid,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  pub price: i64,
  #[serde(default)]
  pub discount: Option<i32>,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub images: Option<Vec<String>>,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub brand: String,
  #[serde(default)]
  pub sizes: Option<Vec<String>>,
  #[serde(default)]
  pub rating: Option<f64>,
  #[serde(default)]
  pub review_count: Option<i32>,
  #[serde(default)]
  pub is_new_arrival: bool,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

/// Storefront view of a product with every optional column resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: i64,
  pub discount: Option<i32>,
  pub image: String,
  pub images: Vec<String>,
  pub category: String,
  pub brand: String,
  pub sizes: Vec<String>,
  pub rating: f64,
  pub review_count: i32,
  pub is_new_arrival: bool,
}

impl Product {
  /// Price a shopper pays for one unit.
  pub fn unit_price(&self) -> i64 {
    pricing::discounted_price(self.price, self.discount)
  }

  pub fn offers_size(&self, size: &str) -> bool {
    self.sizes.iter().any(|s| s == size)
  }
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    let image = row
      .image_url
      .filter(|url| !url.is_empty())
      .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
    let images = match row.images {
      Some(list) if !list.is_empty() => list,
      _ => vec![image.clone()],
    };
    let rating = match row.rating {
      Some(r) if r != 0.0 && r.is_finite() => r,
      _ => DEFAULT_RATING,
    };

    Product {
      id: row.id,
      name: row.name,
      description: row.description.unwrap_or_default(),
      price: row.price,
      discount: row.discount.filter(|d| *d != 0),
      image,
      images,
      category: row.category,
      brand: row.brand,
      sizes: row
        .sizes
        .unwrap_or_else(|| DEFAULT_SIZES.iter().map(|s| s.to_string()).collect()),
      rating,
      review_count: row.review_count.unwrap_or(0),
      is_new_arrival: row.is_new_arrival,
    }
  }
}

/// Insert payload for products created from the admin console.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub description: String,
  pub category: String,
  pub price: i64,
  pub discount: i32,
  pub image_url: String,
  pub images: Vec<String>,
  pub is_new_arrival: bool,
}
