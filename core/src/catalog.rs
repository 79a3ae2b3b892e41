// core/src/catalog.rs

//! Shop-page filtering, sorting and facet counts over an in-memory product
//! list.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::models::Product;

pub const DEFAULT_PRICE_MIN: i64 = 0;
pub const DEFAULT_PRICE_MAX: i64 = 600_000;
pub const RELATED_PRODUCTS_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
  /// Keeps the store's order, which lists newest products first.
  #[default]
  Newest,
  PriceLowHigh,
  PriceHighLow,
  TopRated,
  Name,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
  pub brands: BTreeSet<String>,
  pub categories: BTreeSet<String>,
  pub price_min: i64,
  pub price_max: i64,
  pub sort: SortOrder,
}

impl Default for ProductFilter {
  fn default() -> Self {
    ProductFilter {
      brands: BTreeSet::new(),
      categories: BTreeSet::new(),
      price_min: DEFAULT_PRICE_MIN,
      price_max: DEFAULT_PRICE_MAX,
      sort: SortOrder::default(),
    }
  }
}

impl ProductFilter {
  pub fn toggle_brand(&mut self, brand: &str) {
    toggle(&mut self.brands, brand);
  }

  pub fn toggle_category(&mut self, category: &str) {
    toggle(&mut self.categories, category);
  }

  /// Price bounds are inclusive and compare against the undiscounted price.
  pub fn matches(&self, product: &Product) -> bool {
    if !self.brands.is_empty() && !self.brands.contains(&product.brand) {
      return false;
    }
    if !self.categories.is_empty() && !self.categories.contains(&product.category) {
      return false;
    }
    product.price >= self.price_min && product.price <= self.price_max
  }

  pub fn apply(&self, products: &[Product]) -> Vec<Product> {
    let mut selected: Vec<Product> = products.iter().filter(|p| self.matches(p)).cloned().collect();
    sort_products(&mut selected, self.sort);
    selected
  }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
  if !set.remove(value) {
    set.insert(value.to_string());
  }
}

/// Stable sort, ties keep their incoming order.
pub fn sort_products(products: &mut [Product], order: SortOrder) {
  match order {
    SortOrder::Newest => {}
    SortOrder::PriceLowHigh => products.sort_by_key(|p| p.unit_price()),
    SortOrder::PriceHighLow => products.sort_by_key(|p| std::cmp::Reverse(p.unit_price())),
    SortOrder::TopRated => {
      products.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
    }
    SortOrder::Name => products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
  }
}

/// Per-brand and per-category product counts over the unfiltered list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
  pub brands: BTreeMap<String, usize>,
  pub categories: BTreeMap<String, usize>,
}

pub fn facet_counts(products: &[Product]) -> Facets {
  let mut facets = Facets::default();
  for p in products {
    *facets.brands.entry(p.brand.clone()).or_insert(0) += 1;
    *facets.categories.entry(p.category.clone()).or_insert(0) += 1;
  }
  facets
}

/// Other products to show beside `product_id`.
pub fn related(products: &[Product], product_id: &Uuid, limit: usize) -> Vec<Product> {
  products
    .iter()
    .filter(|p| p.id != *product_id)
    .take(limit)
    .cloned()
    .collect()
}

pub fn new_arrivals(products: &[Product]) -> Vec<Product> {
  products.iter().filter(|p| p.is_new_arrival).cloned().collect()
}
