// storefront/src/services/admin_service.rs

//! Order review, product management and the dashboard.

use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::pipelines::product_pipeline;
use crate::platform::Platform;
use horas_core::dashboard;
use horas_core::models::{FileUpload, NewProduct, Order, OrderItem, OrderStatus, ProductRow};
use horas_core::pricing::MAX_PRICE;
use horas_core::DashboardStats;

pub const MISSING_PRODUCT_FIELDS: &str = "Name, price and category are required";
pub const INVALID_PRICE: &str = "Price must be a whole number between 0 and 100,000,000,000";

/// Product form as submitted from the admin console. Price and discount
/// arrive as text; a discount that does not parse counts as 0.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub category: String,
  pub price: String,
  #[serde(default)]
  pub discount: String,
  #[serde(default)]
  pub is_new_arrival: bool,
  #[serde(skip)]
  pub image: Option<FileUpload>,
}

fn parse_amount(text: &str) -> i64 {
  text.trim().parse::<i64>().unwrap_or(0)
}

fn parse_price(text: &str) -> Result<i64> {
  text
    .trim()
    .parse::<i64>()
    .ok()
    .filter(|price| (0..=MAX_PRICE).contains(price))
    .ok_or_else(|| AppError::Validation(INVALID_PRICE.to_string()))
}

#[instrument(name = "admin::list_orders", skip(platform))]
pub async fn list_orders(platform: &Platform) -> Result<Vec<Order>> {
  Ok(platform.orders.list_orders().await?)
}

#[instrument(name = "admin::order_items", skip(platform))]
pub async fn order_items(platform: &Platform, order_id: Uuid) -> Result<Vec<OrderItem>> {
  Ok(platform.orders.list_order_items(order_id).await?)
}

#[instrument(name = "admin::update_order_status", skip(platform))]
pub async fn update_order_status(platform: &Platform, order_id: Uuid, status: &str) -> Result<OrderStatus> {
  let status: OrderStatus = status.parse()?;
  platform.orders.update_order_status(order_id, status).await?;
  info!(%order_id, %status, "Order status updated.");
  Ok(status)
}

#[instrument(name = "admin::list_products", skip(platform))]
pub async fn list_products(platform: &Platform) -> Result<Vec<ProductRow>> {
  Ok(platform.catalog.list_products().await?)
}

/// Validates the form and hands it to the product pipeline, which stores the
/// image and inserts the row.
#[instrument(name = "admin::create_product", skip(platform, form), fields(name = %form.name))]
pub async fn create_product(platform: &Platform, form: ProductForm) -> Result<ProductRow> {
  let name = form.name.trim();
  let category = form.category.trim();
  if name.is_empty() || category.is_empty() || form.price.trim().is_empty() {
    return Err(AppError::Validation(MISSING_PRODUCT_FIELDS.to_string()));
  }
  let price = parse_price(&form.price)?;

  let product = NewProduct {
    name: name.to_string(),
    description: form.description.trim().to_string(),
    category: category.to_string(),
    price,
    discount: parse_amount(&form.discount).clamp(0, 100) as i32,
    images: Vec::new(),
    image_url: String::new(),
    is_new_arrival: form.is_new_arrival,
  };
  product_pipeline::create_product(platform.clone(), product, form.image).await
}

#[instrument(name = "admin::delete_product", skip(platform))]
pub async fn delete_product(platform: &Platform, id: Uuid) -> Result<()> {
  platform.catalog.delete_product(id).await?;
  info!(product_id = %id, "Product deleted.");
  Ok(())
}

#[instrument(name = "admin::set_new_arrival", skip(platform))]
pub async fn set_new_arrival(platform: &Platform, id: Uuid, is_new_arrival: bool) -> Result<()> {
  Ok(platform.catalog.set_new_arrival(id, is_new_arrival).await?)
}

#[instrument(name = "admin::dashboard", skip(platform))]
pub async fn dashboard(platform: &Platform) -> Result<DashboardStats> {
  let orders = platform.orders.list_orders().await?;
  let items = platform.orders.list_all_order_items().await?;
  Ok(dashboard::compute(&orders, &items))
}
