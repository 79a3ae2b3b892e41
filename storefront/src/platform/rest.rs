// storefront/src/platform/rest.rs

//! Catalog and order tables over the REST data API.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use super::client::{send_empty, send_json, SupabaseClient};
use super::{CatalogRepository, OrderRepository, PlatformError, PlatformResult};
use horas_core::models::{NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, ProductRow};

const RETURN_REPRESENTATION: &str = "return=representation";
const RETURN_MINIMAL: &str = "return=minimal";
const NEWEST_FIRST: &str = "created_at.desc";

#[derive(Deserialize)]
struct IdRow {
  id: Uuid,
}

#[derive(Deserialize)]
struct NameRow {
  name: String,
}

fn eq(value: impl std::fmt::Display) -> String {
  format!("eq.{}", value)
}

fn first<T>(rows: Vec<T>, what: &str) -> PlatformResult<T> {
  rows
    .into_iter()
    .next()
    .ok_or_else(|| PlatformError::Decode(format!("{} insert returned no rows", what)))
}

#[async_trait]
impl CatalogRepository for SupabaseClient {
  #[instrument(name = "rest::list_products", skip(self))]
  async fn list_products(&self) -> PlatformResult<Vec<ProductRow>> {
    send_json(
      self
        .rest(Method::GET, "products")
        .query(&[("select", "*"), ("order", NEWEST_FIRST)]),
    )
    .await
  }

  #[instrument(name = "rest::get_product", skip(self))]
  async fn get_product(&self, id: Uuid) -> PlatformResult<Option<ProductRow>> {
    let rows: Vec<ProductRow> = send_json(
      self
        .rest(Method::GET, "products")
        .query(&[("select", "*".to_string()), ("id", eq(id))]),
    )
    .await?;
    Ok(rows.into_iter().next())
  }

  #[instrument(name = "rest::list_categories", skip(self))]
  async fn list_categories(&self) -> PlatformResult<Vec<String>> {
    let rows: Vec<NameRow> = send_json(
      self
        .rest(Method::GET, "categories")
        .query(&[("select", "name"), ("order", "name.asc")]),
    )
    .await?;
    Ok(rows.into_iter().map(|row| row.name).collect())
  }

  #[instrument(name = "rest::list_new_arrivals", skip(self))]
  async fn list_new_arrivals(&self) -> PlatformResult<Vec<ProductRow>> {
    send_json(self.rest(Method::GET, "products").query(&[
      ("select", "*"),
      ("is_new_arrival", "eq.true"),
      ("order", NEWEST_FIRST),
    ]))
    .await
  }

  #[instrument(name = "rest::insert_product", skip(self, product), fields(name = %product.name))]
  async fn insert_product(&self, product: &NewProduct) -> PlatformResult<ProductRow> {
    let rows: Vec<ProductRow> = send_json(
      self
        .rest(Method::POST, "products")
        .header("Prefer", RETURN_REPRESENTATION)
        .json(product),
    )
    .await?;
    first(rows, "product")
  }

  #[instrument(name = "rest::delete_product", skip(self))]
  async fn delete_product(&self, id: Uuid) -> PlatformResult<()> {
    send_empty(self.rest(Method::DELETE, "products").query(&[("id", eq(id))])).await
  }

  #[instrument(name = "rest::set_new_arrival", skip(self))]
  async fn set_new_arrival(&self, id: Uuid, is_new_arrival: bool) -> PlatformResult<()> {
    send_empty(
      self
        .rest(Method::PATCH, "products")
        .query(&[("id", eq(id))])
        .header("Prefer", RETURN_MINIMAL)
        .json(&json!({ "is_new_arrival": is_new_arrival })),
    )
    .await
  }
}

#[async_trait]
impl OrderRepository for SupabaseClient {
  #[instrument(name = "rest::insert_order", skip(self, order), fields(order_ref = %order.order_ref))]
  async fn insert_order(&self, order: &NewOrder) -> PlatformResult<Uuid> {
    let rows: Vec<IdRow> = send_json(
      self
        .rest(Method::POST, "orders")
        .query(&[("select", "id")])
        .header("Prefer", RETURN_REPRESENTATION)
        .json(order),
    )
    .await?;
    first(rows, "order").map(|row| row.id)
  }

  #[instrument(name = "rest::insert_order_items", skip(self, items), fields(count = items.len()))]
  async fn insert_order_items(&self, items: &[NewOrderItem]) -> PlatformResult<()> {
    send_empty(
      self
        .rest(Method::POST, "order_items")
        .header("Prefer", RETURN_MINIMAL)
        .json(items),
    )
    .await
  }

  #[instrument(name = "rest::delete_order", skip(self))]
  async fn delete_order(&self, id: Uuid) -> PlatformResult<()> {
    send_empty(self.rest(Method::DELETE, "orders").query(&[("id", eq(id))])).await
  }

  #[instrument(name = "rest::list_orders", skip(self))]
  async fn list_orders(&self) -> PlatformResult<Vec<Order>> {
    send_json(
      self
        .rest(Method::GET, "orders")
        .query(&[("select", "*"), ("order", NEWEST_FIRST)]),
    )
    .await
  }

  #[instrument(name = "rest::list_order_items", skip(self))]
  async fn list_order_items(&self, order_id: Uuid) -> PlatformResult<Vec<OrderItem>> {
    send_json(
      self
        .rest(Method::GET, "order_items")
        .query(&[("select", "*".to_string()), ("order_id", eq(order_id))]),
    )
    .await
  }

  #[instrument(name = "rest::list_all_order_items", skip(self))]
  async fn list_all_order_items(&self) -> PlatformResult<Vec<OrderItem>> {
    send_json(self.rest(Method::GET, "order_items").query(&[("select", "*")])).await
  }

  #[instrument(name = "rest::update_order_status", skip(self), fields(status = %status))]
  async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> PlatformResult<()> {
    send_empty(
      self
        .rest(Method::PATCH, "orders")
        .query(&[("id", eq(id))])
        .header("Prefer", RETURN_MINIMAL)
        .json(&json!({ "status": status })),
    )
    .await
  }
}
