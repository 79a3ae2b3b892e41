// storefront/src/platform/mod.rs

//! Seams to the hosted backend: data API, object storage and identity.
//!
//! Services only see the traits below. [`SupabaseClient`] implements all of
//! them over HTTP; tests swap in in-memory fakes.

pub mod auth;
pub mod client;
pub mod rest;
pub mod storage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use horas_core::models::{NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, ProductRow};

pub use client::SupabaseClient;

pub const PAYMENT_SCREENSHOTS_BUCKET: &str = "payment-screenshots";
pub const PRODUCT_IMAGES_BUCKET: &str = "product-images";

#[derive(Debug, Error)]
pub enum PlatformError {
  /// Non-success HTTP status with the message the platform returned.
  #[error("{message}")]
  Api { status: u16, message: String },

  #[error("Platform request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Unexpected platform response: {0}")]
  Decode(String),

  #[error("{0}")]
  Config(String),
}

pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
  pub id: Uuid,
  #[serde(default)]
  pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub access_token: String,
  #[serde(default)]
  pub token_type: Option<String>,
  #[serde(default)]
  pub expires_in: Option<i64>,
  #[serde(default)]
  pub refresh_token: Option<String>,
  pub user: AuthUser,
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
  /// Newest first.
  async fn list_products(&self) -> PlatformResult<Vec<ProductRow>>;
  async fn get_product(&self, id: Uuid) -> PlatformResult<Option<ProductRow>>;
  /// Category names in alphabetical order.
  async fn list_categories(&self) -> PlatformResult<Vec<String>>;
  async fn list_new_arrivals(&self) -> PlatformResult<Vec<ProductRow>>;
  async fn insert_product(&self, product: &NewProduct) -> PlatformResult<ProductRow>;
  async fn delete_product(&self, id: Uuid) -> PlatformResult<()>;
  async fn set_new_arrival(&self, id: Uuid, is_new_arrival: bool) -> PlatformResult<()>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
  /// Returns the id the store assigned to the new row.
  async fn insert_order(&self, order: &NewOrder) -> PlatformResult<Uuid>;
  async fn insert_order_items(&self, items: &[NewOrderItem]) -> PlatformResult<()>;
  async fn delete_order(&self, id: Uuid) -> PlatformResult<()>;
  async fn list_orders(&self) -> PlatformResult<Vec<Order>>;
  async fn list_order_items(&self, order_id: Uuid) -> PlatformResult<Vec<OrderItem>>;
  async fn list_all_order_items(&self) -> PlatformResult<Vec<OrderItem>>;
  async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> PlatformResult<()>;
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
  async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str, upsert: bool)
    -> PlatformResult<()>;
  async fn remove(&self, bucket: &str, path: &str) -> PlatformResult<()>;
  fn public_url(&self, bucket: &str, path: &str) -> String;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
  async fn sign_in(&self, email: &str, password: &str) -> PlatformResult<Session>;
  async fn user_for_token(&self, access_token: &str) -> PlatformResult<AuthUser>;
  async fn is_admin(&self, user_id: Uuid) -> PlatformResult<bool>;

  // Service-role operations.
  async fn find_user_by_email(&self, email: &str) -> PlatformResult<Option<AuthUser>>;
  async fn create_user(&self, email: &str, password: &str) -> PlatformResult<AuthUser>;
  async fn grant_admin_role(&self, user_id: Uuid) -> PlatformResult<()>;
  async fn upsert_admin_user(&self, user_id: Uuid, email: &str) -> PlatformResult<()>;
}

/// Every platform seam the service talks to, shared across workers.
#[derive(Clone)]
pub struct Platform {
  pub catalog: Arc<dyn CatalogRepository>,
  pub orders: Arc<dyn OrderRepository>,
  pub storage: Arc<dyn BlobStorage>,
  pub identity: Arc<dyn IdentityProvider>,
}

impl Platform {
  /// One client serves all four seams.
  pub fn from_client(client: SupabaseClient) -> Self {
    let client = Arc::new(client);
    Platform {
      catalog: client.clone(),
      orders: client.clone(),
      storage: client.clone(),
      identity: client,
    }
  }
}
