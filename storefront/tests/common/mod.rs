// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use uuid::Uuid;

use horas_core::models::{
  NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, ProductRow, ShippingInfo,
};
use horas_storefront::config::{AppConfig, LogFormat, DEFAULT_CART_IDLE_TTL_SECS};
use horas_storefront::platform::{
  AuthUser, BlobStorage, CatalogRepository, IdentityProvider, OrderRepository, Platform, PlatformError,
  PlatformResult, Session,
};
use horas_storefront::state::AppState;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub const FAKE_BASE_URL: &str = "https://fake.platform.local";
pub const WALLET: &str = "+201000000000";

/// Switches that make the matching platform call fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
  pub upload: bool,
  pub insert_order: bool,
  pub insert_items: bool,
  pub insert_product: bool,
  pub remove: bool,
}

#[derive(Debug, Default)]
pub struct FakeState {
  pub products: Vec<ProductRow>,
  pub categories: Vec<String>,
  pub orders: Vec<Order>,
  pub order_items: Vec<OrderItem>,
  /// `bucket/path` -> (content type, bytes)
  pub blobs: HashMap<String, (String, Vec<u8>)>,
  pub removed_blobs: Vec<String>,
  pub deleted_orders: Vec<Uuid>,
  pub users: Vec<(AuthUser, String)>,
  pub tokens: HashMap<String, Uuid>,
  pub admin_roles: HashSet<Uuid>,
  pub admin_users: HashMap<Uuid, String>,
  pub failures: Failures,
}

/// In-memory stand-in for every platform seam.
#[derive(Debug, Default)]
pub struct FakePlatform {
  pub state: Mutex<FakeState>,
}

fn failed(what: &str) -> PlatformError {
  PlatformError::Api {
    status: 500,
    message: format!("{} is unavailable", what),
  }
}

impl FakePlatform {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn platform(self: &Arc<Self>) -> Platform {
    Platform {
      catalog: self.clone(),
      orders: self.clone(),
      storage: self.clone(),
      identity: self.clone(),
    }
  }

  pub fn set_failures(&self, failures: Failures) {
    self.state.lock().failures = failures;
  }

  pub fn add_product(&self, row: ProductRow) -> Uuid {
    let id = row.id;
    self.state.lock().products.insert(0, row);
    id
  }

  /// Registers a user and returns `(user id, access token)`.
  pub fn add_user(&self, email: &str, password: &str, admin: bool) -> (Uuid, String) {
    let id = Uuid::new_v4();
    let token = format!("token-{}", id);
    let mut state = self.state.lock();
    state.users.push((
      AuthUser {
        id,
        email: Some(email.to_string()),
      },
      password.to_string(),
    ));
    state.tokens.insert(token.clone(), id);
    if admin {
      state.admin_roles.insert(id);
    }
    (id, token)
  }

  pub fn orders(&self) -> Vec<Order> {
    self.state.lock().orders.clone()
  }

  pub fn order_items(&self) -> Vec<OrderItem> {
    self.state.lock().order_items.clone()
  }

  pub fn blob_keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self.state.lock().blobs.keys().cloned().collect();
    keys.sort();
    keys
  }
}

#[async_trait]
impl CatalogRepository for FakePlatform {
  async fn list_products(&self) -> PlatformResult<Vec<ProductRow>> {
    Ok(self.state.lock().products.clone())
  }

  async fn get_product(&self, id: Uuid) -> PlatformResult<Option<ProductRow>> {
    Ok(self.state.lock().products.iter().find(|p| p.id == id).cloned())
  }

  async fn list_categories(&self) -> PlatformResult<Vec<String>> {
    let mut names = self.state.lock().categories.clone();
    names.sort();
    Ok(names)
  }

  async fn list_new_arrivals(&self) -> PlatformResult<Vec<ProductRow>> {
    Ok(
      self
        .state
        .lock()
        .products
        .iter()
        .filter(|p| p.is_new_arrival)
        .cloned()
        .collect(),
    )
  }

  async fn insert_product(&self, product: &NewProduct) -> PlatformResult<ProductRow> {
    if self.state.lock().failures.insert_product {
      return Err(failed("products table"));
    }
    let row = ProductRow {
      id: Uuid::new_v4(),
      name: product.name.clone(),
      description: Some(product.description.clone()),
      price: product.price,
      discount: Some(product.discount),
      image_url: Some(product.image_url.clone()),
      images: Some(product.images.clone()),
      category: product.category.clone(),
      brand: String::new(),
      sizes: None,
      rating: None,
      review_count: None,
      is_new_arrival: product.is_new_arrival,
      created_at: Some(Utc::now()),
    };
    self.state.lock().products.insert(0, row.clone());
    Ok(row)
  }

  async fn delete_product(&self, id: Uuid) -> PlatformResult<()> {
    self.state.lock().products.retain(|p| p.id != id);
    Ok(())
  }

  async fn set_new_arrival(&self, id: Uuid, is_new_arrival: bool) -> PlatformResult<()> {
    let mut state = self.state.lock();
    if let Some(row) = state.products.iter_mut().find(|p| p.id == id) {
      row.is_new_arrival = is_new_arrival;
    }
    Ok(())
  }
}

#[async_trait]
impl OrderRepository for FakePlatform {
  async fn insert_order(&self, order: &NewOrder) -> PlatformResult<Uuid> {
    let mut state = self.state.lock();
    if state.failures.insert_order {
      return Err(failed("orders table"));
    }
    let id = Uuid::new_v4();
    state.orders.insert(
      0,
      Order {
        id,
        order_ref: order.order_ref.clone(),
        full_name: order.full_name.clone(),
        phone: order.phone.clone(),
        email: order.email.clone(),
        city: order.city.clone(),
        address: order.address.clone(),
        notes: order.notes.clone(),
        total_amount: order.total_amount,
        payment_screenshot_url: Some(order.payment_screenshot_url.clone()),
        status: OrderStatus::Pending,
        created_at: Utc::now(),
      },
    );
    Ok(id)
  }

  async fn insert_order_items(&self, items: &[NewOrderItem]) -> PlatformResult<()> {
    let mut state = self.state.lock();
    if state.failures.insert_items {
      return Err(failed("order_items table"));
    }
    for item in items {
      state.order_items.push(OrderItem {
        id: Uuid::new_v4(),
        order_id: item.order_id,
        product_id: Some(item.product_id),
        product_name: item.product_name.clone(),
        size: item.size.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price,
      });
    }
    Ok(())
  }

  async fn delete_order(&self, id: Uuid) -> PlatformResult<()> {
    let mut state = self.state.lock();
    state.orders.retain(|o| o.id != id);
    state.order_items.retain(|i| i.order_id != id);
    state.deleted_orders.push(id);
    Ok(())
  }

  async fn list_orders(&self) -> PlatformResult<Vec<Order>> {
    Ok(self.orders())
  }

  async fn list_order_items(&self, order_id: Uuid) -> PlatformResult<Vec<OrderItem>> {
    Ok(
      self
        .state
        .lock()
        .order_items
        .iter()
        .filter(|i| i.order_id == order_id)
        .cloned()
        .collect(),
    )
  }

  async fn list_all_order_items(&self) -> PlatformResult<Vec<OrderItem>> {
    Ok(self.order_items())
  }

  async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> PlatformResult<()> {
    let mut state = self.state.lock();
    if let Some(order) = state.orders.iter_mut().find(|o| o.id == id) {
      order.status = status;
    }
    Ok(())
  }
}

#[async_trait]
impl BlobStorage for FakePlatform {
  async fn upload(
    &self,
    bucket: &str,
    path: &str,
    bytes: Vec<u8>,
    content_type: &str,
    upsert: bool,
  ) -> PlatformResult<()> {
    let mut state = self.state.lock();
    if state.failures.upload {
      return Err(failed("storage"));
    }
    let key = format!("{}/{}", bucket, path);
    if !upsert && state.blobs.contains_key(&key) {
      return Err(PlatformError::Api {
        status: 409,
        message: "The resource already exists".to_string(),
      });
    }
    state.blobs.insert(key, (content_type.to_string(), bytes));
    Ok(())
  }

  async fn remove(&self, bucket: &str, path: &str) -> PlatformResult<()> {
    let mut state = self.state.lock();
    if state.failures.remove {
      return Err(failed("storage"));
    }
    let key = format!("{}/{}", bucket, path);
    state.blobs.remove(&key);
    state.removed_blobs.push(key);
    Ok(())
  }

  fn public_url(&self, bucket: &str, path: &str) -> String {
    format!("{}/storage/v1/object/public/{}/{}", FAKE_BASE_URL, bucket, path)
  }
}

#[async_trait]
impl IdentityProvider for FakePlatform {
  async fn sign_in(&self, email: &str, password: &str) -> PlatformResult<Session> {
    let state = self.state.lock();
    let user = state
      .users
      .iter()
      .find(|(user, pw)| user.email.as_deref() == Some(email) && pw == password)
      .map(|(user, _)| user.clone())
      .ok_or_else(|| PlatformError::Api {
        status: 400,
        message: "Invalid login credentials".to_string(),
      })?;
    Ok(Session {
      access_token: format!("token-{}", user.id),
      token_type: Some("bearer".to_string()),
      expires_in: Some(3600),
      refresh_token: None,
      user,
    })
  }

  async fn user_for_token(&self, access_token: &str) -> PlatformResult<AuthUser> {
    let state = self.state.lock();
    let id = state.tokens.get(access_token).copied().ok_or_else(|| PlatformError::Api {
      status: 401,
      message: "invalid JWT".to_string(),
    })?;
    state
      .users
      .iter()
      .find(|(user, _)| user.id == id)
      .map(|(user, _)| user.clone())
      .ok_or_else(|| PlatformError::Api {
        status: 404,
        message: "User not found".to_string(),
      })
  }

  async fn is_admin(&self, user_id: Uuid) -> PlatformResult<bool> {
    Ok(self.state.lock().admin_roles.contains(&user_id))
  }

  async fn find_user_by_email(&self, email: &str) -> PlatformResult<Option<AuthUser>> {
    Ok(
      self
        .state
        .lock()
        .users
        .iter()
        .find(|(user, _)| user.email.as_deref() == Some(email))
        .map(|(user, _)| user.clone()),
    )
  }

  async fn create_user(&self, email: &str, password: &str) -> PlatformResult<AuthUser> {
    let (id, _) = self.add_user(email, password, false);
    Ok(AuthUser {
      id,
      email: Some(email.to_string()),
    })
  }

  async fn grant_admin_role(&self, user_id: Uuid) -> PlatformResult<()> {
    self.state.lock().admin_roles.insert(user_id);
    Ok(())
  }

  async fn upsert_admin_user(&self, user_id: Uuid, email: &str) -> PlatformResult<()> {
    self.state.lock().admin_users.insert(user_id, email.to_string());
    Ok(())
  }
}

pub fn product_row(name: &str, price: i64, discount: Option<i32>) -> ProductRow {
  ProductRow {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: None,
    price,
    discount,
    image_url: None,
    images: None,
    category: "Hoodies".to_string(),
    brand: "Wink".to_string(),
    sizes: None,
    rating: None,
    review_count: None,
    is_new_arrival: false,
    created_at: Some(Utc::now()),
  }
}

pub fn shipping() -> ShippingInfo {
  ShippingInfo {
    full_name: "Mona Adel".to_string(),
    phone: "+20 122 000 0000".to_string(),
    email: "mona@example.com".to_string(),
    city: "Cairo".to_string(),
    address: "12 Nile St".to_string(),
    notes: "   ".to_string(),
  }
}

pub fn test_config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    supabase_url: FAKE_BASE_URL.to_string(),
    supabase_anon_key: "anon".to_string(),
    supabase_service_role_key: None,
    payment_wallet_number: WALLET.to_string(),
    cart_idle_ttl: Duration::from_secs(DEFAULT_CART_IDLE_TTL_SECS),
    log_format: LogFormat::Pretty,
  }
}

pub fn app_state(fake: &Arc<FakePlatform>) -> AppState {
  AppState::new(Arc::new(test_config()), fake.platform())
}
