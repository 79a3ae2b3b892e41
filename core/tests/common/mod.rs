// tests/common/mod.rs
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use horas_core::models::{Order, OrderItem, OrderStatus, Product};
use horas_core::pipeline::{ContextData, PipelineControl};
use horas_core::PipelineError;
use once_cell::sync::Lazy;
use tracing::Level;
use uuid::Uuid;

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

pub fn product(name: &str, price: i64, discount: Option<i32>) -> Product {
  Product {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: String::new(),
    price,
    discount,
    image: "/placeholder.svg".to_string(),
    images: vec!["/placeholder.svg".to_string()],
    category: "Hoodies".to_string(),
    brand: "Wink".to_string(),
    sizes: vec!["S".into(), "M".into(), "L".into(), "XL".into()],
    rating: 4.5,
    review_count: 0,
    is_new_arrival: false,
  }
}

pub fn branded(name: &str, brand: &str, category: &str, price: i64) -> Product {
  Product {
    brand: brand.to_string(),
    category: category.to_string(),
    ..product(name, price, None)
  }
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().expect("valid test timestamp")
}

pub fn order(status: OrderStatus, total_amount: i64, created_at: DateTime<Utc>) -> Order {
  Order {
    id: Uuid::new_v4(),
    order_ref: "WNK-TEST".to_string(),
    full_name: "Mona Adel".to_string(),
    phone: "+20 122 000 0000".to_string(),
    email: "mona@example.com".to_string(),
    city: "Cairo".to_string(),
    address: "12 Nile St".to_string(),
    notes: None,
    total_amount,
    payment_screenshot_url: None,
    status,
    created_at,
  }
}

pub fn order_item(product_name: &str, quantity: u32) -> OrderItem {
  OrderItem {
    id: Uuid::new_v4(),
    order_id: Uuid::new_v4(),
    product_id: None,
    product_name: product_name.to_string(),
    size: "M".to_string(),
    quantity,
    unit_price: 1000,
  }
}

// --- Pipeline fixtures ---

#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub steps_executed: Vec<String>,
  pub compensated: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Pipeline error: {0}")]
  Pipeline(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PipelineError> for TestError {
  fn from(e: PipelineError) -> Self {
    TestError::Pipeline(e.to_string())
  }
}

pub fn recording_handler(
  step_name: &'static str,
) -> impl Fn(ContextData<TestContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<PipelineControl, TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  }
}
