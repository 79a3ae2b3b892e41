// storefront/src/state.rs

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines::checkout_pipeline::build_checkout_pipeline;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::platform::Platform;
use crate::services::cart_store::CartStore;
use horas_core::Pipeline;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub platform: Platform,
  pub carts: Arc<CartStore>,
  pub checkout_pipeline: Arc<Pipeline<CheckoutCtxData, AppError>>,
}

impl AppState {
  pub fn new(config: Arc<AppConfig>, platform: Platform) -> Self {
    AppState {
      carts: Arc::new(CartStore::with_idle_ttl(config.cart_idle_ttl)),
      config,
      platform,
      checkout_pipeline: Arc::new(build_checkout_pipeline()),
    }
  }
}
