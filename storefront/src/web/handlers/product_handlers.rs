// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::catalog_service;
use crate::state::AppState;
use horas_core::catalog::{DEFAULT_PRICE_MAX, DEFAULT_PRICE_MIN};
use horas_core::{ProductFilter, SortOrder};

/// Shop query string. Brands and categories are comma-separated lists.
#[derive(Debug, Default, Deserialize)]
pub struct ShopQuery {
  pub brands: Option<String>,
  pub categories: Option<String>,
  pub min_price: Option<i64>,
  pub max_price: Option<i64>,
  pub sort: Option<SortOrder>,
}

fn split_list(list: &Option<String>) -> impl Iterator<Item = String> + '_ {
  list
    .iter()
    .flat_map(|s| s.split(','))
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}

impl ShopQuery {
  pub fn into_filter(self) -> ProductFilter {
    ProductFilter {
      brands: split_list(&self.brands).collect(),
      categories: split_list(&self.categories).collect(),
      price_min: self.min_price.unwrap_or(DEFAULT_PRICE_MIN),
      price_max: self.max_price.unwrap_or(DEFAULT_PRICE_MAX),
      sort: self.sort.unwrap_or_default(),
    }
  }
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ShopQuery>,
) -> Result<HttpResponse, AppError> {
  let page = catalog_service::shop(app_state.platform.catalog.as_ref(), query.into_inner().into_filter()).await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::new_arrivals", skip(app_state))]
pub async fn new_arrivals_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = catalog_service::new_arrivals(app_state.platform.catalog.as_ref()).await?;
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let detail = catalog_service::product_detail(app_state.platform.catalog.as_ref(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(detail))
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = catalog_service::categories(app_state.platform.catalog.as_ref()).await?;
  Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}
