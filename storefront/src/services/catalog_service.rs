// storefront/src/services/catalog_service.rs

use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::platform::CatalogRepository;
use horas_core::catalog::{self, RELATED_PRODUCTS_LIMIT};
use horas_core::models::Product;
use horas_core::{Facets, ProductFilter};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Debug, Clone, Serialize)]
pub struct ShopPage {
  pub products: Vec<Product>,
  /// Counts over the whole catalog, not just the filtered page.
  pub facets: Facets,
  pub filter: ProductFilter,
  pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
  pub product: Product,
  pub related: Vec<Product>,
}

pub async fn all_products(catalog: &dyn CatalogRepository) -> Result<Vec<Product>> {
  let rows = catalog.list_products().await?;
  Ok(rows.into_iter().map(Product::from).collect())
}

#[instrument(name = "catalog::shop", skip(catalog))]
pub async fn shop(catalog: &dyn CatalogRepository, filter: ProductFilter) -> Result<ShopPage> {
  let products = all_products(catalog).await?;
  let facets = catalog::facet_counts(&products);
  let matching = filter.apply(&products);
  Ok(ShopPage {
    total: matching.len(),
    products: matching,
    facets,
    filter,
  })
}

pub async fn find_product(catalog: &dyn CatalogRepository, id: Uuid) -> Result<Product> {
  catalog
    .get_product(id)
    .await?
    .map(Product::from)
    .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

#[instrument(name = "catalog::product_detail", skip(catalog))]
pub async fn product_detail(catalog: &dyn CatalogRepository, id: Uuid) -> Result<ProductDetail> {
  let product = find_product(catalog, id).await?;
  let others = all_products(catalog).await?;
  let related = catalog::related(&others, &id, RELATED_PRODUCTS_LIMIT);
  Ok(ProductDetail { product, related })
}

pub async fn categories(catalog: &dyn CatalogRepository) -> Result<Vec<String>> {
  Ok(catalog.list_categories().await?)
}

#[instrument(name = "catalog::new_arrivals", skip(catalog))]
pub async fn new_arrivals(catalog: &dyn CatalogRepository) -> Result<Vec<Product>> {
  let rows = catalog.list_new_arrivals().await?;
  let products: Vec<Product> = rows.into_iter().map(Product::from).collect();
  Ok(catalog::new_arrivals(&products))
}
