// storefront/src/pipelines/product_pipeline.rs

//! Product creation: store the optional image, then insert the row. A failed
//! insert removes the image again.

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::pipelines::contexts::ProductCtxData;
use crate::platform::{Platform, PRODUCT_IMAGES_BUCKET};
use horas_core::models::product::PLACEHOLDER_IMAGE;
use horas_core::models::{FileUpload, NewProduct, ProductRow};
use horas_core::{ContextData, Pipeline, PipelineControl, PipelineResult};

pub const IMAGE_STEP: &str = "upload_product_image";
pub const INSERT_STEP: &str = "insert_product";

pub fn build_product_pipeline() -> Pipeline<ProductCtxData, AppError> {
  let mut p = Pipeline::<ProductCtxData, AppError>::new(&[(IMAGE_STEP, false), (INSERT_STEP, false)]);

  p.on_root(IMAGE_STEP, upload_product_image);
  p.compensate(IMAGE_STEP, remove_product_image);

  p.on_root(INSERT_STEP, insert_product);

  p
}

#[instrument(name = "product::create", skip_all, fields(name = %product.name))]
pub async fn create_product(platform: Platform, product: NewProduct, image: Option<FileUpload>) -> Result<ProductRow> {
  let ctx_data = ContextData::new(ProductCtxData {
    platform,
    product,
    image: image.filter(|image| !image.is_empty()),
    image_path: None,
    row: None,
  });
  if let PipelineResult::Stopped = build_product_pipeline().run(ctx_data.clone()).await? {
    return Err(AppError::Internal("Product creation stopped early".to_string()));
  }

  let row = ctx_data
    .write()
    .row
    .take()
    .ok_or_else(|| AppError::Internal("Product creation finished without a row".to_string()))?;
  info!(product_id = %row.id, "Product created.");
  Ok(row)
}

/// Images land at `product-images/<millis>.<ext>`; without one the
/// placeholder is stored.
async fn upload_product_image(ctx_data: ContextData<ProductCtxData>) -> Result<PipelineControl> {
  let (storage, image) = {
    let guard = ctx_data.read();
    (guard.platform.storage.clone(), guard.image.clone())
  };

  let (path, image_url) = match image {
    Some(image) => {
      let path = image.storage_path(&Utc::now().timestamp_millis().to_string());
      storage
        .upload(PRODUCT_IMAGES_BUCKET, &path, image.bytes, &image.content_type, false)
        .await?;
      let url = storage.public_url(PRODUCT_IMAGES_BUCKET, &path);
      info!(%path, "Product image uploaded.");
      (Some(path), url)
    }
    None => (None, PLACEHOLDER_IMAGE.to_string()),
  };

  let mut guard = ctx_data.write();
  guard.image_path = path;
  guard.product.images = vec![image_url.clone()];
  guard.product.image_url = image_url;
  Ok(PipelineControl::Continue)
}

async fn insert_product(ctx_data: ContextData<ProductCtxData>) -> Result<PipelineControl> {
  let (catalog, product) = {
    let guard = ctx_data.read();
    (guard.platform.catalog.clone(), guard.product.clone())
  };
  let row = catalog.insert_product(&product).await?;
  ctx_data.write().row = Some(row);
  Ok(PipelineControl::Continue)
}

async fn remove_product_image(ctx_data: ContextData<ProductCtxData>) -> anyhow::Result<()> {
  let (storage, path) = {
    let guard = ctx_data.read();
    (guard.platform.storage.clone(), guard.image_path.clone())
  };
  if let Some(path) = path {
    storage.remove(PRODUCT_IMAGES_BUCKET, &path).await?;
    warn!(%path, "Removed image of a product that was not saved.");
  }
  Ok(())
}
