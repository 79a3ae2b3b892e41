// storefront/src/pipelines/mod.rs

//! Multi-step platform writes, each built on `horas_core::Pipeline`.

pub mod admin_pipeline;
pub mod checkout_pipeline;
pub mod contexts;
pub mod product_pipeline;
