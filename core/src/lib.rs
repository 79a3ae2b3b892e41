// core/src/lib.rs

//! Horas storefront domain logic.
//!
//! Everything here is independent of the hosted platform: product shapes
//! and pricing, the cart, shop filtering, the checkout wizard, dashboard
//! aggregation, and the step [`pipeline`] the service uses to sequence
//! platform writes.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod pricing;

pub use crate::cart::{Cart, CartItem};
pub use crate::catalog::{Facets, ProductFilter, SortOrder};
pub use crate::checkout::{CheckoutStep, CheckoutWizard, OrderRef, OrderSummary};
pub use crate::dashboard::DashboardStats;
pub use crate::error::{CoreError, CoreResult, PipelineError};
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
