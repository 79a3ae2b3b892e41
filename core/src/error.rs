// core/src/error.rs
use thiserror::Error;

/// Errors raised by the storefront domain logic.
///
/// Validation messages are written for shoppers and admins; the web layer
/// forwards them verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
  #[error("{0}")]
  Validation(String),

  #[error("Quantity must be at least 1 (got {0})")]
  InvalidQuantity(i64),

  #[error("Unknown order status '{0}'")]
  UnknownOrderStatus(String),

  #[error("Checkout cannot {action} while on the {current} step")]
  CheckoutOutOfOrder { action: &'static str, current: &'static str },
}

/// Configuration failures of a [`crate::pipeline::Pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },
}

pub type CoreResult<T, E = CoreError> = std::result::Result<T, E>;
