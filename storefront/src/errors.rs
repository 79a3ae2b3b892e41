// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::platform::PlatformError;
use horas_core::{CoreError, PipelineError};

/// Every variant renders as a single `{"error": message}` body.
#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Auth(String),

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  /// A platform call failed; the message already says which step.
  #[error("{0}")]
  Upstream(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: PipelineError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<CoreError> for AppError {
  fn from(err: CoreError) -> Self {
    match err {
      CoreError::Validation(_) | CoreError::InvalidQuantity(_) | CoreError::UnknownOrderStatus(_) => {
        AppError::Validation(err.to_string())
      }
      CoreError::CheckoutOutOfOrder { .. } => AppError::Conflict(err.to_string()),
    }
  }
}

impl From<PlatformError> for AppError {
  fn from(err: PlatformError) -> Self {
    match err {
      PlatformError::Api { status: 401, message } => AppError::Auth(message),
      PlatformError::Api { status: 403, message } => AppError::Forbidden(message),
      PlatformError::Config(message) => AppError::Config(message),
      other => AppError::Upstream(other.to_string()),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<PlatformError>() {
      Ok(platform) => platform.into(),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
      AppError::Config(_) | AppError::Workflow { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    let message = match self {
      AppError::Config(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        "An internal error occurred".to_string()
      }
      other => other.to_string(),
    };
    HttpResponse::build(self.status_code()).json(json!({ "error": message }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
