// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_WALLET_NUMBER: &str = "+201222357495";
pub const DEFAULT_CART_IDLE_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  pub supabase_url: String,
  pub supabase_anon_key: String,
  /// Lets the service act for verified admins. Without it admin routes
  /// depend on the anon key passing row-level security.
  pub supabase_service_role_key: Option<String>,

  /// Cash-wallet number shoppers send payment to.
  pub payment_wallet_number: String,

  /// Cart sessions untouched for this long are dropped.
  pub cart_idle_ttl: Duration,

  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let supabase_url = get_env("SUPABASE_URL")?.trim_end_matches('/').to_string();
    if !supabase_url.starts_with("http://") && !supabase_url.starts_with("https://") {
      return Err(AppError::Config(format!("Invalid SUPABASE_URL: '{}'", supabase_url)));
    }
    let supabase_anon_key = get_env("SUPABASE_ANON_KEY")?;
    let supabase_service_role_key = get_env("SUPABASE_SERVICE_ROLE_KEY").ok().filter(|k| !k.is_empty());

    let payment_wallet_number =
      get_env("PAYMENT_WALLET_NUMBER").unwrap_or_else(|_| DEFAULT_WALLET_NUMBER.to_string());

    let cart_idle_ttl = get_env("CART_IDLE_TTL_SECS")
      .unwrap_or_else(|_| DEFAULT_CART_IDLE_TTL_SECS.to_string())
      .parse::<u64>()
      .ok()
      .filter(|secs| *secs > 0)
      .map(Duration::from_secs)
      .ok_or_else(|| AppError::Config("CART_IDLE_TTL_SECS must be a positive number of seconds".to_string()))?;

    let log_format = match get_env("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()).as_str() {
      "json" => LogFormat::Json,
      "pretty" => LogFormat::Pretty,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT value: {}", other))),
    };

    if supabase_service_role_key.is_none() {
      tracing::warn!("SUPABASE_SERVICE_ROLE_KEY not set; admin routes run with the anon key.");
    }
    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      supabase_url,
      supabase_anon_key,
      supabase_service_role_key,
      payment_wallet_number,
      cart_idle_ttl,
      log_format,
    })
  }
}
