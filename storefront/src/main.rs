// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;

use horas_storefront::config::AppConfig;
use horas_storefront::platform::{Platform, SupabaseClient};
use horas_storefront::state::AppState;
use horas_storefront::telemetry;
use horas_storefront::web::routes::configure_app_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();
  telemetry::init_tracing(telemetry::log_format_from_env());

  tracing::info!("Starting Horas storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let client = match SupabaseClient::from_config(&app_config) {
    Ok(client) => client,
    Err(e) => {
      tracing::error!(error = %e, "Failed to build the platform client.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };
  tracing::info!(platform = %client.base_url(), service_role = client.has_service_role(), "Platform client ready.");

  let app_state = AppState::new(app_config.clone(), Platform::from_client(client));

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
