// storefront/src/web/routes.rs

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{admin_handlers, auth_handlers, cart_handlers, checkout_handlers, product_handlers};

/// Inline base64 screenshots and product images need more than the default
/// 32 KiB body.
pub const MAX_JSON_BYTES: usize = 10 * 1024 * 1024;

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(err.to_string()).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(err.to_string()).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
  AppError::NotFound(err.to_string()).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .app_data(web::JsonConfig::default().limit(MAX_JSON_BYTES).error_handler(json_error))
      .app_data(web::QueryConfig::default().error_handler(query_error))
      .app_data(web::PathConfig::default().error_handler(path_error))
      .route("/health", web::get().to(health_check_handler))
      // Catalog
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/new-arrivals", web::get().to(product_handlers::new_arrivals_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      .route("/categories", web::get().to(product_handlers::list_categories_handler))
      // Cart, keyed by the X-Cart-ID header
      .service(
        web::scope("/cart")
          .route("", web::post().to(cart_handlers::create_cart_handler))
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_item_handler))
          .route("/items", web::patch().to(cart_handlers::update_item_handler))
          .route("/items", web::delete().to(cart_handlers::remove_item_handler)),
      )
      .service(
        web::scope("/checkout")
          .route("/start", web::post().to(checkout_handlers::start_checkout_handler))
          .route("/shipping", web::post().to(checkout_handlers::submit_shipping_handler))
          .route("/payment", web::post().to(checkout_handlers::confirm_payment_handler))
          .route("/reset", web::post().to(checkout_handlers::reset_checkout_handler)),
      )
      // Admin console; everything but login requires an admin bearer token
      .service(
        web::scope("/admin")
          .route("/login", web::post().to(auth_handlers::admin_login_handler))
          .route("/dashboard", web::get().to(admin_handlers::dashboard_handler))
          .route("/orders", web::get().to(admin_handlers::list_orders_handler))
          .route("/orders/{order_id}/items", web::get().to(admin_handlers::order_items_handler))
          .route(
            "/orders/{order_id}/status",
            web::patch().to(admin_handlers::update_order_status_handler),
          )
          .route("/products", web::get().to(admin_handlers::list_products_handler))
          .route("/products", web::post().to(admin_handlers::create_product_handler))
          .route("/products/{product_id}", web::delete().to(admin_handlers::delete_product_handler))
          .route(
            "/products/{product_id}/new-arrival",
            web::patch().to(admin_handlers::set_new_arrival_handler),
          ),
      ),
  );
}
