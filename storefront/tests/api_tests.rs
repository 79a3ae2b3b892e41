// tests/api_tests.rs

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use common::{app_state, product_row, setup_tracing, FakePlatform, WALLET};
use horas_storefront::web::routes::configure_app_routes;

macro_rules! test_app {
  ($fake:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new(app_state($fake)))
        .configure(configure_app_routes),
    )
    .await
  };
}

macro_rules! new_cart {
  ($app:expr) => {{
    let created: Value =
      test::call_and_read_body_json(&$app, test::TestRequest::post().uri("/api/v1/cart").to_request()).await;
    created["cart_id"].as_str().unwrap().to_string()
  }};
}

fn seeded() -> (Arc<FakePlatform>, Uuid) {
  let fake = FakePlatform::new();
  let mut hoodie = product_row("Classic Hoodie", 1_000, Some(10));
  hoodie.brand = "Horas".to_string();
  let id = fake.add_product(hoodie);
  let mut tee = product_row("Plain Tee", 250, None);
  tee.category = "T-Shirts".to_string();
  tee.is_new_arrival = true;
  fake.add_product(tee);
  (fake, id)
}

#[actix_web::test]
async fn health_check_responds_ok() {
  let fake = FakePlatform::new();
  let app = test_app!(&fake);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn shop_listing_filters_and_counts_facets() {
  setup_tracing();
  let (fake, _) = seeded();
  let app = test_app!(&fake);

  let req = test::TestRequest::get()
    .uri("/api/v1/products?brands=Horas&sort=price_high_low")
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;

  assert_eq!(body["total"], 1);
  assert_eq!(body["products"][0]["name"], "Classic Hoodie");
  assert_eq!(body["facets"]["brands"]["Horas"], 1);
  assert_eq!(body["facets"]["brands"]["Wink"], 1);

  let req = test::TestRequest::get().uri("/api/v1/products/new-arrivals").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["products"].as_array().unwrap().len(), 1);
  assert_eq!(body["products"][0]["name"], "Plain Tee");
}

#[actix_web::test]
async fn price_sort_survives_extreme_stored_prices() {
  let fake = FakePlatform::new();
  fake.add_product(product_row("Gold Coat", i64::MAX / 10, Some(50)));
  fake.add_product(product_row("Plain Tee", 100, None));
  let app = test_app!(&fake);

  let req = test::TestRequest::get()
    .uri(&format!("/api/v1/products?sort=price_low_high&max_price={}", i64::MAX))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["products"][0]["name"], "Plain Tee");
  assert_eq!(body["products"][1]["name"], "Gold Coat");
}

#[actix_web::test]
async fn unknown_product_is_a_json_404() {
  let (fake, _) = seeded();
  let app = test_app!(&fake);
  let req = test::TestRequest::get()
    .uri(&format!("/api/v1/products/{}", Uuid::new_v4()))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Product not found");
}

#[actix_web::test]
async fn cart_requires_session_header() {
  let fake = FakePlatform::new();
  let app = test_app!(&fake);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/cart").to_request()).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("X-Cart-ID"));
}

#[actix_web::test]
async fn cart_add_update_and_remove() {
  setup_tracing();
  let (fake, hoodie) = seeded();
  let app = test_app!(&fake);

  let cart_id = new_cart!(app);

  let bad_size = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header(("X-Cart-ID", cart_id.as_str()))
    .set_json(json!({ "product_id": hoodie, "size": "XXS" }))
    .to_request();
  let resp = test::call_service(&app, bad_size).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Please select a size");

  for _ in 0..2 {
    let add = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header(("X-Cart-ID", cart_id.as_str()))
      .set_json(json!({ "product_id": hoodie, "size": "M" }))
      .to_request();
    let resp = test::call_service(&app, add).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  let get = test::TestRequest::get()
    .uri("/api/v1/cart")
    .insert_header(("X-Cart-ID", cart_id.as_str()))
    .to_request();
  let cart: Value = test::call_and_read_body_json(&app, get).await;
  assert_eq!(cart["items"].as_array().unwrap().len(), 1);
  assert_eq!(cart["total_items"], 2);
  assert_eq!(cart["total_price"], 1_800);

  let update = test::TestRequest::patch()
    .uri("/api/v1/cart/items")
    .insert_header(("X-Cart-ID", cart_id.as_str()))
    .set_json(json!({ "product_id": hoodie, "size": "M", "quantity": -3 }))
    .to_request();
  let cart: Value = test::call_and_read_body_json(&app, update).await;
  assert_eq!(cart["items"].as_array().unwrap().len(), 0);
  assert_eq!(cart["total_price"], 0);
}

#[actix_web::test]
async fn full_checkout_flow_places_an_order() {
  setup_tracing();
  let (fake, hoodie) = seeded();
  let app = test_app!(&fake);
  let cart_id = new_cart!(app);
  let header = ("X-Cart-ID", cart_id.as_str());

  let add = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header(header)
    .set_json(json!({ "product_id": hoodie, "size": "L", "quantity": 2 }))
    .to_request();
  assert_eq!(test::call_service(&app, add).await.status(), StatusCode::OK);

  let start = test::TestRequest::post()
    .uri("/api/v1/checkout/start")
    .insert_header(header)
    .to_request();
  let view: Value = test::call_and_read_body_json(&app, start).await;
  assert_eq!(view["step"], "shipping");
  assert_eq!(view["wallet_number"], WALLET);
  assert_eq!(view["summary"]["total"], 1_800);
  let order_ref = view["order_ref"].as_str().unwrap().to_string();
  assert!(order_ref.starts_with("WNK-"));

  // Paying before shipping is out of order.
  let early = test::TestRequest::post()
    .uri("/api/v1/checkout/payment")
    .insert_header(header)
    .set_json(json!({ "screenshot": { "file_name": "proof.png", "data": "aGVsbG8=" } }))
    .to_request();
  assert_eq!(test::call_service(&app, early).await.status(), StatusCode::CONFLICT);

  let bad_email = test::TestRequest::post()
    .uri("/api/v1/checkout/shipping")
    .insert_header(header)
    .set_json(json!({
      "full_name": "Mona Adel", "phone": "0100", "email": "mona-at-example",
      "city": "Cairo", "address": "12 Nile St"
    }))
    .to_request();
  let resp = test::call_service(&app, bad_email).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Please enter a valid email");

  let shipping = test::TestRequest::post()
    .uri("/api/v1/checkout/shipping")
    .insert_header(header)
    .set_json(json!({
      "full_name": "Mona Adel", "phone": "0100", "email": "mona@example.com",
      "city": "Cairo", "address": "12 Nile St", "notes": "Ring twice"
    }))
    .to_request();
  let view: Value = test::call_and_read_body_json(&app, shipping).await;
  assert_eq!(view["step"], "payment");

  let missing = test::TestRequest::post()
    .uri("/api/v1/checkout/payment")
    .insert_header(header)
    .set_json(json!({}))
    .to_request();
  let resp = test::call_service(&app, missing).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Please upload your payment confirmation screenshot");

  let pay = test::TestRequest::post()
    .uri("/api/v1/checkout/payment")
    .insert_header(header)
    .set_json(json!({
      "screenshot": { "file_name": "proof.png", "content_type": "image/png", "data": "aGVsbG8=" }
    }))
    .to_request();
  let resp = test::call_service(&app, pay).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["step"], "success");
  assert_eq!(body["order"]["order_ref"], order_ref.as_str());

  let orders = fake.orders();
  assert_eq!(orders.len(), 1);
  assert_eq!(orders[0].notes.as_deref(), Some("Ring twice"));
  assert_eq!(fake.blob_keys(), vec![format!("payment-screenshots/{}.png", order_ref)]);

  let get = test::TestRequest::get()
    .uri("/api/v1/cart")
    .insert_header(header)
    .to_request();
  let cart: Value = test::call_and_read_body_json(&app, get).await;
  assert_eq!(cart["total_items"], 0);
}

#[actix_web::test]
async fn checkout_reset_returns_to_shipping() {
  let (fake, hoodie) = seeded();
  let app = test_app!(&fake);
  let cart_id = new_cart!(app);
  let header = ("X-Cart-ID", cart_id.as_str());

  let reset_early = test::TestRequest::post()
    .uri("/api/v1/checkout/reset")
    .insert_header(header)
    .to_request();
  assert_eq!(test::call_service(&app, reset_early).await.status(), StatusCode::CONFLICT);

  let add = test::TestRequest::post()
    .uri("/api/v1/cart/items")
    .insert_header(header)
    .set_json(json!({ "product_id": hoodie, "size": "S" }))
    .to_request();
  test::call_service(&app, add).await;
  let start = test::TestRequest::post()
    .uri("/api/v1/checkout/start")
    .insert_header(header)
    .to_request();
  let started: Value = test::call_and_read_body_json(&app, start).await;

  let reset = test::TestRequest::post()
    .uri("/api/v1/checkout/reset")
    .insert_header(header)
    .to_request();
  let view: Value = test::call_and_read_body_json(&app, reset).await;
  assert_eq!(view["step"], "shipping");
  assert_eq!(view["order_ref"], started["order_ref"]);
  assert!(view["shipping"].is_null());
}

macro_rules! place_order {
  ($app:expr, $header:expr, $product:expr) => {{
    let add = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header($header)
      .set_json(json!({ "product_id": $product, "size": "M" }))
      .to_request();
    assert_eq!(test::call_service(&$app, add).await.status(), StatusCode::OK);

    let start = test::TestRequest::post()
      .uri("/api/v1/checkout/start")
      .insert_header($header)
      .to_request();
    let started: Value = test::call_and_read_body_json(&$app, start).await;

    let shipping = test::TestRequest::post()
      .uri("/api/v1/checkout/shipping")
      .insert_header($header)
      .set_json(json!({
        "full_name": "Mona Adel", "phone": "0100", "email": "mona@example.com",
        "city": "Cairo", "address": "12 Nile St"
      }))
      .to_request();
    assert_eq!(test::call_service(&$app, shipping).await.status(), StatusCode::OK);

    let pay = test::TestRequest::post()
      .uri("/api/v1/checkout/payment")
      .insert_header($header)
      .set_json(json!({
        "screenshot": { "file_name": "proof.png", "content_type": "image/png", "data": "aGVsbG8=" }
      }))
      .to_request();
    let resp = test::call_service(&$app, pay).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    started["order_ref"].as_str().unwrap().to_string()
  }};
}

#[actix_web::test]
async fn second_order_from_one_cart_gets_its_own_ref_and_screenshot() {
  setup_tracing();
  let (fake, hoodie) = seeded();
  let app = test_app!(&fake);
  let cart_id = new_cart!(app);
  let header = ("X-Cart-ID", cart_id.as_str());

  let first = place_order!(app, header, hoodie);

  // Resetting after a placed order must not hand its ref to the next one.
  let reset = test::TestRequest::post()
    .uri("/api/v1/checkout/reset")
    .insert_header(header)
    .to_request();
  let view: Value = test::call_and_read_body_json(&app, reset).await;
  assert_eq!(view["step"], "shipping");
  assert_ne!(view["order_ref"], first.as_str());

  let second = place_order!(app, header, hoodie);
  assert_ne!(first, second);

  let refs: Vec<String> = fake.orders().into_iter().map(|o| o.order_ref).collect();
  assert_eq!(refs.len(), 2);
  assert_ne!(refs[0], refs[1]);
  let mut blobs = fake.blob_keys();
  blobs.sort();
  let mut expected = vec![
    format!("payment-screenshots/{}.png", first),
    format!("payment-screenshots/{}.png", second),
  ];
  expected.sort();
  assert_eq!(blobs, expected);
}

#[actix_web::test]
async fn unknown_cart_ids_are_rejected_without_opening_a_session() {
  let (fake, hoodie) = seeded();
  let state = web::Data::new(app_state(&fake));
  let app = test::init_service(App::new().app_data(state.clone()).configure(configure_app_routes)).await;
  let stranger = Uuid::new_v4().to_string();
  let header = ("X-Cart-ID", stranger.as_str());

  let requests = vec![
    test::TestRequest::get().uri("/api/v1/cart").insert_header(header).to_request(),
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header(header)
      .set_json(json!({ "product_id": hoodie, "size": "M" }))
      .to_request(),
    test::TestRequest::patch()
      .uri("/api/v1/cart/items")
      .insert_header(header)
      .set_json(json!({ "product_id": hoodie, "size": "M", "quantity": 2 }))
      .to_request(),
    test::TestRequest::delete().uri("/api/v1/cart").insert_header(header).to_request(),
    test::TestRequest::post().uri("/api/v1/checkout/start").insert_header(header).to_request(),
    test::TestRequest::post().uri("/api/v1/checkout/reset").insert_header(header).to_request(),
  ];
  for req in requests {
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
  assert!(state.carts.is_empty());
}

#[actix_web::test]
async fn empty_cart_cannot_start_checkout() {
  let fake = FakePlatform::new();
  let app = test_app!(&fake);
  let cart_id = new_cart!(app);
  let req = test::TestRequest::post()
    .uri("/api/v1/checkout/start")
    .insert_header(("X-Cart-ID", cart_id.as_str()))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Your cart is empty");
}

#[actix_web::test]
async fn admin_routes_require_an_admin_token() {
  setup_tracing();
  let (fake, _) = seeded();
  let (_, shopper_token) = fake.add_user("shopper@horas.com", "pw", false);
  fake.add_user("admin@horas.com", "pw", true);
  let app = test_app!(&fake);

  let anonymous = test::TestRequest::get().uri("/api/v1/admin/dashboard").to_request();
  assert_eq!(test::call_service(&app, anonymous).await.status(), StatusCode::UNAUTHORIZED);

  let bogus = test::TestRequest::get()
    .uri("/api/v1/admin/dashboard")
    .insert_header(("Authorization", "Bearer nope"))
    .to_request();
  assert_eq!(test::call_service(&app, bogus).await.status(), StatusCode::UNAUTHORIZED);

  let shopper = test::TestRequest::get()
    .uri("/api/v1/admin/dashboard")
    .insert_header(("Authorization", format!("Bearer {}", shopper_token)))
    .to_request();
  assert_eq!(test::call_service(&app, shopper).await.status(), StatusCode::FORBIDDEN);

  let login = test::TestRequest::post()
    .uri("/api/v1/admin/login")
    .set_json(json!({ "email": "admin@horas.com", "password": "pw" }))
    .to_request();
  let session: Value = test::call_and_read_body_json(&app, login).await;
  let token = session["access_token"].as_str().unwrap().to_string();

  let dashboard = test::TestRequest::get()
    .uri("/api/v1/admin/dashboard")
    .insert_header(("Authorization", format!("Bearer {}", token)))
    .to_request();
  let resp = test::call_service(&app, dashboard).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let stats: Value = test::read_body_json(resp).await;
  assert_eq!(stats["total"], 0);
}

#[actix_web::test]
async fn admin_manages_products_and_orders() {
  setup_tracing();
  let (fake, hoodie) = seeded();
  let (_, token) = fake.add_user("admin@horas.com", "pw", true);
  let auth = ("Authorization", format!("Bearer {}", token));
  let app = test_app!(&fake);

  let create = test::TestRequest::post()
    .uri("/api/v1/admin/products")
    .insert_header(auth.clone())
    .set_json(json!({
      "name": "Linen Shirt", "category": "Shirts", "price": "1200", "discount": "15",
      "image": { "file_name": "linen.jpg", "content_type": "image/jpeg", "data": "aGVsbG8=" }
    }))
    .to_request();
  let resp = test::call_service(&app, create).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created: Value = test::read_body_json(resp).await;
  assert_eq!(created["price"], 1200);
  assert_eq!(created["discount"], 15);

  let toggle = test::TestRequest::patch()
    .uri(&format!("/api/v1/admin/products/{}/new-arrival", hoodie))
    .insert_header(auth.clone())
    .set_json(json!({ "is_new_arrival": true }))
    .to_request();
  assert_eq!(test::call_service(&app, toggle).await.status(), StatusCode::OK);

  let delete = test::TestRequest::delete()
    .uri(&format!("/api/v1/admin/products/{}", hoodie))
    .insert_header(auth.clone())
    .to_request();
  assert_eq!(test::call_service(&app, delete).await.status(), StatusCode::NO_CONTENT);

  let list = test::TestRequest::get()
    .uri("/api/v1/admin/products")
    .insert_header(auth.clone())
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, list).await;
  let names: Vec<&str> = body["products"]
    .as_array()
    .unwrap()
    .iter()
    .filter_map(|p| p["name"].as_str())
    .collect();
  assert_eq!(names, vec!["Linen Shirt", "Plain Tee"]);

  let bad_status = test::TestRequest::patch()
    .uri(&format!("/api/v1/admin/orders/{}/status", Uuid::new_v4()))
    .insert_header(auth.clone())
    .set_json(json!({ "status": "Lost" }))
    .to_request();
  assert_eq!(test::call_service(&app, bad_status).await.status(), StatusCode::BAD_REQUEST);
}
