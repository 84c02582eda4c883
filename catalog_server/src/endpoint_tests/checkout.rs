use actix_web::{http::StatusCode, test::TestRequest};
use catalog_engine::db_types::{ItemId, OrderId, UserId};
use serde_json::json;

use super::{
    helpers::{json, TestContext},
    mocks::{MockBackend, MockBackendError},
};

#[actix_web::test]
async fn successful_checkout() {
    let ctx = TestContext::new().await;
    let carts = ctx.carts();
    carts.add(UserId(7), ItemId(1)).await.unwrap();
    carts.add(UserId(7), ItemId(2)).await.unwrap();
    let mut backend = MockBackend::new();
    backend
        .expect_submit_order()
        .withf(|order| {
            order.user_id == UserId(7)
                && order.username.as_deref() == Some("alice")
                && order.items.len() == 2
                && order.total_price.cents() == 2500
        })
        .times(1)
        .returning(|_| Ok(OrderId(42)));
    let req = TestRequest::post().uri("/cart/7/checkout").set_json(json!({"username": "alice"}));
    let (status, body) = ctx.call(req, backend).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let receipt = json(&body);
    assert_eq!(receipt["order_id"], 42);
    assert_eq!(receipt["total_price"], 25.0);
    assert!(carts.item_ids(UserId(7)).await.unwrap().is_empty());
}

#[actix_web::test]
async fn checkout_without_a_body() {
    let ctx = TestContext::new().await;
    ctx.carts().add(UserId(8), ItemId(5)).await.unwrap();
    let mut backend = MockBackend::new();
    backend.expect_submit_order().withf(|order| order.username.is_none()).times(1).returning(|_| Ok(OrderId(3)));
    let (status, body) = ctx.call(TestRequest::post().uri("/cart/8/checkout"), backend).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(json(&body)["order_id"], 3);
}

#[actix_web::test]
async fn empty_cart() {
    let ctx = TestContext::new().await;
    let mut backend = MockBackend::new();
    backend.expect_submit_order().never();
    let (status, body) = ctx.call(TestRequest::post().uri("/cart/9/checkout"), backend).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = json(&body)["error"].as_str().unwrap().to_string();
    assert!(error.contains("cart for user 9 is empty"), "{error}");
}

#[actix_web::test]
async fn backend_failure_keeps_cart() {
    let ctx = TestContext::new().await;
    let carts = ctx.carts();
    carts.add(UserId(7), ItemId(3)).await.unwrap();
    let mut backend = MockBackend::new();
    backend.expect_submit_order().times(1).returning(|_| Err(MockBackendError::Unavailable));
    let (status, body) = ctx.call(TestRequest::post().uri("/cart/7/checkout"), backend).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json(&body)["error"].as_str().unwrap().contains("Connection refused"));
    assert_eq!(carts.item_ids(UserId(7)).await.unwrap(), vec![ItemId(3)]);

    let mut backend = MockBackend::new();
    backend.expect_submit_order().times(1).returning(|_| Err(MockBackendError::Rejected("bad user".into())));
    let (status, _) = ctx.call(TestRequest::post().uri("/cart/7/checkout"), backend).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(carts.item_ids(UserId(7)).await.unwrap(), vec![ItemId(3)]);
}
