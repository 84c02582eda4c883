use actix_web::{http::StatusCode, test::TestRequest};
use catalog_engine::{
    db_types::{ItemId, UserId},
    ItemStore,
};

use super::{
    helpers::{json, TestContext},
    mocks::MockBackend,
};

#[actix_web::test]
async fn add_and_view_cart() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.call(TestRequest::post().uri("/cart/7/items/1"), MockBackend::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["changed"], true);
    let (_, body) = ctx.call(TestRequest::post().uri("/cart/7/items/1"), MockBackend::new()).await;
    assert_eq!(json(&body)["changed"], false);
    ctx.call(TestRequest::post().uri("/cart/7/items/2"), MockBackend::new()).await;

    let (status, body) = ctx.get("/cart/7").await;
    assert_eq!(status, StatusCode::OK);
    let cart = json(&body);
    assert_eq!(cart["user_id"], 7);
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart["total_price"], 25.0);
}

#[actix_web::test]
async fn remove_from_cart() {
    let ctx = TestContext::new().await;
    ctx.carts().add(UserId(7), ItemId(3)).await.unwrap();
    let (status, body) = ctx.call(TestRequest::delete().uri("/cart/7/items/3"), MockBackend::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["changed"], true);
    let (status, body) = ctx.call(TestRequest::delete().uri("/cart/7/items/3"), MockBackend::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["changed"], false);
}

#[actix_web::test]
async fn clear_cart() {
    let ctx = TestContext::new().await;
    let carts = ctx.carts();
    carts.add(UserId(7), ItemId(1)).await.unwrap();
    carts.add(UserId(7), ItemId(2)).await.unwrap();
    let (status, body) = ctx.call(TestRequest::delete().uri("/cart/7"), MockBackend::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["message"], "2 items removed from the cart");
    assert!(carts.item_ids(UserId(7)).await.unwrap().is_empty());
}

#[actix_web::test]
async fn deleted_items_drop_out_of_cart_view() {
    let ctx = TestContext::new().await;
    let carts = ctx.carts();
    carts.add(UserId(7), ItemId(1)).await.unwrap();
    carts.add(UserId(7), ItemId(4)).await.unwrap();
    ctx.store.delete_item(ItemId(1)).await.unwrap();
    ctx.cache.remove(ItemId(1));
    let (_, body) = ctx.get("/cart/7").await;
    let cart = json(&body);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["name"], "Cap");
    assert_eq!(cart["total_price"], 5.0);
}

#[actix_web::test]
async fn invalid_path_is_rejected() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.call(TestRequest::post().uri("/cart/seven/items/1"), MockBackend::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().starts_with("Could not read request path"));
    let (status, body) = ctx.get("/items/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].is_string());
}
