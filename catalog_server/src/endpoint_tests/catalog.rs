use actix_web::http::StatusCode;
use catalog_engine::db_types::ItemId;
use serde_json::json;

use super::helpers::{json, TestContext};

#[actix_web::test]
async fn health() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn first_page_uses_default_page_size() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/items").await;
    assert_eq!(status, StatusCode::OK);
    let page = json(&body);
    assert_eq!(page["page"], 0);
    assert_eq!(page["per_page"], 3);
    assert_eq!(page["total_items"], 5);
    assert_eq!(page["total_pages"], 2);
    let names = page["items"].as_array().unwrap().iter().map(|i| i["name"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(names, ["Logo", "Banner", "Mug"]);
}

#[actix_web::test]
async fn later_pages() {
    let ctx = TestContext::new().await;
    let (_, body) = ctx.get("/items?page=1").await;
    let page = json(&body);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["items"][1]["price"], 1.25);
    let (_, body) = ctx.get("/items?page=7&per_page=2").await;
    let page = json(&body);
    assert_eq!(page["total_pages"], 3);
    assert!(page["items"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn single_item() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/items/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"id": 3, "name": "Mug", "description": null, "price": 7.5}));
}

#[actix_web::test]
async fn missing_item_is_not_found() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/items/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"], "The data was not found. Item 99 does not exist");
}

#[actix_web::test]
async fn catalog_reflects_cache_updates() {
    let ctx = TestContext::new().await;
    ctx.get("/items").await;
    assert!(ctx.cache.is_warm());
    ctx.cache.remove(ItemId(1));
    let (_, body) = ctx.get("/items").await;
    assert_eq!(json(&body)["total_items"], 4);
}
