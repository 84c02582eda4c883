use catalog_common::Price;
use catalog_engine::{
    db_types::{Customer, Item, ItemId, OrderId, UserId},
    feed::FeedEvent,
    BootstrapReport,
    CheckoutError,
};
use cucumber::{then, when};

use crate::cucumber::CatalogWorld;

fn price(value: f64) -> Price {
    Price::try_from(value).expect("Invalid price")
}

pub fn item(id: i64, name: &str, value: f64) -> Item {
    Item::new(id, name, price(value))
}

fn parse_ids(ids: &str) -> Vec<ItemId> {
    ids.split(',').filter(|s| !s.trim().is_empty()).map(|s| ItemId(s.trim().parse().expect("Invalid item id"))).collect()
}

//----------------------------------------------   Carts  ----------------------------------------------------
#[when(expr = "user {int} adds item {int} to their cart")]
async fn add_to_cart(world: &mut CatalogWorld, user: i64, item: i64) {
    world.system().carts.add(UserId(user), ItemId(item)).await.expect("Error adding to cart");
}

#[when(expr = "user {int} removes item {int} from their cart")]
async fn remove_from_cart(world: &mut CatalogWorld, user: i64, item: i64) {
    world.system().carts.remove(UserId(user), ItemId(item)).await.expect("Error removing from cart");
}

#[then(expr = "the cart for user {int} lists items {string}")]
async fn cart_lists(world: &mut CatalogWorld, user: i64, ids: String) {
    let items = world.system().carts.list(UserId(user)).await.expect("Error listing cart");
    let listed = items.iter().map(|i| i.id).collect::<Vec<_>>();
    assert_eq!(listed, parse_ids(&ids), "Cart contents are incorrect");
}

#[then(expr = "the cart for user {int} is empty")]
async fn cart_is_empty(world: &mut CatalogWorld, user: i64) {
    let ids = world.system().carts.item_ids(UserId(user)).await.expect("Error reading cart");
    assert!(ids.is_empty(), "Cart is not empty: {ids:?}");
}

#[then(expr = "the cart for user {int} still holds items {string}")]
async fn cart_holds(world: &mut CatalogWorld, user: i64, ids: String) {
    let held = world.system().carts.item_ids(UserId(user)).await.expect("Error reading cart");
    assert_eq!(held, parse_ids(&ids), "Cart membership is incorrect");
}

//----------------------------------------------  Checkout ----------------------------------------------------
#[when(expr = "user {int} checks out as {string}")]
async fn checkout(world: &mut CatalogWorld, user: i64, username: String) {
    let customer = Customer::new(user).with_username(username);
    let result = world.system().checkout.checkout(&customer).await;
    world.last_checkout = Some(result);
}

#[then(expr = "the checkout succeeds with order {int} and total {float}")]
async fn checkout_succeeds(world: &mut CatalogWorld, order_id: i64, total: f64) {
    let receipt = match world.last_checkout.as_ref().expect("No checkout was attempted") {
        Ok(receipt) => receipt,
        Err(e) => panic!("Checkout failed: {e}"),
    };
    assert_eq!(receipt.order_id, OrderId(order_id));
    assert_eq!(receipt.total_price, price(total));
}

#[then("the checkout fails because the cart is empty")]
async fn checkout_fails_empty(world: &mut CatalogWorld) {
    let result = world.last_checkout.as_ref().expect("No checkout was attempted");
    assert!(matches!(result, Err(CheckoutError::EmptyCart(_))), "Unexpected result: {result:?}");
}

#[then("the checkout fails because the backend rejected the order")]
async fn checkout_fails_submission(world: &mut CatalogWorld) {
    let result = world.last_checkout.as_ref().expect("No checkout was attempted");
    assert!(matches!(result, Err(CheckoutError::SubmissionFailed(_))), "Unexpected result: {result:?}");
}

#[then(expr = "the backend has received {int} order(s)")]
async fn backend_orders(world: &mut CatalogWorld, count: usize) {
    assert_eq!(world.system().backend.submissions().len(), count);
}

//----------------------------------------------    Feed   ----------------------------------------------------
#[when(expr = "the feed publishes the message {string}")]
async fn publish_raw(world: &mut CatalogWorld, body: String) {
    world.system().feed.publish(body.as_bytes()).await.expect("Error publishing message");
}

#[when(expr = "the feed publishes an update for item {int} {string} priced at {float}")]
async fn publish_update(world: &mut CatalogWorld, id: i64, name: String, value: f64) {
    let event = FeedEvent::ItemUpdated(item(id, &name, value));
    world.system().feed.publish_event(&event).await.expect("Error publishing message");
}

#[when(expr = "the feed publishes a delete for item {int}")]
async fn publish_delete(world: &mut CatalogWorld, id: i64) {
    let event = FeedEvent::ItemDeleted(ItemId(id));
    world.system().feed.publish_event(&event).await.expect("Error publishing message");
}

#[when("the feed is processed")]
async fn process_feed(world: &mut CatalogWorld) {
    let stats = world.system().drain_feed().await;
    world.feed_stats = stats;
}

#[then(expr = "the catalog contains {int} item(s)")]
async fn catalog_size(world: &mut CatalogWorld, count: usize) {
    let items = world.system().cache.get_all().await.expect("Error reading catalog");
    assert_eq!(items.len(), count, "Catalog is {items:?}");
}

#[then(expr = "item {int} is called {string} and costs {float}")]
async fn item_details(world: &mut CatalogWorld, id: i64, name: String, value: f64) {
    let item = world.system().cache.get(ItemId(id)).await.expect("Error reading catalog");
    let item = item.unwrap_or_else(|| panic!("Item {id} is not in the catalog"));
    assert_eq!(item.name, name);
    assert_eq!(item.price, price(value));
}

#[then(expr = "the consumer rejected {int} message(s)")]
async fn rejected(world: &mut CatalogWorld, count: u64) {
    assert_eq!(world.feed_stats.rejected, count);
}

#[then(expr = "the bootstrap seeded {int} items")]
async fn bootstrap_seeded(world: &mut CatalogWorld, count: usize) {
    assert_eq!(world.last_bootstrap, Some(BootstrapReport::Seeded(count)));
}

#[then("the bootstrap was skipped")]
async fn bootstrap_skipped(world: &mut CatalogWorld) {
    assert!(matches!(world.last_bootstrap, Some(BootstrapReport::Skipped(_))));
}
