use catalog_engine::CatalogBootstrap;
use cucumber::{gherkin::Step, given, when};

use crate::cucumber::{catalog_world::CatalogSystem, steps::item, CatalogWorld};

#[given("a fresh install")]
async fn fresh_install(world: &mut CatalogWorld) {
    let system = CatalogSystem::new().await;
    world.system = Some(system);
}

#[given("the backend lists these items")]
async fn backend_lists_items(world: &mut CatalogWorld, step: &Step) {
    let table = step.table.as_ref().expect("A table of items is required");
    for row in table.rows.iter().skip(1) {
        let id = row[0].parse::<i64>().expect("Invalid item id");
        let price = row[2].parse::<f64>().expect("Invalid price");
        let mut new_item = item(id, &row[1], price);
        if let Some(description) = row.get(3).filter(|d| !d.is_empty()) {
            new_item = new_item.with_description(description.as_str());
        }
        world.system().backend.add_item(new_item);
    }
}

#[given("the backend is unavailable")]
async fn backend_unavailable(world: &mut CatalogWorld) {
    let backend = &world.system().backend;
    backend.fail_fetches(true);
    backend.fail_submissions(true);
}

#[given("the backend is available again")]
async fn backend_available(world: &mut CatalogWorld) {
    let backend = &world.system().backend;
    backend.fail_fetches(false);
    backend.fail_submissions(false);
}

#[given(expr = "the backend assigns order ids from {int}")]
async fn backend_order_ids(world: &mut CatalogWorld, id: i64) {
    world.system().backend.set_next_order_id(id);
}

#[given("the catalog has been bootstrapped")]
async fn bootstrapped(world: &mut CatalogWorld) {
    run_bootstrap(world).await;
}

#[when("the catalog is bootstrapped")]
async fn bootstrap(world: &mut CatalogWorld) {
    run_bootstrap(world).await;
}

async fn run_bootstrap(world: &mut CatalogWorld) {
    let system = world.system();
    let report = CatalogBootstrap::new(system.store.clone(), system.backend.clone()).run().await;
    world.last_bootstrap = Some(report);
}
