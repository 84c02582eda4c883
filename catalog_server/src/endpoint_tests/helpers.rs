use std::sync::Arc;

use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use catalog_engine::{
    events::EventProducers,
    test_utils::prepare_env::{prepare_test_env, test_item},
    CartApi,
    CatalogCache,
    CheckoutApi,
    ItemStore,
    SqliteStore,
};
use log::debug;

use crate::{config::ServerConfig, endpoint_tests::mocks::MockBackend, routes::configure_routes};

pub struct TestContext {
    pub store: SqliteStore,
    pub cache: Arc<CatalogCache<SqliteStore>>,
}

impl TestContext {
    /// A store holding `Logo` (10.00), `Banner` (15.00), `Mug` (7.50), `Cap` (5.00) and `Pen` (1.25), ids 1 to 5.
    pub async fn new() -> Self {
        let _ = env_logger::try_init();
        let store = prepare_test_env().await;
        let items = [
            test_item(1, "Logo", 1000),
            test_item(2, "Banner", 1500),
            test_item(3, "Mug", 750),
            test_item(4, "Cap", 500),
            test_item(5, "Pen", 125),
        ];
        store.upsert_items(&items).await.expect("Error seeding store");
        let cache = Arc::new(CatalogCache::new(store.clone()));
        Self { store, cache }
    }

    pub fn carts(&self) -> CartApi<SqliteStore> {
        CartApi::new(self.store.clone(), Arc::clone(&self.cache))
    }

    /// Sends the request to a fresh app wired to this context's store and the given backend.
    pub async fn call(&self, req: TestRequest, backend: MockBackend) -> (StatusCode, String) {
        let carts = self.carts();
        let checkout = CheckoutApi::new(carts.clone(), backend, EventProducers::default());
        let app = App::new()
            .app_data(web::Data::new(ServerConfig::default()))
            .app_data(web::Data::from(Arc::clone(&self.cache)))
            .app_data(web::Data::new(carts))
            .app_data(web::Data::new(checkout))
            .configure(configure_routes::<SqliteStore, MockBackend>);
        let service = test::init_service(app).await;
        debug!("Making request");
        let res = test::call_service(&service, req.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.call(TestRequest::get().uri(path), MockBackend::new()).await
    }
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Response is not JSON ({e}): {body}"))
}
