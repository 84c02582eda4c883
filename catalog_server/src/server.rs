use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use catalog_engine::{
    events::{EventHandlers, EventHooks, EventProducers, OrderPlacedEvent},
    feed::SqliteFeed,
    CartApi,
    CatalogBootstrap,
    CatalogCache,
    CheckoutApi,
    SqliteStore,
};
use futures::future::join_all;
use log::*;
use tokio::sync::watch;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    feed_worker::start_feed_worker,
    integrations::backend::HttpCatalogBackend,
    routes::configure_routes,
};

const EVENT_BUFFER_SIZE: usize = 128;
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let store = SqliteStore::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    store.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let backend =
        HttpCatalogBackend::new(config.backend.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;

    if config.skip_bootstrap {
        info!("🚀️ Skipping catalog bootstrap. The catalog will be served from the existing store.");
    } else {
        let report = CatalogBootstrap::new(store.clone(), backend.clone()).run().await;
        info!("🚀️ Catalog bootstrap {report}");
    }

    let cache = Arc::new(CatalogCache::new(store.clone()));
    let feed = SqliteFeed::new(&store, &config.feed_queue, config.feed_poll_interval);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let feed_worker = start_feed_worker(store.clone(), Arc::clone(&cache), feed, shutdown_rx);

    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, create_event_hooks());
    let producers = handlers.producers();
    let hook_tasks = handlers.start_handlers();

    let srv = create_server_instance(config, store, cache, backend, producers)?;
    let result = srv.await;

    info!("🚀️ Server has stopped. Shutting down the feed worker");
    let _ = shutdown_tx.send(true);
    match tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, feed_worker).await {
        Ok(Ok(stats)) => debug!("🚀️ Feed worker stats: {stats:?}"),
        Ok(Err(e)) => error!("🚀️ Feed worker did not shut down cleanly. {e}"),
        Err(_) => warn!("🚀️ Feed worker did not stop within {}s", SHUTDOWN_GRACE_PERIOD.as_secs()),
    }
    if tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, join_all(hook_tasks)).await.is_err() {
        warn!("🚀️ Some event hooks were still running at shutdown");
    }
    result.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Orders are logged as they are placed. This is where notifications to staff would be hooked in.
fn create_event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_order_placed(|ev: OrderPlacedEvent| {
        Box::pin(async move {
            let receipt = &ev.receipt;
            let lines = receipt.items.iter().map(|i| format!("{} ({})", i.name, i.price)).collect::<Vec<_>>();
            info!(
                "📦️ New order #{} from user {} ({}) at {}: {}. Total: {}",
                receipt.order_id,
                receipt.user_id,
                ev.username.as_deref().unwrap_or("no username"),
                ev.placed_at,
                lines.join(", "),
                receipt.total_price
            );
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    store: SqliteStore,
    cache: Arc<CatalogCache<SqliteStore>>,
    backend: HttpCatalogBackend,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    info!("🚀️ Listening on {host}:{port}");
    let srv = HttpServer::new(move || {
        let carts = CartApi::new(store.clone(), Arc::clone(&cache));
        let checkout_api = CheckoutApi::new(carts.clone(), backend.clone(), producers.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("cse::access_log"))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::from(Arc::clone(&cache)))
            .app_data(web::Data::new(carts))
            .app_data(web::Data::new(checkout_api))
            .configure(configure_routes::<SqliteStore, HttpCatalogBackend>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
