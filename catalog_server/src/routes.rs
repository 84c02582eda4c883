//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any I/O (store access, backend calls) must be awaited, never
//! blocked on.
//!
//! Catalog reads are served from the shared [`CatalogCache`]. Cart and checkout handlers go through [`CartApi`] and
//! [`CheckoutApi`], which are registered as app data per worker.
use actix_web::{
    error::PathError,
    get,
    web,
    web::{PathConfig, ServiceConfig},
    HttpRequest,
    HttpResponse,
    Responder,
};
use catalog_engine::{
    db_types::{Customer, ItemId, UserId},
    CartApi,
    CatalogBackend,
    CatalogCache,
    CatalogStore,
    CheckoutApi,
    ItemStore,
};
use log::*;

use crate::{
    config::ServerConfig,
    data_objects::{CartUpdate, CartView, CheckoutParams, JsonResponse, PageParams},
    errors::ServerError,
};

const MAX_PAGE_SIZE: usize = 100;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Registers every route. The catalog cache, [`CartApi`], [`CheckoutApi`] and [`ServerConfig`] must be provided as
/// app data.
pub fn configure_routes<S, B>(cfg: &mut ServiceConfig)
where
    S: CatalogStore + 'static,
    B: CatalogBackend + 'static,
{
    cfg.app_data(PathConfig::default().error_handler(path_error))
        .service(health)
        .service(CatalogPageRoute::<S>::new())
        .service(CatalogItemRoute::<S>::new())
        .service(CartRoute::<S>::new())
        .service(AddToCartRoute::<S>::new())
        .service(RemoveFromCartRoute::<S>::new())
        .service(ClearCartRoute::<S>::new())
        .service(CheckoutRoute::<S, B>::new());
}

/// Ids in the path that are not integers get a JSON 400 rather than actix's plain 404.
fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Rejecting request with invalid path {}. {err}", req.path());
    ServerError::InvalidRequestPath(err.to_string()).into()
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(catalog_page => Get "/items" impl ItemStore);
/// Route handler for the catalog listing
///
/// Returns one page of the catalog, ordered by item id. Pages are numbered from zero. If `per_page` is not given, the
/// configured page size is used.
pub async fn catalog_page<S: ItemStore>(
    params: web::Query<PageParams>,
    cache: web::Data<CatalogCache<S>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    let page = params.page.unwrap_or(0);
    let per_page = params.per_page.unwrap_or(config.catalog_page_size).clamp(1, MAX_PAGE_SIZE);
    debug!("💻️ GET catalog page {page} ({per_page} per page)");
    let result = cache.page(page, per_page).await.map_err(|e| {
        debug!("💻️ Could not fetch the catalog. {e}");
        ServerError::BackendError(e.to_string())
    })?;
    Ok(HttpResponse::Ok().json(result))
}

route!(catalog_item => Get "/items/{item_id}" impl ItemStore);
pub async fn catalog_item<S: ItemStore>(
    path: web::Path<i64>,
    cache: web::Data<CatalogCache<S>>,
) -> Result<HttpResponse, ServerError> {
    let id = ItemId(path.into_inner());
    debug!("💻️ GET item #{id}");
    let item = cache.get(id).await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    match item {
        Some(item) => Ok(HttpResponse::Ok().json(item)),
        None => Err(ServerError::NoRecordFound(format!("Item {id} does not exist"))),
    }
}

//----------------------------------------------   Carts  ----------------------------------------------------
route!(cart => Get "/cart/{user_id}" impl CatalogStore);
/// Route handler for viewing a cart
///
/// Items that have been removed from the catalog since they were added are left out, and the total reflects current
/// catalog prices.
pub async fn cart<S: CatalogStore>(
    path: web::Path<i64>,
    api: web::Data<CartApi<S>>,
) -> Result<HttpResponse, ServerError> {
    let user = UserId(path.into_inner());
    debug!("💻️ GET cart for user {user}");
    let items = api.list(user).await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Ok().json(CartView::new(user, items)))
}

route!(add_to_cart => Post "/cart/{user_id}/items/{item_id}" impl CatalogStore);
pub async fn add_to_cart<S: CatalogStore>(
    path: web::Path<(i64, i64)>,
    api: web::Data<CartApi<S>>,
) -> Result<HttpResponse, ServerError> {
    let (user_id, item_id) = (UserId(path.0), ItemId(path.1));
    debug!("💻️ POST item #{item_id} to cart for user {user_id}");
    let changed = api.add(user_id, item_id).await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Ok().json(CartUpdate { user_id, item_id, changed }))
}

route!(remove_from_cart => Delete "/cart/{user_id}/items/{item_id}" impl CatalogStore);
pub async fn remove_from_cart<S: CatalogStore>(
    path: web::Path<(i64, i64)>,
    api: web::Data<CartApi<S>>,
) -> Result<HttpResponse, ServerError> {
    let (user_id, item_id) = (UserId(path.0), ItemId(path.1));
    debug!("💻️ DELETE item #{item_id} from cart for user {user_id}");
    let changed = api.remove(user_id, item_id).await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Ok().json(CartUpdate { user_id, item_id, changed }))
}

route!(clear_cart => Delete "/cart/{user_id}" impl CatalogStore);
pub async fn clear_cart<S: CatalogStore>(
    path: web::Path<i64>,
    api: web::Data<CartApi<S>>,
) -> Result<HttpResponse, ServerError> {
    let user = UserId(path.into_inner());
    debug!("💻️ DELETE cart for user {user}");
    let n = api.clear(user).await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("{n} items removed from the cart"))))
}

//----------------------------------------------  Checkout  ----------------------------------------------------
route!(checkout => Post "/cart/{user_id}/checkout" impl CatalogStore, CatalogBackend);
/// Route handler for checkout
///
/// Places an order for everything in the user's cart. The body is optional and may carry the user's `username`, which
/// is passed on to the backend.
///
/// On success the cart is emptied and the order receipt is returned. If the backend could not be reached or rejected
/// the order, the response is a 502 and the cart is left as it was.
pub async fn checkout<S: CatalogStore, B: CatalogBackend>(
    path: web::Path<i64>,
    body: Option<web::Json<CheckoutParams>>,
    api: web::Data<CheckoutApi<S, B>>,
) -> Result<HttpResponse, ServerError> {
    let mut customer = Customer::new(path.into_inner());
    if let Some(username) = body.and_then(|b| b.into_inner().username) {
        customer = customer.with_username(username);
    }
    debug!("💻️ POST checkout for user {}", customer.id);
    let receipt = api.checkout(&customer).await?;
    Ok(HttpResponse::Ok().json(receipt))
}
