//! # Catalog server
//! This crate hosts the HTTP front end of the catalog sync engine. It is responsible for:
//! * Seeding the local catalog store from the backend at start-up.
//! * Running the feed worker, which keeps the store and the catalog cache in step with the backend's item feed.
//! * Serving the catalog, per-user carts and checkout over a JSON API.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /items?page=N&per_page=M`: One page of the catalog.
//! * `GET /items/{id}`: A single item.
//! * `GET /cart/{user_id}`: The user's cart and its total.
//! * `POST /cart/{user_id}/items/{item_id}` and `DELETE /cart/{user_id}/items/{item_id}`: Add or remove an item.
//! * `DELETE /cart/{user_id}`: Empty the cart.
//! * `POST /cart/{user_id}/checkout`: Place an order for the contents of the cart.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod feed_worker;
pub mod integrations;
pub mod routes;
pub mod server;
