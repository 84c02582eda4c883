mod catalog_world;
mod setups;
mod steps;

pub use catalog_world::CatalogWorld;
