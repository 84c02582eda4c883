mod helpers;
mod price;

pub mod op;
mod secret;

pub use helpers::{parse_boolean_flag, parse_env_or_default};
pub use price::{Price, PriceConversionError, CENTS_PER_UNIT};
pub use secret::Secret;
