//! # Item update feed
//!
//! The backend publishes a message to a durable queue whenever an item is created, changed or deleted. This module
//! consumes that queue and applies each change to the store and the catalog cache.
//!
//! * [`FeedSource`] abstracts the queue. [`ChannelFeed`] is an in-process queue; [`SqliteFeed`] is a durable queue
//!   table living next to the store.
//! * [`FeedEvent`] decodes and validates raw message bodies.
//! * [`FeedConsumer`] is the long-running task that ties the two together.
//!
//! ## Delivery semantics
//! Messages are acknowledged as soon as they are received (auto-ack). A malformed message is logged and dropped, and
//! never blocks the queue; the catalog converges again on the next valid update for that item. A crash between
//! receipt and apply can lose the message in hand. Upserts are idempotent and deleting an unknown item is a no-op, so
//! duplicate delivery is harmless.
mod channel_feed;
mod consumer;
mod messages;
mod source;
#[cfg(feature = "sqlite")]
mod sqlite_feed;

pub use channel_feed::{ChannelFeed, FeedPublisher};
pub use consumer::{Backoff, ConsumerStats, FeedConsumer, MessageOutcome};
pub use messages::{FeedEvent, ItemDeleteMessage, ItemUpdateMessage, ValidationError, DELETE_CHANNEL};
pub use source::{FeedError, FeedMessage, FeedPoll, FeedSource};
#[cfg(feature = "sqlite")]
pub use sqlite_feed::{SqliteFeed, DEFAULT_QUEUE_NAME};
