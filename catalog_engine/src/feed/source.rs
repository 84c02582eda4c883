use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed connection error: {0}")]
    ConnectionError(String),
    #[error("Could not publish message: {0}")]
    PublishError(String),
}

/// A message as received from the queue. It has already been acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMessage {
    /// Queue-assigned sequence number, if the queue provides one.
    pub sequence: Option<i64>,
    pub payload: Vec<u8>,
    pub received_at: DateTime<Utc>,
}

impl FeedMessage {
    pub fn new(sequence: Option<i64>, payload: Vec<u8>) -> Self {
        Self { sequence, payload, received_at: Utc::now() }
    }

    /// The body as text, for logging.
    pub fn body_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// What a non-blocking receive found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPoll {
    Message(FeedMessage),
    /// Nothing is waiting right now.
    Empty,
    /// The feed has closed for good.
    Closed,
}

/// A queue of item update messages.
///
/// Receiving is split in two so that a consumer can stop between messages without losing one. `try_next_message`
/// acknowledges the message it takes, so once it has been polled it must be driven to completion.
/// `wait_for_message` only waits, and may be dropped at any point.
#[allow(async_fn_in_trait)]
pub trait FeedSource {
    /// Takes the next message if one is waiting.
    async fn try_next_message(&mut self) -> Result<FeedPoll, FeedError>;

    /// Resolves once `try_next_message` may find something. Dropping this future never consumes a message.
    async fn wait_for_message(&mut self);

    /// Waits for and takes the next message. `Ok(None)` means the feed has closed.
    async fn next_message(&mut self) -> Result<Option<FeedMessage>, FeedError> {
        loop {
            match self.try_next_message().await? {
                FeedPoll::Message(msg) => return Ok(Some(msg)),
                FeedPoll::Closed => return Ok(None),
                FeedPoll::Empty => self.wait_for_message().await,
            }
        }
    }
}
