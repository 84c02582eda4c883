use std::time::Duration;

use log::*;
use sqlx::{Row, SqlitePool};

use crate::{
    feed::{FeedError, FeedEvent, FeedMessage, FeedPoll, FeedSource},
    SqliteStore,
};

pub const DEFAULT_QUEUE_NAME: &str = "item_queue";

/// A durable feed stored in the `feed_messages` table of the store's database.
///
/// Receiving a message deletes its row, which is the acknowledgement. Rows are handed out in insertion order. When
/// the queue is empty, the feed polls every `poll_interval`.
#[derive(Clone)]
pub struct SqliteFeed {
    pool: SqlitePool,
    queue: String,
    poll_interval: Duration,
}

impl SqliteFeed {
    pub fn new(store: &SqliteStore, queue: &str, poll_interval: Duration) -> Self {
        Self { pool: store.pool().clone(), queue: queue.to_string(), poll_interval }
    }

    pub fn queue(&self) -> &str {
        self.queue.as_str()
    }

    /// Appends a message to the queue and returns its sequence number.
    pub async fn publish(&self, payload: &[u8]) -> Result<i64, FeedError> {
        let id = sqlx::query("INSERT INTO feed_messages (queue, payload) VALUES ($1, $2) RETURNING id")
            .bind(self.queue.as_str())
            .bind(payload)
            .fetch_one(&self.pool)
            .await
            .and_then(|row| row.try_get::<i64, _>("id"))
            .map_err(|e| FeedError::PublishError(e.to_string()))?;
        trace!("📬️ Message #{id} published to {}", self.queue);
        Ok(id)
    }

    pub async fn publish_event(&self, event: &FeedEvent) -> Result<i64, FeedError> {
        self.publish(&event.encode()).await
    }

    /// The number of messages waiting in the queue.
    pub async fn pending(&self) -> Result<i64, FeedError> {
        sqlx::query("SELECT COUNT(*) AS n FROM feed_messages WHERE queue = $1")
            .bind(self.queue.as_str())
            .fetch_one(&self.pool)
            .await
            .and_then(|row| row.try_get::<i64, _>("n"))
            .map_err(|e| FeedError::ConnectionError(e.to_string()))
    }

    /// Removes and returns the oldest message in the queue without waiting. `Ok(None)` means the queue is empty.
    ///
    /// The row is deleted as soon as the statement runs, so a caller that drops this future part way through may lose
    /// the message.
    pub async fn pop_message(&self) -> Result<Option<FeedMessage>, FeedError> {
        let row = sqlx::query(
            r#"DELETE FROM feed_messages
            WHERE id = (SELECT id FROM feed_messages WHERE queue = $1 ORDER BY id LIMIT 1)
            RETURNING id, payload"#,
        )
        .bind(self.queue.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| FeedError::ConnectionError(e.to_string()))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let decode = |e: sqlx::Error| FeedError::ConnectionError(e.to_string());
        let id = row.try_get::<i64, _>("id").map_err(decode)?;
        let payload = row.try_get::<Vec<u8>, _>("payload").map_err(decode)?;
        Ok(Some(FeedMessage::new(Some(id), payload)))
    }
}

impl FeedSource for SqliteFeed {
    async fn try_next_message(&mut self) -> Result<FeedPoll, FeedError> {
        match self.pop_message().await? {
            Some(msg) => {
                trace!("📬️ Received message #{:?} from {}", msg.sequence, self.queue);
                Ok(FeedPoll::Message(msg))
            },
            None => Ok(FeedPoll::Empty),
        }
    }

    async fn wait_for_message(&mut self) {
        tokio::time::sleep(self.poll_interval).await;
    }
}
