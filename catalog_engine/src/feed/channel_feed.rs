use log::*;
use tokio::sync::{mpsc, mpsc::error::TryRecvError};

use crate::feed::{FeedError, FeedEvent, FeedMessage, FeedPoll, FeedSource};

/// An in-process feed backed by a bounded tokio channel. The feed closes once every [`FeedPublisher`] is dropped.
pub struct ChannelFeed {
    receiver: mpsc::Receiver<Vec<u8>>,
    // Taken off the channel by `wait_for_message`, not yet handed out
    buffered: Option<Vec<u8>>,
    received: i64,
}

impl ChannelFeed {
    pub fn new(buffer_size: usize) -> (Self, FeedPublisher) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        (Self { receiver, buffered: None, received: 0 }, FeedPublisher { sender })
    }
}

impl ChannelFeed {
    fn deliver(&mut self, payload: Vec<u8>) -> FeedPoll {
        self.received += 1;
        FeedPoll::Message(FeedMessage::new(Some(self.received), payload))
    }
}

impl FeedSource for ChannelFeed {
    async fn try_next_message(&mut self) -> Result<FeedPoll, FeedError> {
        if let Some(payload) = self.buffered.take() {
            return Ok(self.deliver(payload));
        }
        match self.receiver.try_recv() {
            Ok(payload) => Ok(self.deliver(payload)),
            Err(TryRecvError::Empty) => Ok(FeedPoll::Empty),
            Err(TryRecvError::Disconnected) => Ok(FeedPoll::Closed),
        }
    }

    async fn wait_for_message(&mut self) {
        if self.buffered.is_some() {
            return;
        }
        // `recv` is cancel safe. A closed channel shows up as `Disconnected` on the next `try_recv`.
        self.buffered = self.receiver.recv().await;
    }
}

#[derive(Clone)]
pub struct FeedPublisher {
    sender: mpsc::Sender<Vec<u8>>,
}

impl FeedPublisher {
    pub async fn publish<P: Into<Vec<u8>>>(&self, payload: P) -> Result<(), FeedError> {
        self.sender.send(payload.into()).await.map_err(|e| {
            error!("📬️ Failed to publish feed message: {e}");
            FeedError::PublishError("The feed has been closed".to_string())
        })
    }

    pub async fn publish_event(&self, event: &FeedEvent) -> Result<(), FeedError> {
        self.publish(event.encode()).await
    }
}
