use catalog_common::Price;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db_types::{Item, ItemId};

/// Messages carrying this `channel` value are deletes. Anything else is treated as an update.
pub const DELETE_CHANNEL: &str = "item_deletes";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Message is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("Message is not a JSON object")]
    NotAnObject,
    #[error("Invalid item update message: {0}")]
    InvalidUpdate(String),
    #[error("Invalid item delete message: {0}")]
    InvalidDelete(String),
}

/// `{id, name, price, description}`. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdateMessage {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: Option<String>,
}

/// `{channel: "item_deletes", id}`. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDeleteMessage {
    pub channel: String,
    pub id: ItemId,
}

impl ItemDeleteMessage {
    pub fn new(id: ItemId) -> Self {
        Self { channel: DELETE_CHANNEL.to_string(), id }
    }
}

impl From<ItemUpdateMessage> for Item {
    fn from(msg: ItemUpdateMessage) -> Self {
        Item { id: msg.id, name: msg.name, description: msg.description, price: msg.price }
    }
}

impl From<&Item> for ItemUpdateMessage {
    fn from(item: &Item) -> Self {
        Self { id: item.id, name: item.name.clone(), price: item.price, description: item.description.clone() }
    }
}

/// A validated feed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    ItemUpdated(Item),
    ItemDeleted(ItemId),
}

impl FeedEvent {
    /// Decodes a raw message body, discriminating on the `channel` marker and validating the shape expected for that
    /// kind of message.
    pub fn decode(payload: &[u8]) -> Result<Self, ValidationError> {
        let value = serde_json::from_slice::<Value>(payload).map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
        let is_delete = match &value {
            Value::Object(map) => map.get("channel").and_then(Value::as_str) == Some(DELETE_CHANNEL),
            _ => return Err(ValidationError::NotAnObject),
        };
        if is_delete {
            let msg = serde_json::from_value::<ItemDeleteMessage>(value)
                .map_err(|e| ValidationError::InvalidDelete(e.to_string()))?;
            Ok(Self::ItemDeleted(msg.id))
        } else {
            let msg = serde_json::from_value::<ItemUpdateMessage>(value)
                .map_err(|e| ValidationError::InvalidUpdate(e.to_string()))?;
            Ok(Self::ItemUpdated(msg.into()))
        }
    }

    /// The wire form of this event.
    pub fn encode(&self) -> Vec<u8> {
        let value = match self {
            Self::ItemUpdated(item) => serde_json::to_value(ItemUpdateMessage::from(item)),
            Self::ItemDeleted(id) => serde_json::to_value(ItemDeleteMessage::new(*id)),
        };
        value.map(|v| v.to_string().into_bytes()).unwrap_or_default()
    }
}
