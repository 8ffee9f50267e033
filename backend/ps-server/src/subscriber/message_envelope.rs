use ps_core::Message;

use serde::Serialize;

/// Wire form of a message sent to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEnvelope {
    pub id: u64,
    pub channel: String,
    pub tag: u32,
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    pub text: String,
}

impl MessageEnvelope {
    pub fn new(channel: &str, message: &Message) -> Self {
        Self {
            id: message.id,
            channel: channel.to_string(),
            tag: message.tag,
            time: message.time,
            event: message.event.clone(),
            text: message.text(),
        }
    }

    pub fn to_json(&self) -> String {
        // Serializing plain strings and integers cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}
