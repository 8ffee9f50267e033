
use crate::Message;

use std::sync::Arc;

use bytes::Bytes;

/// Build a message without going through a store
pub(crate) fn message(id: u64, time: i64, tag: u32, expires: Option<i64>) -> Arc<Message> {
    Arc::new(Message {
        id,
        tag,
        event: None,
        payload: Bytes::from(format!("message-{id}")),
        time,
        expires,
    })
}
