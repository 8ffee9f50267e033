use crate::{Message, SubscriberId};

use std::sync::Arc;

use tokio::sync::mpsc;

/// What a subscriber connection receives from its channel
#[derive(Debug, Clone)]
pub enum SinkEvent {
    Message(Arc<Message>),
    /// Terminal: the channel was deleted and the sink detached
    ChannelDeleted,
}

/// Result of one delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Sink queue full; the event was dropped for this sink only
    Full,
    /// Receiving side is gone
    Closed,
}

/// Delivery endpoint of an attached subscriber.
///
/// Wraps the sending half of a bounded queue; the connection task owns the
/// receiving half. Delivery never waits.
#[derive(Debug, Clone)]
pub struct SubscriberSink {
    id: SubscriberId,
    sender: mpsc::Sender<SinkEvent>,
}

impl SubscriberSink {
    /// Create a sink and the receiver its connection drains
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SinkEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let sink = Self {
            id: SubscriberId::new(),
            sender,
        };
        (sink, receiver)
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn deliver(&self, event: SinkEvent) -> Delivery {
        match self.sender.try_send(event) {
            Ok(()) => Delivery::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => Delivery::Full,
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}
