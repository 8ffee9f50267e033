#![allow(dead_code)]

use ps_core::{ChannelStore, ManualClock, SinkEvent, StoreLimits};

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

pub const START: i64 = 1_700_000_000;

/// Store driven by a manual clock starting at `START`
pub fn store_with_clock(limits: StoreLimits) -> (ChannelStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let store = ChannelStore::with_clock(limits, clock.clone());
    (store, clock)
}

pub fn payload(text: &str) -> Bytes {
    Bytes::copy_from_slice(text.as_bytes())
}

/// Message ids currently queued on a sink receiver
pub fn drain_ids(rx: &mut mpsc::Receiver<SinkEvent>) -> Vec<u64> {
    let mut ids = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let SinkEvent::Message(message) = event {
            ids.push(message.id);
        }
    }
    ids
}
