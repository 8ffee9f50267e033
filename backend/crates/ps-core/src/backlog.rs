use crate::{Message, ReplayCursor};

use std::collections::VecDeque;
use std::sync::Arc;

/// Retained history of one channel, oldest first
#[derive(Debug, Default)]
pub struct Backlog {
    messages: VecDeque<Arc<Message>>,
    stored_bytes: usize,
}

impl Backlog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Arc<Message>) {
        self.stored_bytes += message.footprint();
        self.messages.push_back(message);
    }

    /// Remove the oldest message
    pub fn pop_oldest(&mut self) -> Option<Arc<Message>> {
        let message = self.messages.pop_front()?;
        self.stored_bytes -= message.footprint();
        Some(message)
    }

    pub fn oldest(&self) -> Option<&Arc<Message>> {
        self.messages.front()
    }

    pub fn newest(&self) -> Option<&Arc<Message>> {
        self.messages.back()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Bytes charged for the messages currently held
    pub fn stored_bytes(&self) -> usize {
        self.stored_bytes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Message>> {
        self.messages.iter()
    }

    /// Drop everything, returning the bytes released
    pub fn clear(&mut self) -> usize {
        self.messages.clear();
        std::mem::take(&mut self.stored_bytes)
    }

    /// Point-in-time copy of the messages a cursor selects, skipping expired ones
    pub fn replay(&self, cursor: ReplayCursor, now: i64) -> Vec<Arc<Message>> {
        let live = self.messages.iter().filter(|m| !m.is_expired(now));

        match cursor {
            ReplayCursor::AfterId(id) => live.filter(|m| m.id > id).cloned().collect(),
            ReplayCursor::Since { time, tag } => {
                live.filter(|m| m.is_after(time, tag)).cloned().collect()
            }
            ReplayCursor::Backtrack(count) => {
                let live: Vec<_> = live.cloned().collect();
                let skip = live.len().saturating_sub(count);
                live.into_iter().skip(skip).collect()
            }
        }
    }
}
