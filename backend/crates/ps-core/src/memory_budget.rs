use crate::{Result as StoreErrorResult, StoreError};

use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};

use error_location::ErrorLocation;

/// Byte budget shared by every channel and stored message
#[derive(Debug)]
pub struct MemoryBudget {
    /// 0 = unbounded
    limit: usize,
    used: AtomicUsize,
}

impl MemoryBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
        }
    }

    /// Reserve `bytes`, failing without side effects if the budget would be exceeded
    #[track_caller]
    pub fn try_reserve(&self, bytes: usize) -> StoreErrorResult<()> {
        let location = Location::caller();
        let mut current = self.used.load(Ordering::Relaxed);

        loop {
            let next = current.saturating_add(bytes);
            if self.limit > 0 && next > self.limit {
                return Err(StoreError::AllocationFailure {
                    requested: bytes,
                    available: self.limit.saturating_sub(current),
                    location: ErrorLocation::from(location),
                });
            }

            match self
                .used
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    pub fn release(&self, bytes: usize) {
        if bytes == 0 {
            return;
        }
        let _ = self
            .used
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |used| {
                Some(used.saturating_sub(bytes))
            });
    }

    pub fn used(&self) -> usize {
        self.used.load(Ordering::Relaxed)
    }
}
