// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight guard for the shared working tree.
//!
//! The working tree is process-wide, so the guard is too: one slot,
//! taken for the whole duration of a run regardless of which connection
//! triggered it. The permit is released on drop, which covers every
//! terminal path including a panicking task.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Clone)]
pub struct UpdateGuard {
    slot: Arc<Semaphore>,
}

/// Held for the duration of one run; dropping it re-opens the slot.
pub struct RunPermit {
    _permit: OwnedSemaphorePermit,
}

impl UpdateGuard {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Claim the slot without waiting; `None` while a run is in flight.
    pub fn try_begin(&self) -> Option<RunPermit> {
        Arc::clone(&self.slot)
            .try_acquire_owned()
            .ok()
            .map(|permit| RunPermit { _permit: permit })
    }
}

impl Default for UpdateGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
