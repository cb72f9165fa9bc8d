//! Generation tokens for discarding superseded async results.
//!
//! Every new input selection advances a shared counter and hands out a
//! [`Generation`]. Work started for that selection checks the token when it
//! finishes; if a newer selection has been made in the meantime the result
//! is dropped instead of being published.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of monotonically increasing generation tokens
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    latest: Arc<AtomicU64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, making every earlier token stale
    pub fn advance(&self) -> Generation {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Generation {
            id,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Id of the newest generation handed out (0 before the first)
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Token identifying one generation of work
#[derive(Debug, Clone)]
pub struct Generation {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl Generation {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// False once a newer generation has been started
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }

    /// Wrap a finished result, dropping it if this generation is stale
    pub fn complete<T>(&self, value: T) -> Completion<T> {
        if self.is_current() {
            Completion::Current(value)
        } else {
            Completion::Superseded
        }
    }
}

/// Outcome of work tagged with a [`Generation`]
#[derive(Debug, Clone, PartialEq)]
pub enum Completion<T> {
    /// Still the latest generation; the value may be published
    Current(T),
    /// A newer generation started first; the value was discarded
    Superseded,
}

impl<T> Completion<T> {
    pub fn into_current(self) -> Option<T> {
        match self {
            Completion::Current(value) => Some(value),
            Completion::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Completion::Superseded)
    }
}
