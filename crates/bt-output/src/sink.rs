//! The `EventSink` trait and the in-memory sink.

use bt_core::StateUpdate;

use crate::OutputResult;

/// Append-only destination for per-tick updates.
///
/// `append` must not return until the record is durable (or, for in-memory
/// sinks, stored): the engine treats a returned error as fatal for the tick
/// and dispatches nothing for it.
pub trait EventSink {
    /// Persist one update.
    fn append(&mut self, update: &StateUpdate) -> OutputResult<()>;

    /// Number of records appended so far.
    fn records_written(&self) -> u64;
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn append(&mut self, update: &StateUpdate) -> OutputResult<()> {
        (**self).append(update)
    }

    fn records_written(&self) -> u64 {
        (**self).records_written()
    }
}

/// Keeps every update in a `Vec`.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub updates: Vec<StateUpdate>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for MemorySink {
    fn append(&mut self, update: &StateUpdate) -> OutputResult<()> {
        self.updates.push(update.clone());
        Ok(())
    }

    fn records_written(&self) -> u64 {
        self.updates.len() as u64
    }
}
