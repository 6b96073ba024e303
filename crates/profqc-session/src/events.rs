//! Strictly ordered event delivery.
//!
//! State changes enqueue events instead of notifying views inline. Draining
//! runs events in insertion order; events enqueued by a handler run after
//! everything already queued, never interleaved with it.

use std::collections::VecDeque;

use profqc_model::QcFlag;

use crate::selection::SourceId;

/// Notifications emitted by [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new table replaced the previous one.
    NewData,
    /// Flags of the live table changed.
    DataUpdated,
    VisitSelected { visit_key: String },
    FilterApplied,
    ValuesSelected {
        source: SourceId,
        parameter: String,
        count: usize,
    },
    SelectionCleared,
    QcPerformed { flag: QcFlag, rows_updated: usize },
    /// The view that made the last selection should re-select these rows.
    ReselectRequested {
        source: SourceId,
        parameter: String,
        indices: Vec<usize>,
    },
    FeedbackMerged { applied: usize },
}

/// FIFO queue that ignores an event equal to one still pending.
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    pending: VecDeque<E>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<E: PartialEq> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `event` unless an equal event is already pending.
    pub fn push(&mut self, event: E) -> bool {
        if self.pending.contains(&event) {
            return false;
        }
        self.pending.push_back(event);
        true
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = E>) {
        for event in events {
            self.push(event);
        }
    }

    pub fn pop(&mut self) -> Option<E> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Delivers events until the queue is empty. The handler may queue more.
    pub fn drain_with<F>(&mut self, mut handler: F) -> usize
    where
        F: FnMut(E, &mut Self),
    {
        let mut delivered = 0;
        while let Some(event) = self.pending.pop_front() {
            handler(event, self);
            delivered += 1;
        }
        delivered
    }

    /// Removes and returns every pending event.
    pub fn take(&mut self) -> Vec<E> {
        self.pending.drain(..).collect()
    }
}
