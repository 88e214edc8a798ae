//! Last-load-wins bookkeeping for asynchronous loads.
//!
//! Each load is issued a ticket. Only the most recently issued ticket may
//! store its result; anything that finishes later than a newer request is
//! discarded.

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Holds the latest loaded value of one kind.
#[derive(Debug)]
pub struct LoadSlot<T> {
    label: &'static str,
    generation: u64,
    value: Option<T>,
}

impl<T> LoadSlot<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            generation: 0,
            value: None,
        }
    }

    /// Issue a ticket for a new load. Older tickets become stale.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Whether `ticket` is the latest issued.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Store a finished load. Returns false and drops `value` if stale.
    pub fn complete(&mut self, ticket: LoadTicket, value: T) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                slot = self.label,
                ticket = ticket.0,
                latest = self.generation,
                "Discarding stale load"
            );
            return false;
        }
        self.value = Some(value);
        true
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Drop the value and invalidate every outstanding ticket.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.value = None;
    }
}
