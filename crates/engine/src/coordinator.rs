//! Generation tickets for candidate fetches.
//!
//! Every fetch the widget dispatches gets a ticket carrying a monotonically
//! increasing generation. Only a completion whose ticket matches the most
//! recently issued generation is applied; anything older was superseded by
//! later typing or a toggle and is dropped.

use tracing::debug;

/// Identifies one dispatched fetch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: String,
}

#[derive(Clone, Debug, Default)]
pub struct FetchCoordinator {
    latest: u64,
}

impl FetchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new fetch, superseding every earlier one.
    pub fn issue(&mut self, query: impl Into<String>) -> FetchTicket {
        self.latest += 1;
        FetchTicket {
            generation: self.latest,
            query: query.into(),
        }
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.latest
    }

    /// Decide whether a completion may be applied. Stale tickets are logged
    /// and rejected.
    pub fn accept(&self, ticket: &FetchTicket) -> bool {
        if self.is_current(ticket) {
            return true;
        }
        debug!(
            generation = ticket.generation,
            latest = self.latest,
            query = %ticket.query,
            "discarding stale candidate fetch"
        );
        false
    }
}
