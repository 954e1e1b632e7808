// src/flows/sequence.rs

//! Monotonic request sequencing.
//!
//! Every query a flow starts is stamped with a [`Ticket`]. Only the most
//! recently issued ticket may update displayed state; responses carrying an
//! older ticket are dropped when they arrive.

use crate::pipeline::SearchQuery;

/// Sequence number of one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Issues tickets and tracks which one is current.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: u64,
    live: bool,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        self.live = true;
        Ticket(self.latest)
    }

    /// Supersede every outstanding ticket without issuing a new one.
    pub fn invalidate(&mut self) {
        self.live = false;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.live && ticket.0 == self.latest
    }
}

/// A query paired with the ticket its response must present.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTicket {
    pub ticket: Ticket,
    pub query: SearchQuery,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_ticket_wins() {
        let mut seq = RequestSequence::new();
        let first = seq.issue();
        let second = seq.issue();
        assert!(first < second);
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn test_invalidate_drops_outstanding() {
        let mut seq = RequestSequence::new();
        let ticket = seq.issue();
        seq.invalidate();
        assert!(!seq.is_current(ticket));

        let next = seq.issue();
        assert!(seq.is_current(next));
        assert!(!seq.is_current(ticket));
    }
}
