// src/flows/search_box.rs

//! Search-as-you-type box.

use crate::flows::{QueryTicket, RequestSequence, Ticket};
use crate::models::Instructor;
use crate::pipeline::SearchQuery;

/// Keyword box whose every non-blank edit starts a new search.
#[derive(Debug, Default)]
pub struct SearchBox {
    text: String,
    sequence: RequestSequence,
    results: Vec<Instructor>,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn results(&self) -> &[Instructor] {
        &self.results
    }

    /// Replace the box contents.
    ///
    /// Blank input clears the results without a request and returns `None`.
    /// Anything else is sent as typed.
    pub fn input(&mut self, text: &str) -> Option<QueryTicket> {
        self.text = text.to_string();
        if text.trim().is_empty() {
            self.results.clear();
            self.sequence.invalidate();
            return None;
        }
        Some(QueryTicket {
            ticket: self.sequence.issue(),
            query: SearchQuery::new().keyword(text),
        })
    }

    /// Deliver a search response. Responses for superseded input are dropped.
    pub fn apply(&mut self, ticket: Ticket, results: Vec<Instructor>) -> bool {
        if !self.sequence.is_current(ticket) {
            log::debug!("Discarding stale search response #{}", ticket.seq());
            return false;
        }
        self.results = results;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::instructor;
    use crate::pipeline::{QueryMode, build};
    use crate::services::testing::FakeApi;
    use crate::services::{InstructorApi, RequestContext, or_empty};

    #[test]
    fn test_every_edit_issues_a_search() {
        let mut search = SearchBox::new();
        let first = search.input("현").unwrap();
        let second = search.input("현우").unwrap();
        assert!(first.ticket < second.ticket);
        assert_eq!(
            build(QueryMode::Search, &second.query).param("keyword"),
            Some("현우")
        );
    }

    #[test]
    fn test_keyword_sent_as_typed() {
        let mut search = SearchBox::new();
        let ticket = search.input(" 김 현우 ").unwrap();
        assert_eq!(search.text(), " 김 현우 ");
        assert_eq!(
            build(QueryMode::Search, &ticket.query).param("keyword"),
            Some(" 김 현우 ")
        );
    }

    #[test]
    fn test_out_of_order_responses() {
        let mut search = SearchBox::new();
        let slow = search.input("kim").unwrap();
        let fast = search.input("kims").unwrap();

        assert!(search.apply(fast.ticket, vec![instructor("new", 4.0, None, 1)]));
        assert!(!search.apply(slow.ticket, vec![instructor("old", 4.0, None, 1)]));
        assert_eq!(search.results()[0].id, "new");
    }

    #[test]
    fn test_blank_input_clears() {
        let mut search = SearchBox::new();
        let ticket = search.input("kim").unwrap();
        search.apply(ticket.ticket, vec![instructor("a", 4.0, None, 1)]);

        assert!(search.input("   ").is_none());
        assert!(search.results().is_empty());
        assert!(!search.apply(ticket.ticket, vec![instructor("late", 4.0, None, 1)]));
        assert!(search.results().is_empty());
    }

    #[tokio::test]
    async fn test_failed_search_shows_nothing() {
        let api = FakeApi::failing();
        let ctx = RequestContext::anonymous();
        let mut search = SearchBox::new();

        let ticket = search.input("lee").unwrap();
        let results = or_empty("search", api.search(&ctx, &ticket.query).await);
        assert!(search.apply(ticket.ticket, results));
        assert!(search.results().is_empty());
        assert_eq!(api.calls().len(), 1);
    }
}
