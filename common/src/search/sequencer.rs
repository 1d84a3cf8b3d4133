//! Sequence numbers for debounced searches.
//!
//! Every keystroke arms a new [`SearchTicket`]. Only the ticket armed last is
//! current: a debounce timer holding an older ticket must not start, and a
//! response carrying an older ticket must not be rendered. Fetches are never
//! cancelled, their results are just recognized as stale.

/// Delay between the last keystroke and the search.
pub const DEBOUNCE_TIMEOUT_MS: u32 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: u64,
    in_flight: Option<u64>,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the ticket for `query`, making every earlier one stale.
    pub fn arm(&mut self, query: impl Into<String>) -> SearchTicket {
        self.latest += 1;
        SearchTicket {
            seq: self.latest,
            query: query.into(),
        }
    }

    /// Makes every issued ticket stale and drops the loading state.
    pub fn cancel(&mut self) {
        self.latest += 1;
        self.in_flight = None;
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.seq == self.latest
    }

    /// Marks the search of `ticket` as running. Returns `false` for a stale
    /// ticket, which must not be searched.
    pub fn start(&mut self, ticket: &SearchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = Some(ticket.seq);
        true
    }

    /// Records the end of the search of `ticket`, clearing the loading state
    /// it set. Returns whether its results may be rendered.
    pub fn finish(&mut self, ticket: &SearchTicket) -> bool {
        if self.in_flight == Some(ticket.seq) {
            self.in_flight = None;
        }
        self.is_current(ticket)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[test]
    fn test_only_latest_ticket_is_current() {
        let mut sequencer = SearchSequencer::new();
        let first = sequencer.arm("b");
        let second = sequencer.arm("bl");
        assert!(!sequencer.is_current(&first));
        assert!(sequencer.is_current(&second));
        assert!(!sequencer.start(&first));
        assert!(!sequencer.is_loading());
    }

    #[test]
    fn test_stale_response_is_rejected_and_loading_kept() {
        let mut sequencer = SearchSequencer::new();
        let a = sequencer.arm("a");
        assert!(sequencer.start(&a));

        let b = sequencer.arm("ab");
        assert!(sequencer.start(&b));

        // A resolves after B started.
        assert!(!sequencer.finish(&a));
        assert!(sequencer.is_loading());
        assert!(sequencer.finish(&b));
        assert!(!sequencer.is_loading());
    }

    #[test]
    fn test_loading_cleared_even_when_search_became_stale() {
        let mut sequencer = SearchSequencer::new();
        let a = sequencer.arm("a");
        sequencer.start(&a);
        sequencer.arm("ab");
        assert!(!sequencer.finish(&a));
        assert!(!sequencer.is_loading());
    }

    #[test]
    fn test_cancel_invalidates_everything() {
        let mut sequencer = SearchSequencer::new();
        let ticket = sequencer.arm("a");
        sequencer.start(&ticket);
        sequencer.cancel();
        assert!(!sequencer.is_loading());
        assert!(!sequencer.finish(&ticket));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_typing_runs_one_search_with_last_value() {
        let sequencer = Rc::new(RefCell::new(SearchSequencer::new()));
        let searched = Rc::new(RefCell::new(Vec::new()));
        let local = tokio::task::LocalSet::new();

        local
            .run_until(async {
                let mut timers = Vec::new();
                for typed in ["b", "bl", "bli", "blin"] {
                    let ticket = sequencer.borrow_mut().arm(typed);
                    let sequencer = sequencer.clone();
                    let searched = searched.clone();
                    timers.push(tokio::task::spawn_local(async move {
                        tokio::time::sleep(Duration::from_millis(DEBOUNCE_TIMEOUT_MS.into())).await;
                        if sequencer.borrow_mut().start(&ticket) {
                            searched.borrow_mut().push(ticket.query.clone());
                        }
                    }));
                    tokio::time::sleep(Duration::from_millis(80)).await;
                }
                for timer in timers {
                    timer.await.unwrap();
                }
            })
            .await;

        assert_eq!(*searched.borrow(), vec!["blin".to_string()]);
    }
}
