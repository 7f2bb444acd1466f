use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use yew::Reducible;

use crate::api::ApiError;
use crate::model::Expense;

static REFRESH_SEQ: AtomicU64 = AtomicU64::new(0);

/// Hands out the tag for the next refresh. Tags are monotonic for the
/// lifetime of the page, so the newest issued refresh always wins.
pub fn next_refresh_seq() -> u64 {
    REFRESH_SEQ.fetch_add(1, Ordering::Relaxed) + 1
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LedgerStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

/// The authoritative local copy of the user's expenses. Its contents
/// are only ever replaced wholesale with what the server returned,
/// never patched in place, so the view is always a real server
/// snapshot (or the one before it, while a refresh is failing).
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Ledger {
    records: Vec<Expense>,
    status: LedgerStatus,
    latest_seq: u64,
    loaded_once: bool,
    error: Option<String>,
}

impl Ledger {
    /// The current snapshot, in server order.
    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub fn status(&self) -> LedgerStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LedgerStatus::Loading
    }

    /// True once any refresh has completed successfully this session.
    pub fn loaded_once(&self) -> bool {
        self.loaded_once
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Marks a refresh as issued. `seq` must come from
    /// [`next_refresh_seq`].
    pub fn begin(&mut self, seq: u64) {
        if seq > self.latest_seq {
            self.latest_seq = seq;
        }
        self.status = LedgerStatus::Loading;
        self.error = None;
    }

    /// Applies a finished refresh. A completion tagged older than the
    /// newest issued refresh is discarded, so a slow response can never
    /// overwrite newer data out of order. A failed refresh keeps the
    /// previous records untouched. Returns whether the outcome was
    /// applied.
    pub fn complete(&mut self, seq: u64, outcome: Result<Vec<Expense>, ApiError>) -> bool {
        if seq < self.latest_seq {
            return false;
        }

        match outcome {
            Ok(records) => {
                self.records = records;
                self.status = LedgerStatus::Idle;
                self.loaded_once = true;
                self.error = None;
            }
            Err(error) => {
                self.status = LedgerStatus::Error;
                self.error = Some(error.to_string());
            }
        }
        true
    }

    /// Empties the ledger on logout or a missing credential. Consumes a
    /// fresh tag so anything still in flight is discarded on arrival.
    pub fn reset(&mut self) {
        self.records.clear();
        self.status = LedgerStatus::Idle;
        self.latest_seq = next_refresh_seq();
        self.loaded_once = false;
        self.error = None;
    }
}

pub enum LedgerAction {
    Begin { seq: u64 },
    Complete { seq: u64, outcome: Result<Vec<Expense>, ApiError> },
    Reset,
}

impl Reducible for Ledger {
    type Action = LedgerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            LedgerAction::Begin { seq } => next.begin(seq),
            LedgerAction::Complete { seq, outcome } => {
                next.complete(seq, outcome);
            }
            LedgerAction::Reset => next.reset(),
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::{next_refresh_seq, Ledger, LedgerStatus};
    use crate::api::ApiError;
    use crate::model::Expense;

    fn expense(id: i64, amount: f64) -> Expense {
        Expense {
            id,
            amount,
            category: "Food".to_string(),
            description: None,
            date: "2025-09-27".to_string(),
            flag: None,
        }
    }

    #[test]
    fn successful_refresh_replaces_the_snapshot_wholesale() {
        let mut ledger = Ledger::default();

        let seq = next_refresh_seq();
        ledger.begin(seq);
        assert_eq!(ledger.status(), LedgerStatus::Loading);

        assert!(ledger.complete(seq, Ok(vec![expense(1, 250.0), expense(2, 1200.5)])));
        assert_eq!(ledger.status(), LedgerStatus::Idle);
        assert_eq!(ledger.records().len(), 2);
        assert!(ledger.loaded_once());

        let seq = next_refresh_seq();
        ledger.begin(seq);
        assert!(ledger.complete(seq, Ok(vec![expense(3, 9.99)])));
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.records()[0].id, 3);
    }

    #[test]
    fn failed_refresh_keeps_the_previous_records() {
        let mut ledger = Ledger::default();

        let seq = next_refresh_seq();
        ledger.begin(seq);
        ledger.complete(seq, Ok(vec![expense(1, 250.0)]));

        let seq = next_refresh_seq();
        ledger.begin(seq);
        let before = ledger.records().to_vec();
        ledger.complete(seq, Err(ApiError::Connection));

        assert_eq!(ledger.status(), LedgerStatus::Error);
        assert_eq!(ledger.records(), before.as_slice());
        assert_eq!(
            ledger.error(),
            Some("Could not connect to the server. Please ensure the backend is running.")
        );
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut ledger = Ledger::default();

        let old = next_refresh_seq();
        ledger.begin(old);
        let new = next_refresh_seq();
        ledger.begin(new);

        // The newer refresh resolves first.
        assert!(ledger.complete(new, Ok(vec![expense(2, 20.0)])));

        // The stale one arrives late and must not overwrite it.
        assert!(!ledger.complete(old, Ok(vec![expense(1, 10.0)])));
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.records()[0].id, 2);
        assert_eq!(ledger.status(), LedgerStatus::Idle);
    }

    #[test]
    fn stale_failure_does_not_disturb_newer_data() {
        let mut ledger = Ledger::default();

        let old = next_refresh_seq();
        ledger.begin(old);
        let new = next_refresh_seq();
        ledger.begin(new);

        ledger.complete(new, Ok(vec![expense(7, 70.0)]));
        assert!(!ledger.complete(old, Err(ApiError::Connection)));

        assert_eq!(ledger.status(), LedgerStatus::Idle);
        assert_eq!(ledger.error(), None);
        assert_eq!(ledger.records()[0].id, 7);
    }

    #[test]
    fn first_failed_fetch_reports_error_with_an_empty_ledger() {
        let mut ledger = Ledger::default();

        let seq = next_refresh_seq();
        ledger.begin(seq);
        ledger.complete(seq, Err(ApiError::Server("boom".to_string())));

        assert_eq!(ledger.status(), LedgerStatus::Error);
        assert!(ledger.records().is_empty());
        assert!(!ledger.loaded_once());
    }

    #[test]
    fn reset_empties_the_ledger_and_invalidates_in_flight_refreshes() {
        let mut ledger = Ledger::default();

        let seq = next_refresh_seq();
        ledger.begin(seq);
        ledger.complete(seq, Ok(vec![expense(1, 250.0)]));

        let in_flight = next_refresh_seq();
        ledger.begin(in_flight);
        ledger.reset();

        assert!(ledger.records().is_empty());
        assert_eq!(ledger.status(), LedgerStatus::Idle);

        // The refresh that was running at logout lands afterwards.
        assert!(!ledger.complete(in_flight, Ok(vec![expense(1, 250.0)])));
        assert!(ledger.records().is_empty());
    }
}
