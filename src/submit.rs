/// Tracks one surface's in-flight mutation: at most one call may be
/// outstanding per surface, and the busy flag disables the triggering
/// control until the call resolves. The error belongs to the same
/// surface and never leaks into another one.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Submission {
    busy: bool,
    error: Option<String>,
}

impl Submission {
    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Claims the surface. Refuses while a prior call is unresolved.
    pub fn begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.error = None;
        true
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.busy = false;
        self.error = Some(message.into());
    }

    pub fn done(&mut self) {
        self.busy = false;
        self.error = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::Submission;

    #[test]
    fn begin_gates_resubmission_until_resolved() {
        let mut submission = Submission::default();

        assert!(submission.begin());
        assert!(submission.busy());
        assert!(!submission.begin());

        submission.done();
        assert!(!submission.busy());
        assert!(submission.begin());
    }

    #[test]
    fn failure_clears_busy_and_keeps_the_message() {
        let mut submission = Submission::default();
        submission.begin();
        submission.fail("Expense not found");

        assert!(!submission.busy());
        assert_eq!(submission.error(), Some("Expense not found"));

        // The next attempt starts clean.
        assert!(submission.begin());
        assert_eq!(submission.error(), None);
    }

    #[test]
    fn validation_failure_without_begin_is_allowed() {
        let mut submission = Submission::default();
        submission.fail("Please pick a date.");

        assert!(!submission.busy());
        assert_eq!(submission.error(), Some("Please pick a date."));

        submission.clear_error();
        assert_eq!(submission.error(), None);
    }
}
