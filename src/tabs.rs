#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tab {
    Overview,
    Expenses,
    Receipt,
    Analysis,
    Chat,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Expenses,
        Tab::Receipt,
        Tab::Analysis,
        Tab::Chat,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Expenses => "All Expenses",
            Tab::Receipt => "Receipt Scanner",
            Tab::Analysis => "AI Analysis",
            Tab::Chat => "AI Chat",
        }
    }
}

/// Which feature view is showing and whether the add-expense modal is
/// open. Pure state, no I/O.
#[derive(Clone, PartialEq, Debug)]
pub struct TabState {
    active: Tab,
    add_open: bool,
}

impl Default for TabState {
    fn default() -> Self {
        Self {
            active: Tab::Overview,
            add_open: false,
        }
    }
}

impl TabState {
    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn add_open(&self) -> bool {
        self.add_open
    }

    /// Switching is always permitted, even mid-operation elsewhere.
    pub fn select(&mut self, tab: Tab) {
        self.active = tab;
    }

    pub fn open_add(&mut self) {
        self.add_open = true;
    }

    pub fn close_add(&mut self) {
        self.add_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{Tab, TabState};

    #[test]
    fn starts_on_the_overview_with_the_modal_closed() {
        let state = TabState::default();
        assert_eq!(state.active(), Tab::Overview);
        assert!(!state.add_open());
    }

    #[test]
    fn selection_is_unconditional() {
        let mut state = TabState::default();

        state.open_add();
        state.select(Tab::Chat);
        assert_eq!(state.active(), Tab::Chat);

        state.select(Tab::Chat);
        assert_eq!(state.active(), Tab::Chat);
    }

    #[test]
    fn modal_toggles_independently_of_the_active_tab() {
        let mut state = TabState::default();

        state.select(Tab::Expenses);
        state.open_add();
        assert!(state.add_open());
        assert_eq!(state.active(), Tab::Expenses);

        state.close_add();
        assert!(!state.add_open());
    }
}
