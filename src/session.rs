use crate::api::ApiError;

const TOKEN_KEY: &str = "brokemate_token";

/// The logged-in user's bearer token. Absent means logged out, and
/// every expense operation short-circuits without it.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn log_in(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn log_out(&mut self) {
        self.token = None;
    }

    /// Drops the credential when the server reports it invalid, no
    /// matter which pipeline hit the failure. Returns whether the
    /// session was torn down.
    pub fn absorb_failure(&mut self, error: &ApiError) -> bool {
        if error.is_auth_failure() {
            self.token = None;
            true
        } else {
            false
        }
    }
}

pub fn stored_token() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(TOKEN_KEY).ok()?
}

pub fn persist_token(token: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }
}

pub fn forget_token() {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::api::ApiError;

    #[test]
    fn starts_logged_out_by_default() {
        let session = Session::default();
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn login_and_logout_manage_the_token() {
        let mut session = Session::default();
        session.log_in("abc123".to_string());
        assert_eq!(session.token(), Some("abc123"));

        session.log_out();
        assert!(!session.is_logged_in());
    }

    #[test]
    fn credential_rejection_tears_down_the_session() {
        let mut session = Session::new(Some("expired".to_string()));
        let rejected = ApiError::Server("Could not validate credentials".to_string());

        assert!(session.absorb_failure(&rejected));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn other_failures_leave_the_session_alone() {
        let mut session = Session::new(Some("valid".to_string()));

        assert!(!session.absorb_failure(&ApiError::Connection));
        assert!(!session.absorb_failure(&ApiError::Server("Expense not found".to_string())));
        assert_eq!(session.token(), Some("valid"));
    }
}
