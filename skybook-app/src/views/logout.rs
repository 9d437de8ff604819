use std::time::Duration;

use tracing::warn;

use super::NOT_LOGGED_IN;
use crate::{AppState, Navigation, Outcome, Route};

#[derive(Debug, Clone, Default)]
pub struct LogoutView {
    pub was_logged_in: bool,
}

impl LogoutView {
    /// Drop the session cookies and head home a second later.
    pub fn run(state: &AppState) -> (Self, Outcome) {
        let was_logged_in = state.session.check();
        if let Err(e) = state.session.clear() {
            warn!("Could not clear session cookies: {}", e);
        }

        let mut outcome = Outcome::navigate(Navigation::delayed(Route::Home, Duration::from_secs(1)));
        if !was_logged_in {
            outcome = outcome.with_notice(NOT_LOGGED_IN);
        }
        (Self { was_logged_in }, outcome)
    }
}
