use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

use crate::{AppState, Route};

/// Navigation bar. Follows the session's logged-in flag.
pub struct HeaderView {
    pub logged_in: bool,
    pub username: Option<String>,
    updates: WatchStream<bool>,
}

impl HeaderView {
    pub fn new(state: &AppState) -> Self {
        Self {
            logged_in: state.session.check(),
            username: state.session.username(),
            updates: state.session.is_logged_in(),
        }
    }

    pub fn links(&self) -> Vec<Route> {
        if self.logged_in {
            vec![Route::Home, Route::Booking, Route::Logout]
        } else {
            vec![Route::Home, Route::Login, Route::Signup]
        }
    }

    /// Wait until the flag differs from what the header shows, then update.
    /// Returns `None` once the session is gone.
    pub async fn next_change(&mut self, state: &AppState) -> Option<bool> {
        let mut logged_in = self.updates.next().await?;
        while logged_in == self.logged_in {
            logged_in = self.updates.next().await?;
        }
        self.logged_in = logged_in;
        self.username = if logged_in { state.session.username() } else { None };
        Some(logged_in)
    }
}

pub struct FooterView;

impl FooterView {
    pub fn text() -> String {
        format!("skybook {}", env!("CARGO_PKG_VERSION"))
    }
}
