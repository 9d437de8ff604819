use tracing::{info, warn};

use super::{Credentials, ALREADY_LOGGED_IN};
use crate::{AppState, Navigation, Outcome, Route};

#[derive(Debug, Clone, Default)]
pub struct LoginView {
    pub form: Credentials,
    pub error: bool,
}

impl LoginView {
    pub fn new(form: Credentials) -> Self {
        Self { form, error: false }
    }

    /// Someone already holding a token is sent back home.
    pub fn init(&self, state: &AppState) -> Outcome {
        if state.session.check() {
            return Outcome::navigate(Navigation::to(Route::Home)).with_notice(ALREADY_LOGGED_IN);
        }
        Outcome::none()
    }

    pub async fn submit(&mut self, state: &AppState) -> Outcome {
        let login = self.form.login.clone();
        match state.customers.login(&login, self.form.password.expose()).await {
            Ok(_) => {
                self.error = false;
                info!("Logged in as {}", login);
                Outcome::navigate(Navigation::to(Route::Home))
            }
            Err(e) => {
                warn!("Login failed for {}: {}", login, e);
                self.error = true;
                self.form.reset();
                Outcome::none()
            }
        }
    }
}
