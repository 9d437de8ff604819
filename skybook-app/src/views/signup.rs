use std::time::Duration;

use tracing::warn;

use super::{Credentials, ACCOUNT_CREATED};
use crate::{AppState, Navigation, Outcome, Route};

#[derive(Debug, Clone, Default)]
pub struct SignupView {
    pub form: Credentials,
    pub error: bool,
}

impl SignupView {
    pub fn new(form: Credentials) -> Self {
        Self { form, error: false }
    }

    pub async fn submit(&mut self, state: &AppState) -> Outcome {
        if self.form.is_blank() {
            self.error = true;
            return Outcome::none();
        }

        match state
            .customers
            .create_account(&self.form.login, self.form.password.expose())
            .await
        {
            Ok(_) => {
                self.error = false;
                Outcome::navigate(Navigation::delayed(Route::Home, Duration::from_secs(1)))
                    .with_notice(ACCOUNT_CREATED)
            }
            Err(e) => {
                warn!("Signup failed for {}: {}", self.form.login, e);
                self.error = true;
                self.form.reset();
                Outcome::none()
            }
        }
    }
}
