use skybook_shared::Flight;
use tracing::{info, warn};

use super::NOT_LOGGED_IN;
use crate::{AppState, Navigation, Outcome, Route};

/// The signed-in customer's bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingView {
    pub customer_id: Option<i64>,
    pub bookings: Vec<Flight>,
    pub failed: bool,
}

impl BookingView {
    /// Anonymous visitors are sent to the login screen.
    pub async fn load(state: &AppState) -> (Self, Outcome) {
        if !state.session.check() {
            let outcome = Outcome::navigate(Navigation::to(Route::Login)).with_notice(NOT_LOGGED_IN);
            return (Self::default(), outcome);
        }

        let mut view = Self {
            customer_id: state.session.user_id().and_then(|id| id.parse().ok()),
            ..Self::default()
        };
        view.refresh(state).await;
        (view, Outcome::none())
    }

    pub async fn refresh(&mut self, state: &AppState) {
        let Some(customer_id) = self.customer_id else {
            warn!("Token carries no usable customer id");
            self.failed = true;
            return;
        };

        match state.customers.bookings(customer_id).await {
            Ok(bookings) => {
                self.bookings = bookings;
                self.failed = false;
            }
            Err(e) => {
                warn!("Could not load bookings for {}: {}", customer_id, e);
                self.failed = true;
            }
        }
    }

    pub async fn book(&mut self, state: &AppState, flight_id: i64) -> bool {
        let Some(customer_id) = self.customer_id else {
            self.failed = true;
            return false;
        };

        match state.customers.add_booking(customer_id, flight_id).await {
            Ok(bookings) => {
                info!("Booked flight {}", flight_id);
                self.bookings = bookings;
                self.failed = false;
                true
            }
            Err(e) => {
                warn!("Booking flight {} failed: {}", flight_id, e);
                self.failed = true;
                false
            }
        }
    }

    pub async fn cancel(&mut self, state: &AppState, flight_id: i64) -> bool {
        let Some(customer_id) = self.customer_id else {
            self.failed = true;
            return false;
        };

        if let Err(e) = state.customers.remove_booking(customer_id, flight_id).await {
            warn!("Cancelling flight {} failed: {}", flight_id, e);
            self.failed = true;
            return false;
        }
        info!("Cancelled flight {}", flight_id);
        self.refresh(state).await;
        !self.failed
    }
}
