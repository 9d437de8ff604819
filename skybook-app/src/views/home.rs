use skybook_core::SearchCriteria;
use tracing::info;

use crate::{AppState, Navigation, Outcome, Route};

/// Search form on the landing screen.
#[derive(Debug, Clone, Default)]
pub struct HomeView {
    pub form: SearchCriteria,
}

impl HomeView {
    pub fn new(form: SearchCriteria) -> Self {
        Self { form }
    }

    /// Hand the criteria to the results screen through the last-search slot.
    pub fn submit(&self, state: &AppState) -> Outcome {
        info!("Search submitted: {:?}", self.form);
        state.flights.set_search_data(self.form.clone());
        Outcome::navigate(Navigation::to(Route::Search))
    }
}
