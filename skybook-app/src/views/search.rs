use skybook_core::SearchCriteria;
use skybook_shared::Flight;
use tracing::{info, warn};

use crate::AppState;

/// Results screen for the last submitted search.
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    pub criteria: Option<SearchCriteria>,
    pub flights: Vec<Flight>,
    pub failed: bool,
}

impl SearchView {
    pub async fn load(state: &AppState) -> Self {
        let Some(criteria) = state.flights.search_data() else {
            warn!("Search screen opened without a submitted search");
            return Self { failed: true, ..Self::default() };
        };

        match state.flights.search(&criteria).await {
            Ok(flights) => {
                info!("Search matched {} flights", flights.len());
                Self { criteria: Some(criteria), flights, failed: false }
            }
            Err(e) => {
                warn!("Search failed: {}", e);
                Self { criteria: Some(criteria), flights: Vec::new(), failed: true }
            }
        }
    }
}
