use std::sync::Arc;
use std::time::Duration;

use skybook_client::{http_client, ClientResult, CustomerClient, FlightClient};
use skybook_store::app_config::Config;
use skybook_store::{CookieStore, FileCookieStore, SessionState};

/// Everything a view needs, cheap to clone and hand around.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionState>,
    pub flights: Arc<FlightClient>,
    pub customers: Arc<CustomerClient>,
}

impl AppState {
    pub fn new(session: Arc<SessionState>, flights: FlightClient, customers: CustomerClient) -> Self {
        Self {
            session,
            flights: Arc::new(flights),
            customers: Arc::new(customers),
        }
    }

    /// Wire clients for `config`, keeping cookies in the configured file.
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let cookies = Arc::new(FileCookieStore::new(&config.session.cookie_file));
        Self::with_cookies(config, cookies)
    }

    pub fn with_cookies(config: &Config, cookies: Arc<dyn CookieStore>) -> ClientResult<Self> {
        let http = http_client(Duration::from_secs(config.http.timeout_seconds))?;
        let session = Arc::new(SessionState::new(cookies));

        let flights = FlightClient::new(http.clone(), config.api.flights_url(), session.clone());
        let customers = CustomerClient::new(
            http,
            config.api.customers_url(),
            config.oauth.token_url.clone(),
            session.clone(),
        );
        Ok(Self::new(session, flights, customers))
    }
}
