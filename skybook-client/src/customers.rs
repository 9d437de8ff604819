use std::sync::Arc;

use skybook_core::Scope;
use skybook_shared::{
    BookingRequest, BookingsResponse, Customer, CustomerRequest, Flight, RoleResponse, TokenResponse,
};
use skybook_store::SessionState;
use tracing::{debug, info};

use crate::{bearer, endpoint, error_for_status, read_json, ClientResult};

/// Account lifecycle against the customer API and the OAuth token endpoint.
pub struct CustomerClient {
    http: reqwest::Client,
    customers_url: String,
    token_url: String,
    session: Arc<SessionState>,
}

impl CustomerClient {
    pub fn new(
        http: reqwest::Client,
        customers_url: impl Into<String>,
        token_url: impl Into<String>,
        session: Arc<SessionState>,
    ) -> Self {
        Self {
            http,
            customers_url: customers_url.into(),
            token_url: token_url.into(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Role of `login`; this endpoint is open to anonymous callers.
    pub async fn role(&self, login: &str) -> ClientResult<String> {
        let url = endpoint(&self.customers_url, &["role", login])?;
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        let body: RoleResponse = read_json(resp).await?;
        Ok(body.role)
    }

    /// Client-credentials exchange, authenticating with the user's own login and password.
    pub async fn request_token(&self, login: &str, password: &str, scope: Scope) -> ClientResult<TokenResponse> {
        debug!("POST {} scope={}", self.token_url, scope);
        let resp = self
            .http
            .post(&self.token_url)
            .basic_auth(login, Some(password))
            .form(&[("grant_type", "client_credentials"), ("scope", scope.as_str())])
            .send()
            .await?;
        read_json(resp).await
    }

    /// Look up the role, pick the scope it is entitled to, fetch a token and
    /// store it in the session. A failed role lookup skips the token request.
    pub async fn login(&self, login: &str, password: &str) -> ClientResult<TokenResponse> {
        let role = self.role(login).await?;
        let scope = Scope::for_role(&role);
        let token = self.request_token(login, password, scope).await?;
        self.session.store_token(&token)?;
        info!("{} logged in with scope '{}'", login, token.scope);
        Ok(token)
    }

    pub async fn create_account(&self, login: &str, password: &str) -> ClientResult<Customer> {
        let url = endpoint(&self.customers_url, &[])?;
        let resp = self
            .http
            .post(url)
            .json(&CustomerRequest::new(login, password))
            .send()
            .await?;
        let created: Customer = read_json(resp).await?;
        info!("Account {} created with id {}", created.username, created.id);
        Ok(created)
    }

    pub async fn customer(&self, customer_id: i64) -> ClientResult<Customer> {
        let token = bearer(&self.session)?;
        let url = endpoint(&self.customers_url, &[customer_id.to_string().as_str()])?;
        let resp = self.http.get(url).bearer_auth(token).send().await?;
        read_json(resp).await
    }

    /// Replace the login and password of an existing account.
    pub async fn edit_account(&self, customer_id: i64, login: &str, password: &str) -> ClientResult<Customer> {
        let token = bearer(&self.session)?;
        let url = endpoint(&self.customers_url, &[customer_id.to_string().as_str()])?;
        let resp = self
            .http
            .patch(url)
            .bearer_auth(token)
            .json(&CustomerRequest::new(login, password))
            .send()
            .await?;
        let edited: Customer = read_json(resp).await?;
        info!("Account {} updated", edited.id);
        Ok(edited)
    }

    pub async fn delete_account(&self, customer_id: i64) -> ClientResult<()> {
        let token = bearer(&self.session)?;
        let url = endpoint(&self.customers_url, &[customer_id.to_string().as_str()])?;
        let resp = self.http.delete(url).bearer_auth(token).send().await?;
        error_for_status(resp).await?;
        info!("Account {} deleted", customer_id);
        Ok(())
    }

    pub async fn bookings(&self, customer_id: i64) -> ClientResult<Vec<Flight>> {
        let token = bearer(&self.session)?;
        let url = endpoint(&self.customers_url, &[customer_id.to_string().as_str(), "bookings"])?;
        let resp = self.http.get(url).bearer_auth(token).send().await?;
        let body: BookingsResponse = read_json(resp).await?;
        Ok(body.booked_flights)
    }

    pub async fn add_booking(&self, customer_id: i64, flight_id: i64) -> ClientResult<Vec<Flight>> {
        let token = bearer(&self.session)?;
        let url = endpoint(&self.customers_url, &[customer_id.to_string().as_str(), "bookings"])?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&BookingRequest { flight_id })
            .send()
            .await?;
        let body: BookingsResponse = read_json(resp).await?;
        info!("Customer {} booked flight {}", customer_id, flight_id);
        Ok(body.booked_flights)
    }

    pub async fn remove_booking(&self, customer_id: i64, flight_id: i64) -> ClientResult<()> {
        let token = bearer(&self.session)?;
        let url = endpoint(
            &self.customers_url,
            &[customer_id.to_string().as_str(), "bookings", flight_id.to_string().as_str()],
        )?;
        let resp = self.http.delete(url).bearer_auth(token).send().await?;
        error_for_status(resp).await?;
        info!("Customer {} cancelled flight {}", customer_id, flight_id);
        Ok(())
    }
}
