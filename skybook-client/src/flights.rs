use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use skybook_core::repository::QueryError;
use skybook_core::{search_flights, CoreResult, FlightQuery, SearchCriteria};
use skybook_shared::{Flight, FlightRequest};
use skybook_store::SessionState;
use tracing::{debug, info};

use crate::{bearer, endpoint, error_for_status, read_json, ClientResult};

/// Flight catalogue lookups plus the "last submitted search" slot that
/// carries criteria from the home screen to the results screen.
pub struct FlightClient {
    http: reqwest::Client,
    flights_url: String,
    session: Arc<SessionState>,
    last_search: RwLock<Option<SearchCriteria>>,
}

impl FlightClient {
    pub fn new(http: reqwest::Client, flights_url: impl Into<String>, session: Arc<SessionState>) -> Self {
        Self {
            http,
            flights_url: flights_url.into(),
            session,
            last_search: RwLock::new(None),
        }
    }

    pub async fn by_start_location(
        &self,
        start_location: Option<&str>,
        filter_unavailable: bool,
    ) -> ClientResult<Vec<Flight>> {
        match present(start_location) {
            Some(location) => self.fetch(&[("startLocation", location.to_string())], filter_unavailable).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn by_end_location(
        &self,
        end_location: Option<&str>,
        filter_unavailable: bool,
    ) -> ClientResult<Vec<Flight>> {
        match present(end_location) {
            Some(location) => self.fetch(&[("endLocation", location.to_string())], filter_unavailable).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn by_timeframe(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        filter_unavailable: bool,
    ) -> ClientResult<Vec<Flight>> {
        match start_date.zip(end_date) {
            Some((start, end)) => {
                let params = [
                    ("startDate", start.format("%Y-%m-%d").to_string()),
                    ("endDate", end.format("%Y-%m-%d").to_string()),
                ];
                self.fetch(&params, filter_unavailable).await
            }
            None => Ok(Vec::new()),
        }
    }

    /// Reconciled search over every lookup the criteria call for.
    pub async fn search(&self, criteria: &SearchCriteria) -> CoreResult<Vec<Flight>> {
        search_flights(self, criteria).await
    }

    pub fn set_search_data(&self, criteria: SearchCriteria) {
        let mut slot = self.last_search.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(criteria);
    }

    pub fn search_data(&self) -> Option<SearchCriteria> {
        self.last_search
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Admin only: the backend requires the `user.write` scope.
    pub async fn create_flight(&self, flight: &FlightRequest) -> ClientResult<Flight> {
        let token = bearer(&self.session)?;
        let resp = self
            .http
            .post(endpoint(&self.flights_url, &[])?)
            .bearer_auth(token)
            .json(flight)
            .send()
            .await?;
        let created: Flight = read_json(resp).await?;
        info!("Flight {} created", created.id);
        Ok(created)
    }

    /// Admin only: the backend requires the `user.write` scope.
    pub async fn delete_flight(&self, flight_id: i64) -> ClientResult<()> {
        let token = bearer(&self.session)?;
        let resp = self
            .http
            .delete(endpoint(&self.flights_url, &[flight_id.to_string().as_str()])?)
            .bearer_auth(token)
            .send()
            .await?;
        error_for_status(resp).await?;
        info!("Flight {} deleted", flight_id);
        Ok(())
    }

    async fn fetch(&self, params: &[(&str, String)], filter_unavailable: bool) -> ClientResult<Vec<Flight>> {
        let url = endpoint(&self.flights_url, &[])?;
        debug!("GET {} {:?}", url, params);

        let mut request = self
            .http
            .get(url)
            .query(params)
            .query(&[("filterUnavailable", filter_unavailable)]);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        // The catalogue answers 404 when nothing matched.
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        read_json(resp).await
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[async_trait]
impl FlightQuery for FlightClient {
    async fn by_start_location(&self, start_location: &str, filter_unavailable: bool) -> Result<Vec<Flight>, QueryError> {
        Ok(FlightClient::by_start_location(self, Some(start_location), filter_unavailable).await?)
    }

    async fn by_end_location(&self, end_location: &str, filter_unavailable: bool) -> Result<Vec<Flight>, QueryError> {
        Ok(FlightClient::by_end_location(self, Some(end_location), filter_unavailable).await?)
    }

    async fn by_timeframe(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        filter_unavailable: bool,
    ) -> Result<Vec<Flight>, QueryError> {
        Ok(FlightClient::by_timeframe(self, Some(start_date), Some(end_date), filter_unavailable).await?)
    }
}
