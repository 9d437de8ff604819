//! HTTP clients for the flight-booking backend.
//!
//! [`FlightClient`] talks to the flight catalogue, [`CustomerClient`] to the
//! customer API and the OAuth token endpoint. Both read the bearer token from
//! a shared [`SessionState`].

use std::time::Duration;

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use skybook_store::SessionState;
use tracing::warn;

pub mod customers;
pub mod error;
pub mod flights;

pub use customers::CustomerClient;
pub use error::{ClientError, ClientResult};
pub use flights::FlightClient;

pub fn http_client(timeout: Duration) -> ClientResult<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("skybook/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// `base` with each segment appended and percent-encoded.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> ClientResult<Url> {
    let mut url = Url::parse(base).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(format!("{} cannot take a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) fn bearer(session: &SessionState) -> ClientResult<String> {
    session.token().ok_or(ClientError::Unauthorized)
}

pub(crate) async fn error_for_status(resp: Response) -> ClientResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().clone();
    let message = resp.text().await.unwrap_or_default();
    warn!("{} answered {}: {}", url, status, message);
    Err(ClientError::Http { status, message })
}

pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
    Ok(error_for_status(resp).await?.json().await?)
}
