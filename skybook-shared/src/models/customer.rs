use serde::{Deserialize, Serialize};

use super::flight::Flight;
use crate::pii::Masked;

/// Role name the backend grants elevated scopes to.
pub const ADMIN_ROLE: &str = "ADMIN";

/// Customer record as the backend returns it.
///
/// The password is write-only on the client side; it is held masked so a
/// stray `{:?}` never prints it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<Masked<String>>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub booked_flights: Vec<Flight>,
}

impl Customer {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Signup body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRequest {
    pub username: String,
    pub password: Masked<String>,
}

impl CustomerRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Masked(password.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResponse {
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    #[serde(default)]
    pub booked_flights: Vec<Flight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub flight_id: i64,
}
