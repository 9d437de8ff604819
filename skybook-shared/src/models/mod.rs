pub mod auth;
pub mod customer;
pub mod flight;

pub use auth::{SessionClaims, TokenResponse};
pub use customer::{BookingRequest, BookingsResponse, Customer, CustomerRequest, RoleResponse, ADMIN_ROLE};
pub use flight::{Flight, FlightRequest};
