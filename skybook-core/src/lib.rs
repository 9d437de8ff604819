pub mod identity;
pub mod repository;
pub mod search;

pub use identity::{decode_claims, Scope};
pub use repository::FlightQuery;
pub use search::{dedup, reconcile, search_flights, SearchCriteria, SearchResults, SubQuery};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Flight query failed: {0}")]
    QueryError(String),
    #[error("Token could not be decoded: {0}")]
    IdentityError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
