use async_trait::async_trait;
use chrono::NaiveDate;
use skybook_shared::Flight;

pub type QueryError = Box<dyn std::error::Error + Send + Sync>;

/// Read side of the flight catalogue, one method per backend lookup.
///
/// Implementations return an empty list, without doing any I/O, when the
/// lookup key is blank.
#[async_trait]
pub trait FlightQuery: Send + Sync {
    async fn by_start_location(
        &self,
        start_location: &str,
        filter_unavailable: bool,
    ) -> Result<Vec<Flight>, QueryError>;

    async fn by_end_location(
        &self,
        end_location: &str,
        filter_unavailable: bool,
    ) -> Result<Vec<Flight>, QueryError>;

    async fn by_timeframe(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        filter_unavailable: bool,
    ) -> Result<Vec<Flight>, QueryError>;
}
