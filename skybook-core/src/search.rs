use std::collections::HashSet;

use chrono::NaiveDate;
use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use skybook_shared::Flight;
use tracing::debug;

use crate::repository::{FlightQuery, QueryError};
use crate::{CoreError, CoreResult};

/// What the user typed into the search form.
///
/// Blank strings count as absent. A timeframe needs both bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_location: Option<String>,
    #[serde(default)]
    pub end_location: Option<String>,
    #[serde(default)]
    pub filter_unavailable: bool,
}

impl SearchCriteria {
    pub fn start_location(&self) -> Option<&str> {
        non_blank(self.start_location.as_deref())
    }

    pub fn end_location(&self) -> Option<&str> {
        non_blank(self.end_location.as_deref())
    }

    pub fn timeframe(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start_date.zip(self.end_date)
    }

    pub fn is_empty(&self) -> bool {
        self.start_location().is_none() && self.end_location().is_none() && self.timeframe().is_none()
    }

    pub fn validate(&self) -> CoreResult<()> {
        if let Some((start, end)) = self.timeframe() {
            if start > end {
                return Err(CoreError::ValidationError(format!(
                    "start date {} is after end date {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Sub-queries this search needs, at most one of each kind.
    pub fn sub_queries(&self) -> Vec<SubQuery> {
        let mut kinds = Vec::with_capacity(3);
        if self.start_location().is_some() && self.end_location().is_none() {
            kinds.push(SubQuery::StartLocation);
        }
        if self.end_location().is_some() {
            kinds.push(SubQuery::EndLocation);
        }
        if self.timeframe().is_some() {
            kinds.push(SubQuery::Timeframe);
        }
        kinds
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubQuery {
    StartLocation,
    EndLocation,
    Timeframe,
}

/// Sub-query results gathered so far, in whatever order they completed.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    start_location: Option<Vec<Flight>>,
    end_location: Option<Vec<Flight>>,
    timeframe: Option<Vec<Flight>>,
}

impl SearchResults {
    /// Fold one completed sub-query in. Recording the same kind twice unions the rows.
    pub fn record(&mut self, kind: SubQuery, flights: Vec<Flight>) {
        let slot = match kind {
            SubQuery::StartLocation => &mut self.start_location,
            SubQuery::EndLocation => &mut self.end_location,
            SubQuery::Timeframe => &mut self.timeframe,
        };
        slot.get_or_insert_with(Vec::new).extend(flights);
    }

    pub fn reconcile(&self, criteria: &SearchCriteria) -> Vec<Flight> {
        reconcile(criteria, self)
    }
}

/// Drop repeated flights, keeping the first occurrence of each.
pub fn dedup(flights: impl IntoIterator<Item = Flight>) -> Vec<Flight> {
    let mut seen = HashSet::new();
    flights
        .into_iter()
        .filter(|flight| seen.insert(flight.clone()))
        .collect()
}

/// Combine sub-query results into the rows shown to the user.
///
/// * one location: that location's rows
/// * both locations: end-location rows departing from the start location
/// * a timeframe alone: the timeframe rows
/// * a timeframe and a location: location rows that the timeframe query also
///   returned and whose dates equal the requested bounds
pub fn reconcile(criteria: &SearchCriteria, results: &SearchResults) -> Vec<Flight> {
    let rows = |slot: &Option<Vec<Flight>>| slot.clone().unwrap_or_default();

    let by_location = match (criteria.start_location(), criteria.end_location()) {
        (Some(_), None) => Some(rows(&results.start_location)),
        (None, Some(_)) => Some(rows(&results.end_location)),
        (Some(start), Some(_)) => Some(
            rows(&results.end_location)
                .into_iter()
                .filter(|f| f.start_location == start)
                .collect(),
        ),
        (None, None) => None,
    };

    let selected = match (criteria.timeframe(), by_location) {
        (Some((start, end)), Some(located)) => {
            let in_timeframe: HashSet<&Flight> = results.timeframe.iter().flatten().collect();
            located
                .into_iter()
                .filter(|f| f.matches_timeframe(start, end) && in_timeframe.contains(f))
                .collect()
        }
        (Some(_), None) => rows(&results.timeframe),
        (None, Some(located)) => located,
        (None, None) => Vec::new(),
    };

    dedup(selected)
}

async fn run_sub_query<Q: FlightQuery + ?Sized>(
    query: &Q,
    kind: SubQuery,
    criteria: &SearchCriteria,
) -> (SubQuery, Result<Vec<Flight>, QueryError>) {
    let filter = criteria.filter_unavailable;
    let outcome = match kind {
        SubQuery::StartLocation => match criteria.start_location() {
            Some(location) => query.by_start_location(location, filter).await,
            None => Ok(Vec::new()),
        },
        SubQuery::EndLocation => match criteria.end_location() {
            Some(location) => query.by_end_location(location, filter).await,
            None => Ok(Vec::new()),
        },
        SubQuery::Timeframe => match criteria.timeframe() {
            Some((start, end)) => query.by_timeframe(start, end, filter).await,
            None => Ok(Vec::new()),
        },
    };
    (kind, outcome)
}

/// Run every sub-query the criteria call for concurrently and reconcile them.
///
/// Results are folded in as each sub-query finishes; the first failure fails
/// the whole search.
pub async fn search_flights<Q: FlightQuery + ?Sized>(
    query: &Q,
    criteria: &SearchCriteria,
) -> CoreResult<Vec<Flight>> {
    criteria.validate()?;

    let mut pending: FuturesUnordered<_> = criteria
        .sub_queries()
        .into_iter()
        .map(|kind| run_sub_query(query, kind, criteria))
        .collect();

    let mut results = SearchResults::default();
    while let Some((kind, outcome)) = pending.next().await {
        let flights = outcome.map_err(|e| CoreError::QueryError(format!("{:?} lookup: {}", kind, e)))?;
        debug!("{:?} lookup returned {} flights", kind, flights.len());
        results.record(kind, flights);
    }

    Ok(results.reconcile(criteria))
}
