//! Plain-text rendering for the terminal front end.

use chrono::{DateTime, Utc};
use skybook_shared::Flight;
use tracing::info;

use crate::Outcome;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn date(value: &DateTime<Utc>) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// One row per flight, aligned columns, with a header line.
pub fn flight_table(flights: &[Flight]) -> String {
    if flights.is_empty() {
        return "No flights found.\n".to_string();
    }

    let mut out = format!(
        "{:>6}  {:<10}  {:>9}  {:<16}  {:<16}  {:<14}  {:<14}  {}",
        "ID", "NAME", "PRICE", "DEPARTS", "ARRIVES", "FROM", "TO", "AVAILABLE"
    );
    out.push('\n');
    for f in flights {
        out.push_str(&format!(
            "{:>6}  {:<10}  {:>9.2}  {:<16}  {:<16}  {:<14}  {:<14}  {}",
            f.id,
            f.name,
            f.price,
            date(&f.start_date),
            f.end_date.as_ref().map(date).unwrap_or_else(|| "-".to_string()),
            f.start_location,
            f.end_location.as_deref().unwrap_or("-"),
            if f.is_available { "yes" } else { "no" },
        ));
        out.push('\n');
    }
    out
}

/// Print the notice and log where the view wanted to go.
pub fn outcome(outcome: &Outcome) {
    if let Some(notice) = &outcome.notice {
        println!("{}", notice);
    }
    if let Some(nav) = &outcome.navigation {
        match nav.after {
            Some(after) => info!("Next: {} after {:?}", nav.to, after),
            None => info!("Next: {}", nav.to),
        }
    }
}
