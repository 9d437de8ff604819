use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A flight as returned by the backend.
///
/// Two flights are the same flight only if every field matches, which is what
/// search reconciliation de-duplicates on. `price` is compared bitwise so that
/// `Eq` and `Hash` stay lawful.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(with = "wire_date")]
    pub start_date: DateTime<Utc>,
    #[serde(default, with = "wire_date::option")]
    pub end_date: Option<DateTime<Utc>>,
    pub start_location: String,
    #[serde(default)]
    pub end_location: Option<String>,
    // Entities serialize the flag as `available`, response records as `isAvailable`.
    #[serde(rename = "isAvailable", alias = "available", default)]
    pub is_available: bool,
}

impl Flight {
    /// True when the flight departs on `start` and returns on `end`.
    pub fn matches_timeframe(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date.date_naive() == start
            && self.end_date.map(|d| d.date_naive()) == Some(end)
    }

    fn key(&self) -> (i64, &str, u64, DateTime<Utc>, Option<DateTime<Utc>>, &str, Option<&str>, bool) {
        (
            self.id,
            &self.name,
            self.price.to_bits(),
            self.start_date,
            self.end_date,
            &self.start_location,
            self.end_location.as_deref(),
            self.is_available,
        )
    }
}

impl PartialEq for Flight {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Flight {}

impl Hash for Flight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Payload for creating a flight (admin only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRequest {
    pub name: String,
    pub price: f64,
    #[serde(with = "wire_date")]
    pub start_date: DateTime<Utc>,
    #[serde(default, with = "wire_date::option")]
    pub end_date: Option<DateTime<Utc>>,
    pub start_location: String,
    #[serde(default)]
    pub end_location: Option<String>,
    #[serde(rename = "isAvailable", default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Timestamps go out as epoch milliseconds and come back as milliseconds,
/// RFC 3339 or a bare `YYYY-MM-DD`.
pub mod wire_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    fn from_raw<E: de::Error>(raw: Raw) -> Result<DateTime<Utc>, E> {
        match raw {
            Raw::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| E::custom(format!("timestamp out of range: {}", ms))),
            Raw::Text(s) => parse(&s).ok_or_else(|| E::custom(format!("unrecognised date: {}", s))),
        }
    }

    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        from_raw(Raw::deserialize(deserializer)?)
    }

    pub mod option {
        use super::{from_raw, Raw};
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.timestamp_millis()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<Raw>::deserialize(deserializer)?
                .map(from_raw)
                .transpose()
        }
    }
}
