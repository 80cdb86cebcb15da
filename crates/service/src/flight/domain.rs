use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{self, FieldViolation, ValidationFailure};

/// Stored flight record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub id: String,
    pub name: String,
    pub number: String,
    pub departure: String,
    pub departure_time: DateTime<Utc>,
    pub destination: String,
    pub arrival_time: DateTime<Utc>,
    pub fare: String,
    /// Derived from `arrival_time - departure_time`.
    pub duration: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for create and update. Any `duration` sent by a
/// client is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FlightInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 20))]
    pub number: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub departure: String,
    #[serde(default)]
    #[validate(required)]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub destination: String,
    #[serde(default)]
    #[validate(required)]
    pub arrival_time: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(min = 1, max = 20))]
    pub fare: String,
}

impl FlightInput {
    /// Run every rule and return the `(departure, arrival)` pair on success.
    ///
    /// Besides the declared field rules, an arrival earlier than the
    /// departure is a violation on `arrival_time`.
    pub fn check(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationFailure> {
        let mut violations = validation::collect(self);
        let schedule = match (self.departure_time, self.arrival_time) {
            (Some(dep), Some(arr)) => {
                if arr < dep {
                    violations.push(FieldViolation::new(
                        "arrival_time",
                        "before_departure",
                        "must not be earlier than departure_time",
                    ));
                }
                Some((dep, arr))
            }
            _ => None,
        };
        validation::into_result(violations)?;
        // both times are `required`, so a missing one was reported above
        schedule.ok_or_else(|| {
            ValidationFailure::new(vec![FieldViolation::new("departure_time", "required", "cannot be blank")])
        })
    }
}

/// Predicates for narrowing a flight query; all present ones must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub name: Option<String>,
    pub departure: Option<String>,
    pub destination: Option<String>,
    /// Matches departures within the 24 hours starting at this date, UTC.
    pub departure_date: Option<NaiveDate>,
}

impl SearchFilter {
    /// Drop blank string predicates so they do not constrain the query.
    pub fn normalized(self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        Self {
            name: keep(self.name),
            departure: keep(self.departure),
            destination: keep(self.destination),
            departure_date: self.departure_date,
        }
    }

    /// Half-open `[start, end)` window for the departure date.
    pub fn departure_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.departure_date.map(|d| {
            let start = Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN));
            (start, start + Duration::days(1))
        })
    }

    pub fn matches(&self, f: &Flight) -> bool {
        fn eq(want: &Option<String>, have: &str) -> bool {
            want.as_deref().map_or(true, |w| w == have)
        }
        let in_window = self
            .departure_window()
            .map_or(true, |(start, end)| f.departure_time >= start && f.departure_time < end);
        eq(&self.name, &f.name) && eq(&self.departure, &f.departure) && eq(&self.destination, &f.destination) && in_window
    }
}
