//! Human-readable rendering of flight durations.

use chrono::{DateTime, Duration, Utc};

const UNITS: [(u64, &str, &str); 5] = [
    (7 * 24 * 3600, "week", "weeks"),
    (24 * 3600, "day", "days"),
    (3600, "hour", "hours"),
    (60, "minute", "minutes"),
    (1, "second", "seconds"),
];

/// Render `span` as its non-zero units, largest first: `"3 hours"`,
/// `"1 day 2 hours 30 minutes"`.
///
/// Sub-second remainders are dropped, so anything shorter than a second is
/// `"0 seconds"`. Negative spans carry a leading `-`.
pub fn humanize(span: Duration) -> String {
    let total = span.num_seconds();
    if total == 0 {
        return "0 seconds".to_string();
    }
    let sign = if total < 0 { "-" } else { "" };
    let mut rest = total.unsigned_abs();
    let mut parts = Vec::new();
    for (size, one, many) in UNITS {
        let n = rest / size;
        rest %= size;
        if n > 0 {
            parts.push(format!("{} {}", n, if n == 1 { one } else { many }));
        }
    }
    format!("{}{}", sign, parts.join(" "))
}

/// Duration of a flight leaving at `departure` and landing at `arrival`.
pub fn flight_duration(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> String {
    humanize(arrival - departure)
}
