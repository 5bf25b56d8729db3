//! Flight record model for flightdeck.
//!
//! This module defines the `Flight` struct as it arrives from the data
//! store, together with the derived predicates the statistics engine
//! builds on: passenger totals, route keys, delay and on-time status.

use serde::{Deserialize, Deserializer, Serialize};

/// A single flight record.
///
/// Records are externally sourced and read-only to the statistics core.
/// Deserialization is deliberately tolerant: passenger counts accept
/// numbers, numeric strings, or null, and anything unusable coerces to 0.
/// Dates are ISO `YYYY-MM-DD` strings and departure times are zero-padded
/// 24-hour `HH:MM` strings, so lexicographic order equals chronological
/// order and the engine never needs to parse them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Unique identifier for this record (assigned by the storage layer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Calendar date of the flight, ISO `YYYY-MM-DD`.
    pub flight_date: String,

    /// Flight number, e.g. `FD204`.
    #[serde(default)]
    pub flight_no: String,

    /// Aircraft registration or type label.
    #[serde(default)]
    pub aircraft: String,

    /// Seat capacity of the aircraft.
    #[serde(default, deserialize_with = "lenient_count")]
    pub capacity: u32,

    /// Departure airport code.
    #[serde(default)]
    pub departure: String,

    /// Arrival airport code.
    #[serde(default)]
    pub arrival: String,

    /// Explicit route label. When absent or blank, the route key is
    /// derived from the departure and arrival codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    /// Scheduled time of departure, `HH:MM` or empty.
    #[serde(default)]
    pub std: String,

    /// Actual time of departure, `HH:MM` or empty.
    #[serde(default)]
    pub atd: String,

    /// Free-text remark. Non-blank means the flight was delayed.
    #[serde(default)]
    pub remark: String,

    /// Free-text delay reason. Non-blank means the flight was delayed.
    #[serde(default)]
    pub delay_reason: String,

    /// Schedule status label, e.g. `Departed` or `Cancelled`.
    #[serde(default)]
    pub schedule_status: String,

    /// Premium-cabin passenger count.
    #[serde(default, deserialize_with = "lenient_count")]
    pub premium: u32,

    /// Economy-cabin passenger count.
    #[serde(default, deserialize_with = "lenient_count")]
    pub economy: u32,

    /// Infant passenger count.
    #[serde(default, deserialize_with = "lenient_count")]
    pub infant: u32,
}

impl Flight {
    /// Total passengers on this flight across all cabins.
    #[must_use]
    pub fn pax(&self) -> u64 {
        u64::from(self.premium) + u64::from(self.economy) + u64::from(self.infant)
    }

    /// The route key used for grouping delay counts.
    ///
    /// The explicit `route` label wins when it is non-blank; otherwise
    /// the key is `departure + "-" + arrival`.
    #[must_use]
    pub fn route_key(&self) -> String {
        match &self.route {
            Some(route) if !route.trim().is_empty() => route.clone(),
            _ => format!("{}-{}", self.departure, self.arrival),
        }
    }

    /// The delay reason after trimming, or `None` when blank.
    #[must_use]
    pub fn trimmed_delay_reason(&self) -> Option<&str> {
        let reason = self.delay_reason.trim();
        if reason.is_empty() {
            None
        } else {
            Some(reason)
        }
    }

    /// Whether this flight counts as delayed.
    ///
    /// A flight is delayed when its remark or its delay reason is
    /// non-blank after trimming.
    #[must_use]
    pub fn is_delayed(&self) -> bool {
        !self.remark.trim().is_empty() || !self.delay_reason.trim().is_empty()
    }

    /// Whether this flight counts as on time.
    ///
    /// Requires both the scheduled and actual departure times to be
    /// present, with the actual time not exceeding the scheduled time.
    /// `HH:MM` strings compare lexicographically, which matches
    /// chronological order within a day.
    #[must_use]
    pub fn is_on_time(&self) -> bool {
        !self.std.is_empty() && !self.atd.is_empty() && self.atd <= self.std
    }
}

/// Raw representation of a count field as it may appear in source data.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawCount {
    /// Coerce to a non-negative integer; anything unusable becomes 0.
    fn coerce(self) -> u32 {
        match self {
            Self::Int(n) => u32::try_from(n).unwrap_or(0),
            Self::Float(x) => coerce_float(x),
            Self::Text(s) => s.trim().parse::<f64>().map_or(0, coerce_float),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_float(x: f64) -> u32 {
    if x.is_finite() && x >= 0.0 {
        // Saturates at u32::MAX for out-of-range values.
        x as u32
    } else {
        0
    }
}

/// Deserialize a passenger or capacity count, coercing missing, null,
/// negative, or non-numeric values to 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCount>::deserialize(deserializer)?;
    Ok(raw.map_or(0, RawCount::coerce))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_flight() -> Flight {
        Flight {
            id: None,
            flight_date: "2024-01-01".to_string(),
            flight_no: "FD100".to_string(),
            aircraft: "A320".to_string(),
            capacity: 180,
            departure: "AAA".to_string(),
            arrival: "BBB".to_string(),
            route: None,
            std: String::new(),
            atd: String::new(),
            remark: String::new(),
            delay_reason: String::new(),
            schedule_status: String::new(),
            premium: 0,
            economy: 0,
            infant: 0,
        }
    }

    #[test]
    fn test_pax_sums_all_cabins() {
        let mut flight = base_flight();
        flight.premium = 2;
        flight.economy = 150;
        flight.infant = 3;
        assert_eq!(flight.pax(), 155);
    }

    #[test]
    fn test_pax_zero_by_default() {
        assert_eq!(base_flight().pax(), 0);
    }

    #[test]
    fn test_route_key_explicit_route_wins() {
        let mut flight = base_flight();
        flight.route = Some("AAA-CCC via BBB".to_string());
        assert_eq!(flight.route_key(), "AAA-CCC via BBB");
    }

    #[test]
    fn test_route_key_derived_when_absent() {
        assert_eq!(base_flight().route_key(), "AAA-BBB");
    }

    #[test]
    fn test_route_key_derived_when_blank() {
        let mut flight = base_flight();
        flight.route = Some("   ".to_string());
        assert_eq!(flight.route_key(), "AAA-BBB");
    }

    #[test]
    fn test_is_delayed_by_remark() {
        let mut flight = base_flight();
        flight.remark = "late inbound".to_string();
        assert!(flight.is_delayed());
    }

    #[test]
    fn test_is_delayed_by_reason() {
        let mut flight = base_flight();
        flight.delay_reason = "Weather".to_string();
        assert!(flight.is_delayed());
    }

    #[test]
    fn test_whitespace_only_is_not_delayed() {
        let mut flight = base_flight();
        flight.remark = "  ".to_string();
        flight.delay_reason = "\t".to_string();
        assert!(!flight.is_delayed());
    }

    #[test]
    fn test_trimmed_delay_reason() {
        let mut flight = base_flight();
        assert_eq!(flight.trimmed_delay_reason(), None);

        flight.delay_reason = "  Crew  ".to_string();
        assert_eq!(flight.trimmed_delay_reason(), Some("Crew"));
    }

    #[test]
    fn test_is_on_time_requires_both_times() {
        let mut flight = base_flight();
        assert!(!flight.is_on_time());

        flight.std = "10:00".to_string();
        assert!(!flight.is_on_time());

        flight.atd = "09:55".to_string();
        assert!(flight.is_on_time());
    }

    #[test]
    fn test_is_on_time_boundary() {
        let mut flight = base_flight();
        flight.std = "10:00".to_string();
        flight.atd = "10:00".to_string();
        assert!(flight.is_on_time());

        flight.atd = "10:01".to_string();
        assert!(!flight.is_on_time());
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let flight: Flight = serde_json::from_str(r#"{"flight_date":"2024-05-01"}"#).unwrap();
        assert_eq!(flight.flight_date, "2024-05-01");
        assert_eq!(flight.premium, 0);
        assert_eq!(flight.economy, 0);
        assert_eq!(flight.infant, 0);
        assert!(flight.route.is_none());
    }

    #[test]
    fn test_deserialize_coerces_null_pax() {
        let flight: Flight =
            serde_json::from_str(r#"{"flight_date":"2024-05-01","economy":null}"#).unwrap();
        assert_eq!(flight.economy, 0);
    }

    #[test]
    fn test_deserialize_coerces_string_pax() {
        let flight: Flight =
            serde_json::from_str(r#"{"flight_date":"2024-05-01","economy":"120"}"#).unwrap();
        assert_eq!(flight.economy, 120);
    }

    #[test]
    fn test_deserialize_coerces_garbage_pax() {
        let flight: Flight =
            serde_json::from_str(r#"{"flight_date":"2024-05-01","economy":"n/a"}"#).unwrap();
        assert_eq!(flight.economy, 0);
    }

    #[test]
    fn test_deserialize_coerces_negative_pax() {
        let flight: Flight =
            serde_json::from_str(r#"{"flight_date":"2024-05-01","premium":-3}"#).unwrap();
        assert_eq!(flight.premium, 0);
    }

    #[test]
    fn test_deserialize_coerces_float_pax() {
        let flight: Flight =
            serde_json::from_str(r#"{"flight_date":"2024-05-01","infant":2.0}"#).unwrap();
        assert_eq!(flight.infant, 2);
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut flight = base_flight();
        flight.route = Some("AAA-BBB".to_string());
        flight.economy = 42;

        let json = serde_json::to_string(&flight).unwrap();
        let back: Flight = serde_json::from_str(&json).unwrap();
        assert_eq!(flight, back);
    }

    #[test]
    fn test_serialize_skips_absent_id_and_route() {
        let json = serde_json::to_string(&base_flight()).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(!json.contains("\"route\""));
    }
}
