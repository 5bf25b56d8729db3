//! Flight-statistics aggregation engine.
//!
//! This module converts a collection of flight records into the counters
//! and grouped series the dashboard displays. The transform is pure and
//! total: the same input always produces the same output, malformed
//! values were already coerced at the record boundary, and empty input
//! yields an all-zero summary rather than an error.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::flight::Flight;

/// Label used for delayed flights with no recorded delay reason.
const OTHER_REASON: &str = "Other";

/// Delay count for a single route, one bar of the route chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDelays {
    /// Route key: explicit route label, or `departure-arrival`.
    pub route: String,
    /// Number of delayed flights on this route.
    pub count: u64,
}

/// Passenger total for a single day, one point of the daily series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPax {
    /// Calendar date, ISO `YYYY-MM-DD`.
    pub date: String,
    /// Total passengers across all flights on this date.
    pub count: u64,
}

/// Flight count for a single delay reason, one slice of the reason chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonCount {
    /// Trimmed delay reason, or `"Other"` when none was recorded.
    pub name: String,
    /// Number of delayed flights with this reason.
    pub count: u64,
}

/// The derived statistics for one window of flight records.
///
/// An immutable value created fresh on every aggregation call. Field
/// names and array ordering are part of the consumer contract:
/// `pax_per_day` is date-ascending and `delay_bar` is count-descending.
/// Serialized field names are the camelCase dashboard names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightStatsSummary {
    /// Number of flights in the window.
    pub total_flights: u64,
    /// Total passengers across all flights.
    pub total_pax: u64,
    /// Number of flights with a non-blank remark or delay reason.
    pub total_delays: u64,
    /// Share of flights departing at or before schedule, 0-100, rounded
    /// half-up. Zero when there are no flights.
    pub on_time_percent: u32,
    /// Delays per route, count-descending, ties in first-appearance order.
    pub delay_bar: Vec<RouteDelays>,
    /// Passengers per day, date-ascending.
    pub pax_per_day: Vec<DailyPax>,
    /// Delays per reason, in first-appearance order.
    pub delay_pie: Vec<ReasonCount>,
}

impl FlightStatsSummary {
    /// The all-zero summary produced for an empty window.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_flights: 0,
            total_pax: 0,
            total_delays: 0,
            on_time_percent: 0,
            delay_bar: Vec::new(),
            pax_per_day: Vec::new(),
            delay_pie: Vec::new(),
        }
    }
}

/// Aggregate a window of flight records into a statistics summary.
///
/// The caller has already scoped the records to the requested window;
/// no further date filtering happens here. The input sequence is
/// consumed once, synchronously.
#[must_use]
pub fn aggregate(flights: &[Flight]) -> FlightStatsSummary {
    if flights.is_empty() {
        return FlightStatsSummary::empty();
    }

    let total_flights = flights.len() as u64;
    let total_pax: u64 = flights.iter().map(Flight::pax).sum();

    let delayed: Vec<&Flight> = flights.iter().filter(|f| f.is_delayed()).collect();
    let total_delays = delayed.len() as u64;

    let on_time = flights.iter().filter(|f| f.is_on_time()).count();
    let on_time_percent = percent_rounded(on_time, flights.len());

    FlightStatsSummary {
        total_flights,
        total_pax,
        total_delays,
        on_time_percent,
        delay_bar: delays_by_route(&delayed),
        pax_per_day: pax_by_date(flights),
        delay_pie: delays_by_reason(&delayed),
    }
}

/// Integer percentage of `part` in `whole`, rounded half-up.
///
/// Half-up is the documented choice for exact `.5` boundaries.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[allow(clippy::cast_precision_loss)]
fn percent_rounded(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    // f64::round is half-away-from-zero, which is half-up for
    // non-negative ratios.
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Group the delay set by route key, count-descending.
///
/// The sort is stable, so routes with equal counts keep their
/// first-appearance order within the delay set.
fn delays_by_route(delayed: &[&Flight]) -> Vec<RouteDelays> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut bars: Vec<RouteDelays> = Vec::new();

    for flight in delayed {
        let route = flight.route_key();
        match index.get(&route) {
            Some(&i) => bars[i].count += 1,
            None => {
                index.insert(route.clone(), bars.len());
                bars.push(RouteDelays { route, count: 1 });
            }
        }
    }

    bars.sort_by(|a, b| b.count.cmp(&a.count));
    bars
}

/// Group all records by flight date and sum passengers, date-ascending.
fn pax_by_date(flights: &[Flight]) -> Vec<DailyPax> {
    let mut by_date: BTreeMap<&str, u64> = BTreeMap::new();
    for flight in flights {
        *by_date.entry(flight.flight_date.as_str()).or_insert(0) += flight.pax();
    }

    // BTreeMap iteration is ascending by key, and lexicographic order of
    // ISO dates equals chronological order.
    by_date
        .into_iter()
        .map(|(date, count)| DailyPax {
            date: date.to_string(),
            count,
        })
        .collect()
}

/// Group the delay set by trimmed reason, in first-appearance order.
fn delays_by_reason(delayed: &[&Flight]) -> Vec<ReasonCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut slices: Vec<ReasonCount> = Vec::new();

    for flight in delayed {
        let reason = flight.trimmed_delay_reason().unwrap_or(OTHER_REASON);
        match index.get(reason) {
            Some(&i) => slices[i].count += 1,
            None => {
                index.insert(reason, slices.len());
                slices.push(ReasonCount {
                    name: reason.to_string(),
                    count: 1,
                });
            }
        }
    }

    slices
}
