//! Statistics service tying the window resolver, repository, and
//! aggregation engine together.
//!
//! The service owns the one concurrency hazard in the flow: a refresh
//! for an old window selection resolving after a newer one. Every
//! refresh takes a sequence number when it is issued, and a result
//! whose sequence is no longer the latest issued is discarded instead
//! of being published, so `latest` always corresponds to the most
//! recently requested window among completed refreshes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;
use crate::repository::FlightRepository;
use crate::stats::{aggregate, FlightStatsSummary};
use crate::window::WindowMode;

/// A published summary together with the refresh that produced it.
struct Published {
    seq: u64,
    summary: FlightStatsSummary,
}

/// Computes and publishes flight-statistics summaries.
///
/// The current date is obtained through an injected clock so window
/// resolution stays deterministic under test.
pub struct StatsService<R> {
    repository: R,
    clock: fn() -> NaiveDate,
    next_seq: AtomicU64,
    latest: Mutex<Option<Published>>,
}

impl<R> std::fmt::Debug for StatsService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsService")
            .field("next_seq", &self.next_seq.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<R: FlightRepository> StatsService<R> {
    /// Create a service reading "today" from the local system clock.
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, || chrono::Local::now().date_naive())
    }

    /// Create a service with an explicit clock, for deterministic tests.
    #[must_use]
    pub fn with_clock(repository: R, clock: fn() -> NaiveDate) -> Self {
        Self {
            repository,
            clock,
            next_seq: AtomicU64::new(0),
            latest: Mutex::new(None),
        }
    }

    /// Resolve the window, fetch its records, and aggregate them.
    ///
    /// The returned summary is always the one computed by this call.
    /// It is additionally published to [`latest`](Self::latest) unless
    /// a newer refresh was issued while this one was in flight.
    ///
    /// # Errors
    ///
    /// Propagates the repository error unmodified when the fetch
    /// fails; no partial summary is produced and nothing is published.
    pub async fn refresh(&self, mode: WindowMode) -> Result<FlightStatsSummary> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let range = mode.resolve((self.clock)());
        debug!("refresh #{seq}: window '{mode}' resolves to {range}");

        let flights = self.repository.fetch(&range).await?;
        let summary = aggregate(&flights);
        debug!(
            "refresh #{seq}: {} flights, {} delays",
            summary.total_flights, summary.total_delays
        );

        self.publish(seq, &summary);
        Ok(summary)
    }

    /// The summary of the most recently requested window among
    /// completed refreshes, if any refresh has published yet.
    #[must_use]
    pub fn latest(&self) -> Option<FlightStatsSummary> {
        let latest = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        latest.as_ref().map(|p| p.summary.clone())
    }

    /// Publish a refresh result unless it has been superseded.
    fn publish(&self, seq: u64, summary: &FlightStatsSummary) {
        if seq != self.next_seq.load(Ordering::SeqCst) {
            debug!("refresh #{seq}: superseded, discarding result");
            return;
        }

        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Re-check under the lock so two racing publishes keep the newer.
        if latest.as_ref().map_or(true, |p| p.seq < seq) {
            *latest = Some(Published {
                seq,
                summary: summary.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::flight::Flight;
    use crate::window::DateRange;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
    }

    fn flight_with_pax(date: &str, economy: u32) -> Flight {
        Flight {
            id: None,
            flight_date: date.to_string(),
            flight_no: String::new(),
            aircraft: String::new(),
            capacity: 0,
            departure: "AAA".to_string(),
            arrival: "BBB".to_string(),
            route: None,
            std: String::new(),
            atd: String::new(),
            remark: String::new(),
            delay_reason: String::new(),
            schedule_status: String::new(),
            premium: 0,
            economy,
            infant: 0,
        }
    }

    /// One scripted fetch response.
    struct Scripted {
        /// Signaled when the fetch begins.
        started: Option<Arc<Notify>>,
        /// Awaited before the fetch returns.
        gate: Option<Arc<Notify>>,
        result: Result<Vec<Flight>>,
    }

    /// A repository that replays scripted responses in order.
    struct ScriptedRepo {
        responses: Mutex<VecDeque<Scripted>>,
    }

    impl ScriptedRepo {
        fn new(responses: Vec<Scripted>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }

        fn ok(flights: Vec<Flight>) -> Scripted {
            Scripted {
                started: None,
                gate: None,
                result: Ok(flights),
            }
        }
    }

    #[async_trait::async_trait]
    impl FlightRepository for ScriptedRepo {
        async fn fetch(&self, _range: &DateRange) -> Result<Vec<Flight>> {
            let scripted = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected fetch");
            if let Some(started) = &scripted.started {
                started.notify_one();
            }
            if let Some(gate) = &scripted.gate {
                gate.notified().await;
            }
            scripted.result
        }
    }

    #[tokio::test]
    async fn test_refresh_returns_aggregated_summary() {
        let repo = ScriptedRepo::new(vec![ScriptedRepo::ok(vec![
            flight_with_pax("2024-03-15", 100),
            flight_with_pax("2024-03-15", 50),
        ])]);
        let service = StatsService::with_clock(repo, fixed_today);

        let summary = service.refresh(WindowMode::Today).await.unwrap();
        assert_eq!(summary.total_flights, 2);
        assert_eq!(summary.total_pax, 150);
    }

    #[tokio::test]
    async fn test_refresh_publishes_latest() {
        let repo = ScriptedRepo::new(vec![ScriptedRepo::ok(vec![flight_with_pax(
            "2024-03-15",
            42,
        )])]);
        let service = StatsService::with_clock(repo, fixed_today);

        assert!(service.latest().is_none());
        let summary = service.refresh(WindowMode::Today).await.unwrap();
        assert_eq!(service.latest(), Some(summary));
    }

    #[tokio::test]
    async fn test_refresh_propagates_fetch_error() {
        let repo = ScriptedRepo::new(vec![Scripted {
            started: None,
            gate: None,
            result: Err(Error::internal("store unavailable")),
        }]);
        let service = StatsService::with_clock(repo, fixed_today);

        let result = service.refresh(WindowMode::Today).await;
        assert!(result.is_err());
        // A failed fetch publishes nothing.
        assert!(service.latest().is_none());
    }

    #[tokio::test]
    async fn test_stale_refresh_does_not_overwrite_latest() {
        let started = Arc::new(Notify::new());
        let gate = Arc::new(Notify::new());

        let repo = ScriptedRepo::new(vec![
            Scripted {
                started: Some(Arc::clone(&started)),
                gate: Some(Arc::clone(&gate)),
                result: Ok(vec![flight_with_pax("2024-02-20", 999)]),
            },
            ScriptedRepo::ok(vec![flight_with_pax("2024-03-15", 1)]),
        ]);
        let service = Arc::new(StatsService::with_clock(repo, fixed_today));

        // First refresh blocks inside the fetch.
        let stale = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.refresh(WindowMode::Last30d).await })
        };
        started.notified().await;

        // Second refresh is issued while the first is in flight and
        // completes immediately.
        let fresh = service.refresh(WindowMode::Today).await.unwrap();
        assert_eq!(fresh.total_pax, 1);

        // Now the first fetch resolves, out of date.
        gate.notify_one();
        let stale_summary = stale.await.unwrap().unwrap();
        assert_eq!(stale_summary.total_pax, 999);

        // The published summary still belongs to the newest request.
        assert_eq!(service.latest(), Some(fresh));
    }

    #[tokio::test]
    async fn test_sequential_refreshes_publish_in_order() {
        let repo = ScriptedRepo::new(vec![
            ScriptedRepo::ok(vec![flight_with_pax("2024-03-15", 10)]),
            ScriptedRepo::ok(vec![flight_with_pax("2024-03-15", 20)]),
        ]);
        let service = StatsService::with_clock(repo, fixed_today);

        service.refresh(WindowMode::Today).await.unwrap();
        let second = service.refresh(WindowMode::Today).await.unwrap();
        assert_eq!(service.latest(), Some(second));
    }

    #[tokio::test]
    async fn test_refresh_with_empty_store() {
        let repo = ScriptedRepo::new(vec![ScriptedRepo::ok(Vec::new())]);
        let service = StatsService::with_clock(repo, fixed_today);

        let summary = service.refresh(WindowMode::Last30d).await.unwrap();
        assert_eq!(summary, FlightStatsSummary::empty());
    }
}
