//! Repository contract for flight records.
//!
//! The statistics flow only depends on this contract: given an
//! inclusive date range, produce every flight record inside it. The
//! concrete store behind it is interchangeable; this module ships a
//! `SQLite`-backed adapter, and tests substitute in-memory fakes.

use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::flight::Flight;
use crate::storage::Storage;
use crate::window::DateRange;

/// A source of flight records for a date range.
///
/// Implementations must return every record with `flight_date` inside
/// the range, bounds included. Uniqueness per record is the
/// repository's responsibility; the statistics engine does not
/// deduplicate, and it requires no ordering. A failed fetch propagates
/// as an error with no retry and no partial result.
#[async_trait::async_trait]
pub trait FlightRepository: Send + Sync {
    /// Fetch every flight record within the range, bounds included.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying store cannot be queried.
    async fn fetch(&self, range: &DateRange) -> Result<Vec<Flight>>;
}

/// `SQLite`-backed repository over the storage layer.
///
/// The rusqlite connection is not `Sync`, so the storage handle lives
/// behind a mutex; queries are short and the statistics flow issues
/// them one at a time.
#[derive(Debug)]
pub struct SqliteRepository {
    storage: Mutex<Storage>,
}

impl SqliteRepository {
    /// Wrap an opened storage handle.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Mutex::new(storage),
        }
    }
}

#[async_trait::async_trait]
impl FlightRepository for SqliteRepository {
    async fn fetch(&self, range: &DateRange) -> Result<Vec<Flight>> {
        let storage = self
            .storage
            .lock()
            .map_err(|_| Error::internal("storage mutex poisoned"))?;
        storage.fetch_by_date_range(range.start, range.end)
    }
}
