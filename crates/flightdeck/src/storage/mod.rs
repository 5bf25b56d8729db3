//! Storage layer for flightdeck.
//!
//! This module provides `SQLite`-based persistent storage for flight
//! records, including insertion, inclusive date-range queries, and
//! summary statistics about the store itself.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::flight::Flight;

/// Column list shared by every flight SELECT.
const FLIGHT_COLUMNS: &str = "id, flight_date, flight_no, aircraft, capacity, departure, \
     arrival, route, std, atd, remark, delay_reason, schedule_status, premium, economy, infant";

/// Storage engine for flight records.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Record insertion
/// - Inclusive date-range queries
/// - Store-level statistics
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't
    /// exist. Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        // Initialize schema
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a flight record into storage.
    ///
    /// Returns the assigned row ID. Uniqueness of records is the
    /// caller's responsibility; the store does not deduplicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, flight: &Flight) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO flights (flight_date, flight_no, aircraft, capacity, departure,
                arrival, route, std, atd, remark, delay_reason, schedule_status,
                premium, economy, infant)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            ",
            params![
                flight.flight_date,
                flight.flight_no,
                flight.aircraft,
                flight.capacity,
                flight.departure,
                flight.arrival,
                flight.route,
                flight.std,
                flight.atd,
                flight.remark,
                flight.delay_reason,
                flight.schedule_status,
                flight.premium,
                flight.economy,
                flight.infant,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted flight with id {}", id);
        Ok(id)
    }

    /// Get a flight by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<Flight>> {
        let sql = format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = ?1");
        let result = self
            .conn
            .query_row(&sql, [id], Self::row_to_flight)
            .optional()?;
        Ok(result)
    }

    /// Get every flight with `flight_date` in `[start, end]`, bounds
    /// included.
    ///
    /// No ordering is guaranteed beyond what the query plan produces;
    /// the statistics engine does not rely on any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn fetch_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Flight>> {
        let start_str = start.format("%Y-%m-%d").to_string();
        let end_str = end.format("%Y-%m-%d").to_string();

        let sql = format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights \
             WHERE flight_date >= ?1 AND flight_date <= ?2"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let flights = stmt
            .query_map(params![start_str, end_str], Self::row_to_flight)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            "Fetched {} flights for {}..{}",
            flights.len(),
            start_str,
            end_str
        );
        Ok(flights)
    }

    /// Count total flight records in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM flights", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a flight by ID.
    ///
    /// Returns `true` if a record was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM flights WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_flights = self.count()?;

        let earliest: Option<String> = self
            .conn
            .query_row(
                "SELECT flight_date FROM flights ORDER BY flight_date ASC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let latest: Option<String> = self
            .conn
            .query_row(
                "SELECT flight_date FROM flights ORDER BY flight_date DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        // Get database file size
        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_flights,
            earliest_date: earliest,
            latest_date: latest,
            db_size_bytes,
        })
    }

    /// Convert a database row to a Flight struct.
    fn row_to_flight(row: &rusqlite::Row) -> rusqlite::Result<Flight> {
        Ok(Flight {
            id: Some(row.get(0)?),
            flight_date: row.get(1)?,
            flight_no: row.get(2)?,
            aircraft: row.get(3)?,
            capacity: count_column(row.get(4)?),
            departure: row.get(5)?,
            arrival: row.get(6)?,
            route: row.get(7)?,
            std: row.get(8)?,
            atd: row.get(9)?,
            remark: row.get(10)?,
            delay_reason: row.get(11)?,
            schedule_status: row.get(12)?,
            premium: count_column(row.get(13)?),
            economy: count_column(row.get(14)?),
            infant: count_column(row.get(15)?),
        })
    }
}

/// Coerce a stored count column to a non-negative integer.
fn count_column(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of flight records stored.
    pub total_flights: i64,
    /// Earliest flight date present, ISO `YYYY-MM-DD`.
    pub earliest_date: Option<String>,
    /// Latest flight date present, ISO `YYYY-MM-DD`.
    pub latest_date: Option<String>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
