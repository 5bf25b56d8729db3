//! `SQLite` schema definitions for flightdeck.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the flights table.
pub const CREATE_FLIGHTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flights (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    flight_date TEXT NOT NULL,
    flight_no TEXT NOT NULL DEFAULT '',
    aircraft TEXT NOT NULL DEFAULT '',
    capacity INTEGER NOT NULL DEFAULT 0,
    departure TEXT NOT NULL DEFAULT '',
    arrival TEXT NOT NULL DEFAULT '',
    route TEXT,
    std TEXT NOT NULL DEFAULT '',
    atd TEXT NOT NULL DEFAULT '',
    remark TEXT NOT NULL DEFAULT '',
    delay_reason TEXT NOT NULL DEFAULT '',
    schedule_status TEXT NOT NULL DEFAULT '',
    premium INTEGER NOT NULL DEFAULT 0,
    economy INTEGER NOT NULL DEFAULT 0,
    infant INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on `flight_date` for range queries.
pub const CREATE_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_date ON flights(flight_date)
";

/// SQL statement to create an index on `departure` for route filtering.
pub const CREATE_DEPARTURE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_departure ON flights(departure)
";

/// SQL statement to create an index on `arrival` for route filtering.
pub const CREATE_ARRIVAL_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_arrival ON flights(arrival)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_FLIGHTS_TABLE,
    CREATE_DATE_INDEX,
    CREATE_DEPARTURE_INDEX,
    CREATE_ARRIVAL_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_flights_table_contains_required_columns() {
        assert!(CREATE_FLIGHTS_TABLE.contains("id INTEGER PRIMARY KEY"));
        assert!(CREATE_FLIGHTS_TABLE.contains("flight_date TEXT NOT NULL"));
        assert!(CREATE_FLIGHTS_TABLE.contains("departure TEXT"));
        assert!(CREATE_FLIGHTS_TABLE.contains("arrival TEXT"));
        assert!(CREATE_FLIGHTS_TABLE.contains("premium INTEGER"));
        assert!(CREATE_FLIGHTS_TABLE.contains("economy INTEGER"));
        assert!(CREATE_FLIGHTS_TABLE.contains("infant INTEGER"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
