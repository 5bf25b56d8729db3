//! `flightdeck` - Statistics core for a flight-records operations dashboard
//!
//! This library turns a stored collection of flight records into the
//! derived counters and grouped series a dashboard displays: total
//! flights, passengers, delays, on-time percentage, delays per route
//! and per reason, and passengers per day.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod flight;
pub mod logging;
pub mod repository;
pub mod service;
pub mod stats;
pub mod storage;
pub mod window;

pub use config::Config;
pub use error::{Error, Result};
pub use flight::Flight;
pub use logging::init_logging;
pub use repository::{FlightRepository, SqliteRepository};
pub use service::StatsService;
pub use stats::{aggregate, FlightStatsSummary};
pub use storage::{Storage, StorageStats};
pub use window::{DateRange, WindowMode};
