//! Driven Adapters
//!
//! Implementations of gateway traits for external systems:
//! - Configuration sources
//! - Database drivers

pub mod config;
pub mod drivers;
pub mod postgres_driver;

pub use config::{FileConfigProvider, StaticConfigProvider};
pub use drivers::builtin_registry;
pub use postgres_driver::{PostgresConnection, PostgresDriver};
