//! Built-in Drivers
//!
//! Registry pre-populated with the drivers shipped in this crate.

use std::sync::Arc;

use crate::application::driver_registry::DriverRegistry;

use super::postgres_driver::PostgresDriver;

/// Identifiers the PostgreSQL driver is registered under
pub const POSTGRES_DRIVER_NAMES: [&str; 3] = ["postgres", "postgresql", "org.postgresql.Driver"];

/// A registry containing every built-in driver
#[must_use]
pub fn builtin_registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    let postgres = Arc::new(PostgresDriver::new());
    for name in POSTGRES_DRIVER_NAMES {
        registry.register(name, postgres.clone());
    }
    registry
}
