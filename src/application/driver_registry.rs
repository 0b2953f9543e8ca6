//! Driver Registry
//!
//! Resolves a configured driver identifier to a driver implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::gateways::DatabaseDriver;
use crate::shared::errors::PoolError;

/// Named collection of available database drivers
#[derive(Default, Clone)]
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn DatabaseDriver>>,
}

impl DriverRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver under `name`, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, driver: Arc<dyn DatabaseDriver>) -> &mut Self {
        let name = name.into();
        tracing::debug!(driver = %name, "Registering database driver");
        self.drivers.insert(name, driver);
        self
    }

    /// Look up the driver registered under `name`
    ///
    /// # Errors
    ///
    /// Returns `PoolError::DriverRegistration` if `name` is blank or unknown.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn DatabaseDriver>, PoolError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PoolError::DriverRegistration {
                driver: String::new(),
                reason: "no driver configured".to_string(),
            });
        }

        self.drivers.get(name).cloned().ok_or_else(|| {
            tracing::warn!(driver = %name, "Driver not found in registry");
            PoolError::DriverRegistration {
                driver: name.to_string(),
                reason: "driver not found".to_string(),
            }
        })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Names of all registered drivers, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drivers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry").field("drivers", &self.names()).finish()
    }
}
