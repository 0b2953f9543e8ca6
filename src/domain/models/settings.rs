//! Database Settings
//!
//! Immutable connection parameters supplied to the pool at construction time.

use std::fmt;
use std::time::Duration;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Ceiling on cached connections when none is configured
pub const DEFAULT_MAX_CONNECTIONS: usize = 500;

/// Default acquisition timeout carried by the pool
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(16_000);

/// Database password, wiped from memory on drop and never printed
#[derive(Clone, PartialEq, Eq, Default, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the clear-text value, for handing to a driver only
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Connection parameters for the single database served by the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// Identifier of the driver to resolve from the registry
    pub driver: String,
    pub url: String,
    pub username: String,
    pub password: Password,
    /// Maximum number of idle connections kept in the cache
    pub max_connections: usize,
}

impl DatabaseSettings {
    /// Create settings with the default cache ceiling
    #[must_use]
    pub fn new(
        driver: impl Into<String>,
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            driver: driver.into(),
            url: url.into(),
            username: username.into(),
            password: Password::new(password),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    #[must_use]
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }
}
