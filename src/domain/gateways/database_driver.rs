//! Database Driver Gateway
//!
//! Contracts the pool needs from a database driver and the connections it
//! opens. SQL execution is left to callers via [`DatabaseConnection::as_any_mut`].

use std::any::Any;

use async_trait::async_trait;

use crate::shared::errors::DriverError;

/// A live session to the database
#[async_trait]
pub trait DatabaseConnection: Send {
    /// Whether the underlying transport is closed
    ///
    /// An error means the status could not be determined.
    async fn is_closed(&mut self) -> Result<bool, DriverError>;

    /// Commit any pending work
    async fn commit(&mut self) -> Result<(), DriverError>;

    /// Switch auto-commit mode on or off
    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), DriverError>;

    /// Access the concrete connection type
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Opens physical connections
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Open a new connection with the given credentials
    async fn connect(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn DatabaseConnection>, DriverError>;
}
