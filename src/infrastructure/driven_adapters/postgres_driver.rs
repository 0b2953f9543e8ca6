//! PostgreSQL Driver
//!
//! Implements the driver and connection gateways with SQLx. Auto-commit off
//! is emulated with an explicit transaction, opened on first use through
//! [`PostgresConnection::executor`] and closed by `commit`.

use std::any::Any;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::domain::gateways::{DatabaseConnection, DatabaseDriver};
use crate::shared::errors::DriverError;

/// SQLSTATE raised by any statement sent inside an aborted transaction
const IN_FAILED_TRANSACTION: &str = "25P02";

/// Accept JDBC-style URLs (`jdbc:postgresql://...`) as well as native ones
fn normalize_url(url: &str) -> &str {
    url.strip_prefix("jdbc:").unwrap_or(url)
}

/// Opens single PostgreSQL sessions
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDriver;

impl PostgresDriver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseDriver for PostgresDriver {
    async fn connect(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn DatabaseConnection>, DriverError> {
        let mut options = PgConnectOptions::from_str(normalize_url(url)).map_err(|e| DriverError::Connect(e.to_string()))?;
        if !username.is_empty() {
            options = options.username(username);
        }
        if !password.is_empty() {
            options = options.password(password);
        }

        let connection = PgConnection::connect_with(&options)
            .await
            .map_err(|e| DriverError::Connect(e.to_string()))?;

        tracing::debug!(host = options.get_host(), "Opened PostgreSQL connection");
        Ok(Box::new(PostgresConnection::new(connection)))
    }
}

/// A PostgreSQL session with JDBC-style auto-commit control
#[derive(Debug)]
pub struct PostgresConnection {
    connection: Option<PgConnection>,
    auto_commit: bool,
    in_transaction: bool,
}

impl PostgresConnection {
    fn new(connection: PgConnection) -> Self {
        Self {
            connection: Some(connection),
            auto_commit: true,
            in_transaction: false,
        }
    }

    /// The underlying SQLx connection, for running queries
    ///
    /// Opens the pending transaction first when auto-commit is off, so the
    /// statements run through it are covered by the next `commit`.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Closed` once the connection has been closed, or
    /// `DriverError::Transaction` if the transaction cannot be opened.
    pub async fn executor(&mut self) -> Result<&mut PgConnection, DriverError> {
        if !self.auto_commit {
            self.begin().await?;
        }
        self.connection.as_mut().ok_or(DriverError::Closed)
    }

    /// The underlying SQLx connection, bypassing transaction management
    ///
    /// Returns `None` once the connection has been closed.
    pub fn pg_mut(&mut self) -> Option<&mut PgConnection> {
        self.connection.as_mut()
    }

    #[must_use]
    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Gracefully terminate the session
    ///
    /// Uncommitted work is rolled back by the server.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Sqlx` if the termination handshake fails.
    pub async fn close(&mut self) -> Result<(), DriverError> {
        self.in_transaction = false;
        match self.connection.take() {
            Some(connection) => connection.close().await.map_err(DriverError::from),
            None => Ok(()),
        }
    }

    async fn run(&mut self, statement: &'static str) -> Result<(), DriverError> {
        let connection = self.connection.as_mut().ok_or(DriverError::Closed)?;
        sqlx::Executor::execute(&mut *connection, statement)
            .await
            .map_err(|e| DriverError::Transaction(format!("{statement}: {e}")))?;
        Ok(())
    }

    /// Fail if the open transaction was aborted by an earlier error
    ///
    /// PostgreSQL answers `COMMIT` in that state with a silent `ROLLBACK`.
    async fn ensure_not_aborted(&mut self) -> Result<(), DriverError> {
        let connection = self.connection.as_mut().ok_or(DriverError::Closed)?;
        match sqlx::Executor::execute(&mut *connection, "SELECT 1").await {
            Ok(_) => Ok(()),
            Err(e) => {
                let aborted = e
                    .as_database_error()
                    .and_then(|db| db.code())
                    .is_some_and(|code| code == IN_FAILED_TRANSACTION);
                if aborted {
                    Err(DriverError::Commit("transaction was aborted, pending work rolled back".to_string()))
                } else {
                    Err(DriverError::Commit(e.to_string()))
                }
            }
        }
    }

    async fn begin(&mut self) -> Result<(), DriverError> {
        if !self.in_transaction {
            self.run("BEGIN").await?;
            self.in_transaction = true;
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseConnection for PostgresConnection {
    async fn is_closed(&mut self) -> Result<bool, DriverError> {
        match self.connection.as_mut() {
            None => Ok(true),
            Some(connection) => connection
                .ping()
                .await
                .map(|()| false)
                .map_err(|e| DriverError::Status(e.to_string())),
        }
    }

    async fn commit(&mut self) -> Result<(), DriverError> {
        if !self.in_transaction {
            return Ok(());
        }

        if let Err(e) = self.ensure_not_aborted().await {
            self.in_transaction = false;
            if let Err(rollback) = self.run("ROLLBACK").await {
                tracing::debug!(error = %rollback, "Rollback after aborted transaction failed");
            }
            return Err(e);
        }

        self.in_transaction = false;
        self.run("COMMIT")
            .await
            .map_err(|e| DriverError::Commit(e.to_string()))
    }

    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), DriverError> {
        if enabled == self.auto_commit {
            return Ok(());
        }
        self.auto_commit = enabled;
        if enabled {
            self.commit().await?;
        }
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
