//! Connection Pool
//!
//! Caches idle database connections for reuse. Acquisition reuses the oldest
//! usable cached connection or opens a new one through the driver; release
//! commits pending work and caches the connection while there is room.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::application::driver_registry::DriverRegistry;
use crate::domain::gateways::{ConfigProvider, DatabaseDriver};
use crate::domain::models::connection::PooledConnection;
use crate::domain::models::settings::{DatabaseSettings, Password, DEFAULT_MAX_CONNECTIONS, DEFAULT_TIMEOUT};
use crate::shared::errors::PoolError;

/// Bounded FIFO cache of idle connections to a single database
///
/// One pool per process is the intended deployment; share it with `Arc`.
pub struct ConnectionPool {
    settings: Arc<DatabaseSettings>,
    driver: Arc<dyn DatabaseDriver>,
    /// Idle connections, oldest first. The guard is also the acquisition
    /// critical section.
    free_list: Mutex<VecDeque<PooledConnection>>,
    max_connections: AtomicUsize,
    timeout_ms: AtomicU64,
}

impl ConnectionPool {
    /// Build a pool from the provider's settings, resolving the configured driver
    ///
    /// # Errors
    ///
    /// Returns `PoolError::DriverRegistration` if the configured driver is not
    /// in `registry`. The pool cannot be used in that case.
    pub fn new(provider: &dyn ConfigProvider, registry: &DriverRegistry) -> Result<Self, PoolError> {
        let settings = provider.get();
        tracing::debug!(
            driver = %settings.driver,
            url = %settings.url,
            username = %settings.username,
            max_connections = settings.max_connections,
            timeout_ms = duration_to_millis(DEFAULT_TIMEOUT),
            "Creating connection pool"
        );

        let driver = registry.resolve(&settings.driver).map_err(|e| {
            tracing::error!(error = %e, "Driver registration failed");
            e
        })?;

        let max_connections = settings.max_connections;
        Ok(Self {
            settings,
            driver,
            free_list: Mutex::new(VecDeque::new()),
            max_connections: AtomicUsize::new(max_connections),
            timeout_ms: AtomicU64::new(duration_to_millis(DEFAULT_TIMEOUT)),
        })
    }

    /// Get a connection using the pool's default timeout
    ///
    /// # Errors
    ///
    /// Returns `PoolError::ConnectionCreation` if no cached connection is
    /// usable and the driver fails to open a new one.
    pub async fn acquire(&self) -> Result<PooledConnection, PoolError> {
        self.acquire_with_timeout(self.timeout()).await
    }

    /// Get a connection, reusing the oldest usable cached one if any
    ///
    /// `timeout` is advisory only: opening a new connection is not bounded by
    /// it.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::ConnectionCreation` if no cached connection is
    /// usable and the driver fails to open a new one.
    pub async fn acquire_with_timeout(&self, timeout: Duration) -> Result<PooledConnection, PoolError> {
        tracing::debug!(timeout_ms = duration_to_millis(timeout), "Acquiring connection");

        let mut free_list = self.free_list.lock().await;

        while let Some(mut connection) = free_list.pop_front() {
            if self.is_usable(&mut connection).await {
                tracing::debug!(
                    connection_id = %connection.id(),
                    idle = free_list.len(),
                    "Reusing cached connection"
                );
                return Ok(connection);
            }
            tracing::debug!(connection_id = %connection.id(), "Discarding unusable cached connection");
        }

        // Created while still holding the lock so concurrent callers cannot
        // both see an empty cache and race on creation.
        let connection = self.create_connection().await?;
        drop(free_list);

        tracing::debug!(connection_id = %connection.id(), "Created new connection");
        Ok(connection)
    }

    /// Return a connection to the pool
    ///
    /// Absent or closed connections are ignored. Pending work is committed;
    /// a failed commit discards the connection. The connection is cached if
    /// the pool is below its ceiling and dropped otherwise. Never fails.
    pub async fn release(&self, connection: Option<PooledConnection>) {
        let Some(mut connection) = connection else {
            tracing::debug!("Ignoring release of absent connection");
            return;
        };
        let connection_id = connection.id();
        tracing::debug!(connection_id = %connection_id, "Releasing connection");

        if !self.is_usable(&mut connection).await {
            tracing::debug!(connection_id = %connection_id, "Released connection is closed, ignoring");
            return;
        }

        if let Err(e) = connection.commit().await {
            tracing::warn!(
                connection_id = %connection_id,
                error = %e,
                "Commit failed on release, discarding connection"
            );
            return;
        }

        let mut free_list = self.free_list.lock().await;
        let max_connections = self.max_connections.load(Ordering::SeqCst);
        if free_list.len() < max_connections {
            free_list.push_back(connection);
            tracing::debug!(connection_id = %connection_id, idle = free_list.len(), "Connection cached");
        } else {
            tracing::debug!(
                connection_id = %connection_id,
                max_connections,
                "Cache full, dropping connection"
            );
        }
    }

    /// Whether `connection` is open
    ///
    /// A failure to read the status counts as not usable.
    pub async fn is_usable(&self, connection: &mut PooledConnection) -> bool {
        match connection.is_closed().await {
            Ok(closed) => !closed,
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection.id(),
                    error = %e,
                    "Connection status check failed, treating as unusable"
                );
                false
            }
        }
    }

    /// Set the cache ceiling; a negative value restores the default
    ///
    /// Lowering the ceiling does not evict cached connections.
    pub fn set_max_connections(&self, max_connections: i64) {
        let max_connections = usize::try_from(max_connections).unwrap_or(DEFAULT_MAX_CONNECTIONS);
        self.max_connections.store(max_connections, Ordering::SeqCst);
        tracing::debug!(max_connections, "Maximum cached connections updated");
    }

    #[must_use]
    pub fn max_connections(&self) -> usize {
        self.max_connections.load(Ordering::SeqCst)
    }

    /// Default timeout passed by [`acquire`](Self::acquire)
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.load(Ordering::SeqCst))
    }

    /// Set the default timeout; `None` restores [`DEFAULT_TIMEOUT`]
    pub fn set_timeout(&self, timeout: Option<Duration>) {
        let timeout_ms = duration_to_millis(timeout.unwrap_or(DEFAULT_TIMEOUT));
        self.timeout_ms.store(timeout_ms, Ordering::SeqCst);
        tracing::debug!(timeout_ms, "Default timeout updated");
    }

    /// Number of idle connections currently cached
    pub async fn idle_count(&self) -> usize {
        self.free_list.lock().await.len()
    }

    #[must_use]
    pub fn driver(&self) -> &str {
        &self.settings.driver
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.settings.url
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.settings.username
    }

    #[must_use]
    pub fn password(&self) -> &Password {
        &self.settings.password
    }

    async fn create_connection(&self) -> Result<PooledConnection, PoolError> {
        let mut connection = self
            .driver
            .connect(
                &self.settings.url,
                &self.settings.username,
                self.settings.password.expose(),
            )
            .await
            .map_err(|e| {
                tracing::error!(url = %self.settings.url, error = %e, "Driver refused connection");
                PoolError::ConnectionCreation(e)
            })?;

        connection.set_auto_commit(false).await.map_err(|e| {
            tracing::error!(error = %e, "Unable to disable auto-commit on new connection");
            PoolError::ConnectionCreation(e)
        })?;

        Ok(PooledConnection::new(connection))
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("settings", &self.settings)
            .field("max_connections", &self.max_connections())
            .field("timeout", &self.timeout())
            .finish_non_exhaustive()
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
