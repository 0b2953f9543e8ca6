//! Common test utilities for pool integration tests
//!
//! Provides an in-memory driver whose connections can be closed, broken or
//! made to fail commits from the test body.

#![allow(dead_code)]

use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use db_connection_cache::domain::gateways::{DatabaseConnection, DatabaseDriver};
use db_connection_cache::infrastructure::driven_adapters::StaticConfigProvider;
use db_connection_cache::{ConnectionPool, DatabaseSettings, DriverError, DriverRegistry};

/// Name the in-memory driver is registered under
pub const MOCK_DRIVER: &str = "mock";

/// Observable state of one in-memory connection
#[derive(Debug, Default)]
pub struct ConnectionState {
    pub serial: usize,
    pub closed: AtomicBool,
    pub status_fails: AtomicBool,
    pub commit_fails: AtomicBool,
    pub auto_commit: AtomicBool,
    pub commits: AtomicUsize,
}

pub struct MockConnection {
    state: Arc<ConnectionState>,
}

impl MockConnection {
    pub fn serial(&self) -> usize {
        self.state.serial
    }
}

#[async_trait]
impl DatabaseConnection for MockConnection {
    async fn is_closed(&mut self) -> Result<bool, DriverError> {
        tokio::task::yield_now().await;
        if self.state.status_fails.load(Ordering::SeqCst) {
            return Err(DriverError::Status("connection reset by peer".to_string()));
        }
        Ok(self.state.closed.load(Ordering::SeqCst))
    }

    async fn commit(&mut self) -> Result<(), DriverError> {
        tokio::task::yield_now().await;
        if self.state.commit_fails.load(Ordering::SeqCst) {
            return Err(DriverError::Commit("could not serialize access".to_string()));
        }
        self.state.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.state.auto_commit.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// In-memory driver recording every connection it opens
#[derive(Debug, Default)]
pub struct MockDriver {
    opened: Mutex<Vec<Arc<ConnectionState>>>,
    refuse: AtomicBool,
    connect_delay: Mutex<Option<Duration>>,
}

impl MockDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of connections opened so far
    pub fn opened(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn state(&self, serial: usize) -> Arc<ConnectionState> {
        self.opened.lock().unwrap()[serial].clone()
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub fn set_connect_delay(&self, delay: Duration) {
        *self.connect_delay.lock().unwrap() = Some(delay);
    }
}

#[async_trait]
impl DatabaseDriver for MockDriver {
    async fn connect(
        &self,
        url: &str,
        username: &str,
        _password: &str,
    ) -> Result<Box<dyn DatabaseConnection>, DriverError> {
        let delay = *self.connect_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.refuse.load(Ordering::SeqCst) {
            return Err(DriverError::Connect(format!("password authentication failed for user \"{username}\" at {url}")));
        }

        let mut opened = self.opened.lock().unwrap();
        let state = Arc::new(ConnectionState {
            serial: opened.len(),
            auto_commit: AtomicBool::new(true),
            ..ConnectionState::default()
        });
        opened.push(state.clone());
        Ok(Box::new(MockConnection { state }))
    }
}

pub fn mock_settings(max_connections: usize) -> DatabaseSettings {
    DatabaseSettings::new(MOCK_DRIVER, "mock://localhost/app", "app", "secret").with_max_connections(max_connections)
}

/// Build a pool over a fresh in-memory driver
pub fn create_pool(max_connections: usize) -> (Arc<ConnectionPool>, Arc<MockDriver>) {
    let driver = MockDriver::new();
    let mut registry = DriverRegistry::new();
    registry.register(MOCK_DRIVER, driver.clone());
    let provider = StaticConfigProvider::new(mock_settings(max_connections));

    let pool = ConnectionPool::new(&provider, &registry).expect("mock driver is registered");
    (Arc::new(pool), driver)
}
