//! Database Connection Cache
//!
//! A process-local cache of live connections to a single relational
//! database, following Clean/Hexagonal Architecture principles.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::{ConnectionPool, DriverRegistry};
pub use domain::{ConfigProvider, DatabaseSettings, PooledConnection};
pub use shared::{DriverError, PoolError};
