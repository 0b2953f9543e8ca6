//! Domain Layer
//!
//! Contains the pool's value types and the gateway traits (ports) it relies on.
//! This layer has no dependencies on infrastructure.

pub mod gateways;
pub mod models;

pub use gateways::{ConfigProvider, DatabaseConnection, DatabaseDriver};
pub use models::{ConnectionId, DatabaseSettings, Password, PooledConnection};
