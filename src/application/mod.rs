//! Application Layer
//!
//! The connection pool and the driver registry it resolves drivers from.
//! Depends on domain gateways (abstractions), not concrete drivers.

pub mod connection_pool;
pub mod driver_registry;

pub use connection_pool::ConnectionPool;
pub use driver_registry::DriverRegistry;
