//! Domain Models
//!
//! Value objects describing the database and the connections handed out.

pub mod connection;
pub mod settings;

pub use connection::{ConnectionId, PooledConnection};
pub use settings::{DatabaseSettings, Password, DEFAULT_MAX_CONNECTIONS, DEFAULT_TIMEOUT};
