//! Gateway Traits (Ports)
//!
//! Abstract interfaces defining contracts for external dependencies.
//! These are implemented by driven adapters in the infrastructure layer.

pub mod config_provider;
pub mod database_driver;

pub use config_provider::ConfigProvider;
pub use database_driver::{DatabaseConnection, DatabaseDriver};
