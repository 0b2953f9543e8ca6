//! Config Provider Gateway
//!
//! Source of the read-once database settings.

use std::sync::Arc;

use crate::domain::models::settings::DatabaseSettings;

/// Supplies the process's database settings
///
/// Implementations load on the first call and hand out the same instance
/// afterwards.
pub trait ConfigProvider: Send + Sync {
    /// Get the settings, loading them on first use
    fn get(&self) -> Arc<DatabaseSettings>;
}
