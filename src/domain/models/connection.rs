//! Pooled Connection Model
//!
//! A driver connection tagged with the identity the pool tracks it by.

use std::fmt;
use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::gateways::DatabaseConnection;

/// Newtype wrapper for connection identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Create a new random ConnectionId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A connection handed out by the pool
///
/// Owned by exactly one party at a time: the pool's free list or a caller.
/// Dropping it without releasing it closes the underlying session.
pub struct PooledConnection {
    id: ConnectionId,
    created_at: DateTime<Utc>,
    inner: Box<dyn DatabaseConnection>,
}

impl PooledConnection {
    /// Wrap a freshly opened driver connection
    #[must_use]
    pub fn new(inner: Box<dyn DatabaseConnection>) -> Self {
        Self {
            id: ConnectionId::new(),
            created_at: Utc::now(),
            inner,
        }
    }

    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// When the driver opened this connection
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Downcast to the driver's concrete connection type
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.inner.as_any_mut().downcast_mut::<T>()
    }
}

impl Deref for PooledConnection {
    type Target = dyn DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner.as_mut()
    }
}

impl fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledConnection")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
