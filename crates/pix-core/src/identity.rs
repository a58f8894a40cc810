//! # Receiver Identifier
//!
//! UUID-backed identifier for a receiver aggregate. Always valid by
//! construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiverId(Uuid);

impl ReceiverId {
    /// Create a new random receiver identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a receiver identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReceiverId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ReceiverId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ReceiverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ReceiverId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}
