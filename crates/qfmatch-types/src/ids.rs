//! Identifiers for the two parties of a contribution.
//!
//! Both are opaque strings supplied by the caller (wallet addresses,
//! project ids, ...). They are totally ordered so that every map keyed by
//! them iterates in the same order on every machine.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RecipientId
// ---------------------------------------------------------------------------

/// The project or grantee receiving contributions and matching funds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(pub String);

impl RecipientId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecipientId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecipientId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ContributorId
// ---------------------------------------------------------------------------

/// The funder making a contribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributorId(pub String);

impl ContributorId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContributorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ContributorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContributorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
