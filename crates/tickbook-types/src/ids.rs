//! Identifiers and scalar units used throughout tickbook.
//!
//! Order ids are assigned by the caller. Prices are integer ticks and
//! quantities are integer lots, both in the `u32` range.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Price in integer ticks.
pub type Price = u32;

/// Quantity in integer lots.
pub type Quantity = u32;

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Caller-assigned order identifier.
///
/// Unique among live orders; the book never generates one itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl OrderId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for OrderId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
