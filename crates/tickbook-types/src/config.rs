//! Configuration for a single order book.

use serde::{Deserialize, Serialize};

use crate::{Result, TickbookError, constants};

/// Per-book configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Silently reject orders (and modifications) with zero quantity.
    ///
    /// When disabled, a zero-quantity order is admitted like any other. A
    /// good-till-canceled one rests with nothing to trade until it is
    /// canceled or reaches the head of a crossing level, where it is
    /// removed without producing a trade.
    pub reject_zero_quantity: bool,
    /// Number of order slots to pre-allocate.
    pub order_capacity: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            reject_zero_quantity: true,
            order_capacity: constants::DEFAULT_ORDER_CAPACITY,
        }
    }
}

impl BookConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.order_capacity == 0 || self.order_capacity > constants::MAX_ORDER_CAPACITY {
            return Err(TickbookError::Configuration(format!(
                "order_capacity must be in 1..={}, got {}",
                constants::MAX_ORDER_CAPACITY,
                self.order_capacity
            )));
        }
        Ok(())
    }
}
