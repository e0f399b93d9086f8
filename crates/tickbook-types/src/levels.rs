//! Aggregated per-price snapshot of the book.

use serde::{Deserialize, Serialize};

use crate::Price;

/// Outstanding quantity at one price.
///
/// The aggregate is a `u64` so summing many `u32` remainders cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub price: Price,
    pub quantity: u64,
}

/// Bid and ask levels, each ordered best first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderbookLevels {
    bids: Vec<LevelInfo>,
    asks: Vec<LevelInfo>,
}

impl OrderbookLevels {
    #[must_use]
    pub fn new(bids: Vec<LevelInfo>, asks: Vec<LevelInfo>) -> Self {
        Self { bids, asks }
    }

    /// Bid levels, highest price first.
    #[must_use]
    pub fn bids(&self) -> &[LevelInfo] {
        &self.bids
    }

    /// Ask levels, lowest price first.
    #[must_use]
    pub fn asks(&self) -> &[LevelInfo] {
        &self.asks
    }

    /// Sum of every level's quantity on both sides.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.bids
            .iter()
            .chain(self.asks.iter())
            .map(|l| l.quantity)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_quantity_spans_both_sides() {
        let levels = OrderbookLevels::new(
            vec![LevelInfo { price: 10, quantity: 4 }],
            vec![
                LevelInfo { price: 11, quantity: 2 },
                LevelInfo { price: 12, quantity: u64::from(u32::MAX) },
            ],
        );
        assert_eq!(levels.total_quantity(), 6 + u64::from(u32::MAX));
        assert_eq!(levels.bids().len(), 1);
        assert_eq!(levels.asks()[0].price, 11);
    }

    #[test]
    fn default_is_empty() {
        let levels = OrderbookLevels::default();
        assert!(levels.bids().is_empty());
        assert!(levels.asks().is_empty());
        assert_eq!(levels.total_quantity(), 0);
    }
}
