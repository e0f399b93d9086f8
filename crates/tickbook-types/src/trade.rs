//! Trade records produced by the matching pass.
//!
//! A [`Trade`] pairs the bid leg and the ask leg of one fill. Each leg
//! carries its own order's resting price, so a crossed fill reports two
//! different prices.

use serde::{Deserialize, Serialize};

use crate::{OrderId, Price, Quantity};

/// One side of a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeInfo {
    pub order_id: OrderId,
    /// The matched order's own limit price.
    pub price: Price,
    pub quantity: Quantity,
}

/// An executed fill between a bid and an ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    bid: TradeInfo,
    ask: TradeInfo,
}

/// Trades in the order the matching pass produced them.
pub type Trades = Vec<Trade>;

impl Trade {
    #[must_use]
    pub fn new(bid: TradeInfo, ask: TradeInfo) -> Self {
        Self { bid, ask }
    }

    #[must_use]
    pub fn bid(&self) -> &TradeInfo {
        &self.bid
    }

    #[must_use]
    pub fn ask(&self) -> &TradeInfo {
        &self.ask
    }

    /// Quantity exchanged; both legs always agree.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.bid.quantity
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[bid {} @ {} | ask {} @ {}] x {}",
            self.bid.order_id, self.bid.price, self.ask.order_id, self.ask.price, self.bid.quantity,
        )
    }
}
