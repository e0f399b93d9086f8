//! Continuous price-time priority matching.
//!
//! After every admission the book is crossed until the best bid is strictly
//! below the best ask (or a side is empty):
//!
//! ```text
//! while best_bid >= best_ask:
//!     fill head(best_bid) against head(best_ask) for min(remaining)
//!     drop whichever heads are now filled
//! evict any fill-and-kill order left at the head of a best level
//! ```
//!
//! Better price always wins because only the best levels are considered;
//! equal price falls back to queue order because only level heads trade.

use tickbook_types::{
    OrderId, OrderType, Price, Result, Side, TickbookError, Trade, TradeInfo, Trades,
};

use crate::OrderBook;
use crate::orderbook::OrderLocation;

/// The parts of a level head the crossing loop needs after filling it.
#[derive(Debug, Clone, Copy)]
struct Head {
    key: usize,
    id: OrderId,
    side: Side,
    price: Price,
}

impl Head {
    fn location(self) -> OrderLocation {
        OrderLocation {
            key: self.key,
            side: self.side,
            price: self.price,
        }
    }
}

impl OrderBook {
    /// Whether an order on `side` at `price` would cross the opposite side
    /// right now.
    #[must_use]
    pub fn can_match(&self, side: Side, price: Price) -> bool {
        match side {
            Side::Buy => self.best_ask().is_some_and(|best_ask| price >= best_ask),
            Side::Sell => self.best_bid().is_some_and(|best_bid| price <= best_bid),
        }
    }

    /// Cross the book until it is no longer crossed.
    ///
    /// Both legs of every fill are validated before either is applied, so an
    /// over-fill aborts the step with neither side touched. Fills from
    /// earlier steps stay applied; if there were any, the error is a
    /// [`TickbookError::PartialMatch`] carrying their trades.
    pub(crate) fn match_orders(&mut self) -> Result<Trades> {
        let mut trades = Trades::new();
        let outcome = self
            .cross(&mut trades)
            .and_then(|()| self.evict_fill_and_kill());

        match outcome {
            Ok(()) => Ok(trades),
            Err(err) if trades.is_empty() => Err(err),
            Err(err) => {
                tracing::error!(
                    trades = trades.len(),
                    error = %err,
                    "Matching aborted after applying fills"
                );
                Err(TickbookError::PartialMatch {
                    trades,
                    source: Box::new(err),
                })
            }
        }
    }

    fn cross(&mut self, trades: &mut Trades) -> Result<()> {
        loop {
            let (Some(bid_key), Some(ask_key)) =
                (self.best_head(Side::Buy), self.best_head(Side::Sell))
            else {
                break;
            };

            let bid = self.head(bid_key)?;
            let ask = self.head(ask_key)?;
            if bid.price < ask.price {
                break;
            }

            let bid_remaining = self.node(bid_key)?.order.remaining_quantity();
            let ask_remaining = self.node(ask_key)?.order.remaining_quantity();
            let quantity = bid_remaining.min(ask_remaining);

            if let Err(err) = self
                .node(bid_key)?
                .order
                .check_fill(quantity)
                .and_then(|()| self.node(ask_key)?.order.check_fill(quantity))
            {
                tracing::error!(
                    bid = %bid.id,
                    ask = %ask.id,
                    qty = quantity,
                    error = %err,
                    "Fill rejected: matching invariant violated"
                );
                return Err(err);
            }

            let bid_filled = {
                let order = &mut self.node_mut(bid_key)?.order;
                order.fill(quantity)?;
                order.is_filled()
            };
            let ask_filled = {
                let order = &mut self.node_mut(ask_key)?.order;
                order.fill(quantity)?;
                order.is_filled()
            };

            if quantity > 0 {
                let trade = Trade::new(
                    TradeInfo {
                        order_id: bid.id,
                        price: bid.price,
                        quantity,
                    },
                    TradeInfo {
                        order_id: ask.id,
                        price: ask.price,
                        quantity,
                    },
                );
                tracing::debug!(
                    bid = %bid.id,
                    ask = %ask.id,
                    bid_price = bid.price,
                    ask_price = ask.price,
                    qty = quantity,
                    "Trade matched"
                );
                trades.push(trade);
            }

            if bid_filled {
                self.remove_at(bid.id, bid.location())?;
            }
            if ask_filled {
                self.remove_at(ask.id, ask.location())?;
            }
        }

        Ok(())
    }

    /// A fill-and-kill order that survived the crossing loop can only be at
    /// the head of a best level; it must not rest.
    fn evict_fill_and_kill(&mut self) -> Result<()> {
        for side in [Side::Buy, Side::Sell] {
            while let Some(key) = self.best_head(side) {
                if self.node(key)?.order.order_type() != OrderType::FillAndKill {
                    break;
                }
                let head = self.head(key)?;
                let evicted = self.remove_at(head.id, head.location())?;
                tracing::debug!(
                    order = %head.id,
                    side = %head.side,
                    unfilled = evicted.remaining_quantity(),
                    "Fill-and-kill remainder evicted"
                );
            }
        }
        Ok(())
    }

    fn head(&self, key: usize) -> Result<Head> {
        let order = &self.node(key)?.order;
        Ok(Head {
            key,
            id: order.id(),
            side: order.side(),
            price: order.price(),
        })
    }
}
