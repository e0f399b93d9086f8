//! The order book for a single instrument.
//!
//! Storage is split three ways:
//! - **Arena** (`Slab<OrderNode>`): sole owner of every resting order
//! - **Bids** (`BTreeMap<Reverse<Price>, PriceLevel>`): highest price first
//! - **Asks** (`BTreeMap<Price, PriceLevel>`): lowest price first
//!
//! An identity index `HashMap<OrderId, OrderLocation>` holds each live
//! order's slab key, so cancellation unlinks in O(1) once the level is found.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use tickbook_types::{
    BookConfig, LevelInfo, ModifyOrder, Order, OrderCommand, OrderId, OrderType, OrderbookLevels,
    Price, Result, Side, TickbookError, Trades,
};

use crate::price_level::{OrderArena, OrderNode, PriceLevel};

/// Where a live order sits: its arena key plus the level that queues it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLocation {
    pub key: usize,
    pub side: Side,
    pub price: Price,
}

/// The order book for a single instrument.
#[derive(Debug)]
pub struct OrderBook {
    config: BookConfig,
    orders: OrderArena,
    /// Buy side: highest price first (`Reverse` key).
    bids: BTreeMap<Reverse<Price>, PriceLevel>,
    /// Sell side: lowest price first.
    asks: BTreeMap<Price, PriceLevel>,
    /// Identity index: `OrderId -> OrderLocation`.
    index: HashMap<OrderId, OrderLocation>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create an empty book with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(BookConfig::default())
    }

    /// Create an empty book after validating `config`.
    pub fn with_config(config: BookConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: BookConfig) -> Self {
        Self {
            orders: OrderArena::with_capacity(config.order_capacity),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: HashMap::with_capacity(config.order_capacity),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    // =================================================================
    // Lifecycle
    // =================================================================

    /// Admit an order and run the matching pass.
    ///
    /// Rejected orders (duplicate live id, zero quantity under the rejecting
    /// policy, fill-and-kill with nothing to cross) yield no trades and leave
    /// the book untouched.
    pub fn add_order(&mut self, order: Order) -> Result<Trades> {
        if self.index.contains_key(&order.id()) {
            tracing::debug!(order = %order.id(), "Order rejected: duplicate id");
            return Ok(Vec::new());
        }

        if order.remaining_quantity() == 0
            && (self.config.reject_zero_quantity || order.order_type() == OrderType::FillAndKill)
        {
            tracing::debug!(order = %order.id(), "Order rejected: zero quantity");
            return Ok(Vec::new());
        }

        if order.order_type() == OrderType::FillAndKill
            && !self.can_match(order.side(), order.price())
        {
            tracing::debug!(
                order = %order.id(),
                side = %order.side(),
                price = order.price(),
                "Order rejected: fill-and-kill cannot match"
            );
            return Ok(Vec::new());
        }

        self.insert(order);
        self.match_orders()
    }

    /// Cancel a live order and hand it back. Unknown ids are a no-op.
    ///
    /// A corrupted book is logged and reported as `None`; use
    /// [`OrderBook::try_cancel_order`] to tell the two apart.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Option<Order> {
        match self.try_cancel_order(order_id) {
            Ok(order) => order,
            Err(err) => {
                tracing::error!(order = %order_id, error = %err, "Cancel failed");
                None
            }
        }
    }

    /// Cancel a live order. `Ok(None)` if the id is not live.
    pub fn try_cancel_order(&mut self, order_id: OrderId) -> Result<Option<Order>> {
        self.detach(order_id)
    }

    /// Replace a live order, keeping its id and lifetime policy.
    ///
    /// The replacement re-enters at the back of its new level, so the order
    /// loses its time priority even if the price is unchanged. Unknown ids,
    /// and zero quantities under the rejecting policy, are a no-op.
    pub fn modify_order(&mut self, modify: ModifyOrder) -> Result<Trades> {
        let Some(order_type) = self.order(modify.order_id).map(Order::order_type) else {
            tracing::debug!(order = %modify.order_id, "Modify ignored: unknown id");
            return Ok(Vec::new());
        };
        if modify.quantity == 0 && self.config.reject_zero_quantity {
            tracing::debug!(order = %modify.order_id, "Modify rejected: zero quantity");
            return Ok(Vec::new());
        }

        self.detach(modify.order_id)?;
        self.add_order(modify.to_order(order_type))
    }

    /// Apply one command, returning whatever trades it produced.
    pub fn apply(&mut self, command: OrderCommand) -> Result<Trades> {
        match command {
            OrderCommand::Add(order) => self.add_order(order),
            OrderCommand::Cancel { order_id } => {
                self.try_cancel_order(order_id)?;
                Ok(Vec::new())
            }
            OrderCommand::Modify(modify) => self.modify_order(modify),
        }
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Aggregated quantity per price, bids highest first, asks lowest first.
    #[must_use]
    pub fn levels(&self) -> OrderbookLevels {
        let info = |level: &PriceLevel| LevelInfo {
            price: level.price(),
            quantity: level.total_quantity(&self.orders),
        };
        OrderbookLevels::new(
            self.bids.values().map(info).collect(),
            self.asks.values().map(info).collect(),
        )
    }

    /// Number of live orders.
    #[must_use]
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the book has no orders on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Best (highest) bid price, or `None` if no bids.
    #[must_use]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next().map(|r| r.0)
    }

    /// Best (lowest) ask price, or `None` if no asks.
    #[must_use]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    /// Spread = `best_ask - best_bid`. `None` if either side is empty.
    #[must_use]
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => ask.checked_sub(bid),
            _ => None,
        }
    }

    /// Check if an order is live in the book.
    #[must_use]
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.index.contains_key(&order_id)
    }

    /// Look up a live order.
    #[must_use]
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        let location = self.index.get(&order_id)?;
        self.orders.get(location.key).map(|node| &node.order)
    }

    /// Every live order, in no particular order.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().map(|(_, node)| &node.order)
    }

    /// Live orders on one side in priority order (best price, then oldest).
    #[must_use]
    pub fn side_orders(&self, side: Side) -> Vec<&Order> {
        match side {
            Side::Buy => self
                .bids
                .values()
                .flat_map(|level| level.iter(&self.orders))
                .collect(),
            Side::Sell => self
                .asks
                .values()
                .flat_map(|level| level.iter(&self.orders))
                .collect(),
        }
    }

    /// Number of distinct bid price levels.
    #[must_use]
    pub fn bid_depth(&self) -> usize {
        self.bids.len()
    }

    /// Number of distinct ask price levels.
    #[must_use]
    pub fn ask_depth(&self) -> usize {
        self.asks.len()
    }

    // =================================================================
    // Index maintenance (shared with the matcher)
    // =================================================================

    /// Append an order to the tail of its level and register it.
    fn insert(&mut self, order: Order) {
        let order_id = order.id();
        let location = OrderLocation {
            side: order.side(),
            price: order.price(),
            key: self.orders.insert(OrderNode::new(order)),
        };

        let level = match location.side {
            Side::Buy => self
                .bids
                .entry(Reverse(location.price))
                .or_insert_with(|| PriceLevel::new(location.price)),
            Side::Sell => self
                .asks
                .entry(location.price)
                .or_insert_with(|| PriceLevel::new(location.price)),
        };
        level.push_back(&mut self.orders, location.key);
        self.index.insert(order_id, location);
    }

    /// Remove a live order from every structure. `Ok(None)` if it isn't live.
    fn detach(&mut self, order_id: OrderId) -> Result<Option<Order>> {
        match self.index.get(&order_id).copied() {
            Some(location) => self.remove_at(order_id, location).map(Some),
            None => Ok(None),
        }
    }

    /// Unlink the order at `location`, prune its level if emptied, and drop
    /// it from the index and the arena.
    ///
    /// Nothing is mutated unless both the level and the slot exist.
    pub(crate) fn remove_at(&mut self, order_id: OrderId, location: OrderLocation) -> Result<Order> {
        if !self.orders.contains(location.key) {
            return Err(corrupted(order_id, "arena slot missing"));
        }
        let level = match location.side {
            Side::Buy => self.bids.get_mut(&Reverse(location.price)),
            Side::Sell => self.asks.get_mut(&location.price),
        }
        .ok_or_else(|| corrupted(order_id, "price level missing"))?;

        level.unlink(&mut self.orders, location.key);
        if level.is_empty() {
            match location.side {
                Side::Buy => self.bids.remove(&Reverse(location.price)),
                Side::Sell => self.asks.remove(&location.price),
            };
        }

        self.index.remove(&order_id);
        Ok(self.orders.remove(location.key).order)
    }

    /// Arena key of the oldest order at the best level of `side`.
    pub(crate) fn best_head(&self, side: Side) -> Option<usize> {
        match side {
            Side::Buy => self.bids.values().next()?.front(),
            Side::Sell => self.asks.values().next()?.front(),
        }
    }

    pub(crate) fn node(&self, key: usize) -> Result<&OrderNode> {
        self.orders.get(key).ok_or_else(|| TickbookError::BookCorrupted {
            reason: format!("level head points at empty slot {key}"),
        })
    }

    pub(crate) fn node_mut(&mut self, key: usize) -> Result<&mut OrderNode> {
        self.orders.get_mut(key).ok_or_else(|| TickbookError::BookCorrupted {
            reason: format!("level head points at empty slot {key}"),
        })
    }
}

fn corrupted(order_id: OrderId, what: &str) -> TickbookError {
    let err = TickbookError::BookCorrupted {
        reason: format!("{what} for order {order_id}"),
    };
    tracing::error!(order = %order_id, error = %err, "Identity index out of sync");
    err
}

#[cfg(test)]
mod tests {
    use tickbook_types::*;

    use super::*;

    fn gtc(id: u64, side: Side, price: Price, qty: Quantity) -> Order {
        Order::gtc(id, side, price, qty)
    }

    #[test]
    fn insert_and_query_best_bid_ask() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Buy, 100, 1)).unwrap();
        book.add_order(gtc(2, Side::Buy, 99, 1)).unwrap();
        book.add_order(gtc(3, Side::Sell, 101, 1)).unwrap();
        book.add_order(gtc(4, Side::Sell, 102, 1)).unwrap();

        assert_eq!(book.best_bid(), Some(100));
        assert_eq!(book.best_ask(), Some(101));
        assert_eq!(book.spread(), Some(1));
        assert_eq!(book.size(), 4);
        assert_eq!(book.bid_depth(), 2);
        assert_eq!(book.ask_depth(), 2);
    }

    #[test]
    fn cancel_order_removes_from_book() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Buy, 100, 1)).unwrap();
        assert_eq!(book.size(), 1);

        let cancelled = book.cancel_order(OrderId(1)).unwrap();
        assert_eq!(cancelled.id(), OrderId(1));
        assert_eq!(book.size(), 0);
        assert!(book.is_empty());
        assert!(!book.contains_order(OrderId(1)));
    }

    #[test]
    fn cancel_unknown_order_is_noop() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Sell, 100, 1)).unwrap();
        assert!(book.cancel_order(OrderId(99)).is_none());
        assert!(book.cancel_order(OrderId(1)).is_some());
        assert!(book.cancel_order(OrderId(1)).is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn cancel_removes_empty_level_only() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Buy, 100, 1)).unwrap();
        book.add_order(gtc(2, Side::Buy, 100, 2)).unwrap();
        assert_eq!(book.bid_depth(), 1);

        book.cancel_order(OrderId(1));
        assert_eq!(book.bid_depth(), 1);
        assert_eq!(book.levels().bids(), &[LevelInfo { price: 100, quantity: 2 }]);

        book.cancel_order(OrderId(2));
        assert_eq!(book.bid_depth(), 0);
        assert!(book.levels().bids().is_empty());
    }

    #[test]
    fn cancel_from_middle_of_queue_keeps_order() {
        let mut book = OrderBook::new();
        for id in 1..=4 {
            book.add_order(gtc(id, Side::Sell, 50, 1)).unwrap();
        }
        book.cancel_order(OrderId(2));
        book.cancel_order(OrderId(4));

        let ids: Vec<u64> = book.side_orders(Side::Sell).iter().map(|o| o.id().get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn duplicate_order_rejected() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Buy, 100, 1)).unwrap();
        let trades = book.add_order(gtc(1, Side::Sell, 100, 5)).unwrap();

        assert!(trades.is_empty());
        assert_eq!(book.size(), 1);
        assert_eq!(book.order(OrderId(1)).unwrap().side(), Side::Buy);
        assert_eq!(book.ask_depth(), 0);
    }

    #[test]
    fn id_can_be_reused_after_cancel() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Buy, 100, 1)).unwrap();
        book.cancel_order(OrderId(1));
        book.add_order(gtc(1, Side::Sell, 200, 3)).unwrap();
        assert_eq!(book.order(OrderId(1)).unwrap().price(), 200);
    }

    #[test]
    fn bid_levels_highest_first_asks_lowest_first() {
        let mut book = OrderBook::new();
        for (id, price) in [(1, 90), (2, 100), (3, 95)] {
            book.add_order(gtc(id, Side::Buy, price, 1)).unwrap();
        }
        for (id, price) in [(4, 110), (5, 101), (6, 105)] {
            book.add_order(gtc(id, Side::Sell, price, 2)).unwrap();
        }

        let levels = book.levels();
        let bids: Vec<Price> = levels.bids().iter().map(|l| l.price).collect();
        let asks: Vec<Price> = levels.asks().iter().map(|l| l.price).collect();
        assert_eq!(bids, vec![100, 95, 90]);
        assert_eq!(asks, vec![101, 105, 110]);
    }

    #[test]
    fn levels_aggregate_per_price() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Buy, 10, 3)).unwrap();
        book.add_order(gtc(2, Side::Buy, 10, 4)).unwrap();
        book.add_order(gtc(3, Side::Buy, 9, 1)).unwrap();

        let levels = book.levels();
        assert_eq!(
            levels.bids(),
            &[
                LevelInfo { price: 10, quantity: 7 },
                LevelInfo { price: 9, quantity: 1 },
            ]
        );
        assert!(levels.asks().is_empty());
        // Snapshot does not mutate.
        assert_eq!(book.levels(), levels);
    }

    #[test]
    fn zero_price_is_accepted() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Sell, 0, 2)).unwrap();
        assert_eq!(book.best_ask(), Some(0));
    }

    #[test]
    fn zero_quantity_rejected_by_default() {
        let mut book = OrderBook::new();
        let trades = book.add_order(gtc(1, Side::Buy, 10, 0)).unwrap();
        assert!(trades.is_empty());
        assert!(book.is_empty());
    }

    #[test]
    fn zero_quantity_admitted_when_allowed() {
        let config = BookConfig {
            reject_zero_quantity: false,
            ..BookConfig::default()
        };
        let mut book = OrderBook::with_config(config).unwrap();
        book.add_order(gtc(1, Side::Buy, 10, 0)).unwrap();
        assert_eq!(book.size(), 1);
        assert_eq!(book.levels().bids(), &[LevelInfo { price: 10, quantity: 0 }]);
    }

    #[test]
    fn with_config_validates() {
        let config = BookConfig {
            order_capacity: 0,
            ..BookConfig::default()
        };
        assert!(matches!(
            OrderBook::with_config(config),
            Err(TickbookError::Configuration(_))
        ));
    }

    #[test]
    fn apply_dispatches_commands() {
        let mut book = OrderBook::new();
        book.apply(OrderCommand::Add(gtc(1, Side::Buy, 10, 5))).unwrap();
        book.apply(OrderCommand::Modify(ModifyOrder::new(1, Side::Buy, 11, 5)))
            .unwrap();
        assert_eq!(book.best_bid(), Some(11));
        book.apply(OrderCommand::Cancel { order_id: OrderId(1) }).unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn orders_iterates_every_live_order() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Buy, 10, 5)).unwrap();
        book.add_order(gtc(2, Side::Sell, 12, 5)).unwrap();
        let mut ids: Vec<u64> = book.orders().map(|o| o.id().get()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn corrupted_cancel_is_an_error_not_a_noop() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Sell, 100, 1)).unwrap();
        book.asks.clear();

        assert!(matches!(
            book.try_cancel_order(OrderId(1)),
            Err(TickbookError::BookCorrupted { .. })
        ));
        assert!(matches!(
            book.apply(OrderCommand::Cancel { order_id: OrderId(1) }),
            Err(TickbookError::BookCorrupted { .. })
        ));
        // Nothing was mutated by the failed attempts.
        assert!(book.contains_order(OrderId(1)));
        assert!(book.cancel_order(OrderId(1)).is_none());

        // An unknown id is still a plain no-op.
        assert!(book.try_cancel_order(OrderId(7)).unwrap().is_none());
        assert!(book.apply(OrderCommand::Cancel { order_id: OrderId(7) }).unwrap().is_empty());
    }

    #[test]
    fn failure_mid_pass_returns_trades_already_applied() {
        let mut book = OrderBook::new();
        book.add_order(gtc(1, Side::Sell, 10, 1)).unwrap();
        book.add_order(gtc(2, Side::Sell, 10, 1)).unwrap();

        // Order 2 now claims a price whose level does not exist.
        let key = book.index[&OrderId(2)].key;
        book.node_mut(key).unwrap().order = gtc(2, Side::Sell, 9, 1);

        let err = book.add_order(gtc(3, Side::Buy, 10, 2)).unwrap_err();
        let TickbookError::PartialMatch { trades, source } = err else {
            panic!("expected PartialMatch, got {err}");
        };
        let asks: Vec<u64> = trades.iter().map(|t| t.ask().order_id.get()).collect();
        assert_eq!(asks, vec![1, 2]);
        assert!(matches!(*source, TickbookError::BookCorrupted { .. }));
        assert!(!book.contains_order(OrderId(1)));
    }

    #[test]
    fn empty_book() {
        let book = OrderBook::default();
        assert!(book.is_empty());
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.spread(), None);
        assert_eq!(book.levels(), OrderbookLevels::default());
    }
}
