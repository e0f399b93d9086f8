//! Order types for the tickbook matching engine.
//!
//! An [`Order`] has an immutable identity (id, side, price, lifetime policy,
//! initial quantity) and a single piece of mutable state: its remaining
//! quantity, which only [`Order::fill`] may reduce.

use serde::{Deserialize, Serialize};

use crate::{OrderId, Price, Quantity, Result, TickbookError};

/// Which side of the book this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Lifetime policy of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderType {
    /// Rests until fully filled or canceled.
    GoodTillCanceled,
    /// Matches on arrival; any remainder is discarded.
    FillAndKill,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoodTillCanceled => write!(f, "GTC"),
            Self::FillAndKill => write!(f, "FAK"),
        }
    }
}

/// A limit order.
///
/// Deserialization goes through [`OrderRecord`] so a decoded order can never
/// hold more than it started with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderRecord")]
pub struct Order {
    order_type: OrderType,
    id: OrderId,
    side: Side,
    price: Price,
    initial_quantity: Quantity,
    remaining_quantity: Quantity,
}

/// Wire form of an [`Order`], validated on conversion.
#[derive(Deserialize)]
struct OrderRecord {
    order_type: OrderType,
    id: OrderId,
    side: Side,
    price: Price,
    initial_quantity: Quantity,
    remaining_quantity: Quantity,
}

impl TryFrom<OrderRecord> for Order {
    type Error = TickbookError;

    fn try_from(record: OrderRecord) -> Result<Self> {
        if record.remaining_quantity > record.initial_quantity {
            return Err(TickbookError::InvalidOrder {
                order_id: record.id,
                reason: format!(
                    "remaining quantity {} exceeds initial quantity {}",
                    record.remaining_quantity, record.initial_quantity
                ),
            });
        }
        Ok(Self {
            order_type: record.order_type,
            id: record.id,
            side: record.side,
            price: record.price,
            initial_quantity: record.initial_quantity,
            remaining_quantity: record.remaining_quantity,
        })
    }
}

impl Order {
    #[must_use]
    pub fn new(
        order_type: OrderType,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            order_type,
            id,
            side,
            price,
            initial_quantity: quantity,
            remaining_quantity: quantity,
        }
    }

    /// Shorthand for a good-till-canceled order.
    #[must_use]
    pub fn gtc(id: impl Into<OrderId>, side: Side, price: Price, quantity: Quantity) -> Self {
        Self::new(OrderType::GoodTillCanceled, id.into(), side, price, quantity)
    }

    /// Shorthand for a fill-and-kill order.
    #[must_use]
    pub fn fak(id: impl Into<OrderId>, side: Side, price: Price, quantity: Quantity) -> Self {
        Self::new(OrderType::FillAndKill, id.into(), side, price, quantity)
    }

    #[must_use]
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    #[must_use]
    pub fn id(&self) -> OrderId {
        self.id
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub fn initial_quantity(&self) -> Quantity {
        self.initial_quantity
    }

    #[must_use]
    pub fn remaining_quantity(&self) -> Quantity {
        self.remaining_quantity
    }

    #[must_use]
    pub fn filled_quantity(&self) -> Quantity {
        self.initial_quantity - self.remaining_quantity
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Check that `quantity` could be filled without applying it.
    pub fn check_fill(&self, quantity: Quantity) -> Result<()> {
        if quantity > self.remaining_quantity {
            return Err(TickbookError::OverFill {
                order_id: self.id,
                requested: quantity,
                remaining: self.remaining_quantity,
            });
        }
        Ok(())
    }

    /// Reduce the remaining quantity by `quantity`.
    ///
    /// Fails with [`TickbookError::OverFill`] and leaves the order untouched
    /// if `quantity` exceeds what remains.
    pub fn fill(&mut self, quantity: Quantity) -> Result<()> {
        self.check_fill(quantity)?;
        self.remaining_quantity -= quantity;
        Ok(())
    }
}

/// A request to replace a live order's side, price and quantity.
///
/// The replacement keeps the original order's id and lifetime policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyOrder {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

impl ModifyOrder {
    #[must_use]
    pub fn new(order_id: impl Into<OrderId>, side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            order_id: order_id.into(),
            side,
            price,
            quantity,
        }
    }

    /// Build the replacement order under the given lifetime policy.
    #[must_use]
    pub fn to_order(&self, order_type: OrderType) -> Order {
        Order::new(order_type, self.order_id, self.side, self.price, self.quantity)
    }
}
