//! Commands that drive an order book.
//!
//! A recorded sequence of [`OrderCommand`]s fully determines a book's
//! history, which is what replay and determinism checks rely on.

use serde::{Deserialize, Serialize};

use crate::{ModifyOrder, Order, OrderId};

/// A single operation against an order book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OrderCommand {
    Add(Order),
    Cancel { order_id: OrderId },
    Modify(ModifyOrder),
}

impl OrderCommand {
    /// The order id this command addresses.
    #[must_use]
    pub fn order_id(&self) -> OrderId {
        match self {
            Self::Add(order) => order.id(),
            Self::Cancel { order_id } => *order_id,
            Self::Modify(modify) => modify.order_id,
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl OrderCommand {
    /// A random command over a small id and price space, so that duplicates,
    /// unknown ids and crossing prices all occur often.
    pub fn random<R: rand::Rng>(rng: &mut R, max_id: u64, mid_price: u32) -> Self {
        use crate::{OrderType, Side};

        let id = OrderId(rng.gen_range(1..=max_id));
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let low = mid_price.saturating_sub(5);
        let price = rng.gen_range(low..=mid_price.saturating_add(5));
        let quantity = rng.gen_range(1..=20);

        match rng.gen_range(0..10) {
            0..=4 => Self::Add(Order::new(
                OrderType::GoodTillCanceled,
                id,
                side,
                price,
                quantity,
            )),
            5 | 6 => Self::Add(Order::new(OrderType::FillAndKill, id, side, price, quantity)),
            7 => Self::Cancel { order_id: id },
            _ => Self::Modify(ModifyOrder {
                order_id: id,
                side,
                price,
                quantity,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::Side;

    #[test]
    fn order_id_of_each_variant() {
        assert_eq!(OrderCommand::Add(Order::gtc(4, Side::Buy, 1, 1)).order_id(), OrderId(4));
        assert_eq!(OrderCommand::Cancel { order_id: OrderId(5) }.order_id(), OrderId(5));
        assert_eq!(
            OrderCommand::Modify(ModifyOrder::new(6, Side::Sell, 2, 2)).order_id(),
            OrderId(6)
        );
    }

    #[test]
    fn serde_uses_op_tag() {
        let cmd = OrderCommand::Cancel { order_id: OrderId(12) };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"op":"cancel","order_id":12}"#);
        let back: OrderCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn random_commands_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let cmd = OrderCommand::random(&mut rng, 16, 100);
            let id = cmd.order_id().get();
            assert!((1..=16).contains(&id));
            if let OrderCommand::Add(order) = &cmd {
                assert!((95..=105).contains(&order.price()));
                assert!(order.initial_quantity() >= 1);
            }
        }
    }
}
