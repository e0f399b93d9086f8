//! Determinism verification utilities.
//!
//! The engine is a pure function of its command stream: the same commands
//! in the same order must produce the same trades. The `trade_root` is a
//! hash over an ordered trade sequence that lets two runs be compared
//! without diffing full payloads.

use sha2::{Digest, Sha256};
use tickbook_types::{Trade, TradeInfo, constants};

/// Compute the trade root hash over a set of trades.
///
/// This is a deterministic hash that depends on:
/// - The number of trades
/// - Each leg's order id, price and quantity, in order
///
/// The same trades in the same order always produce the same root.
#[must_use]
pub fn compute_trade_root(trades: &[Trade]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(constants::TRADE_ROOT_DOMAIN);
    hasher.update((trades.len() as u64).to_le_bytes());

    for trade in trades {
        hash_leg(&mut hasher, trade.bid());
        hash_leg(&mut hasher, trade.ask());
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}

fn hash_leg(hasher: &mut Sha256, leg: &TradeInfo) {
    hasher.update(leg.order_id.get().to_le_bytes());
    hasher.update(leg.price.to_le_bytes());
    hasher.update(leg.quantity.to_le_bytes());
}

/// Verify that a given trade root matches the expected hash.
#[must_use]
pub fn verify_trade_root(trades: &[Trade], expected_root: &[u8; 32]) -> bool {
    compute_trade_root(trades) == *expected_root
}
