//! Replay a recorded command stream against a fresh book.
//!
//! ```text
//! replay(BookConfig, [OrderCommand]) -> ReplayOutcome
//! ```
//!
//! No state outlives the call, so two replays of the same stream must agree
//! on every field of the outcome.

use tickbook_types::{BookConfig, OrderCommand, OrderbookLevels, Result, Trades, constants};

use crate::{OrderBook, determinism::compute_trade_root};

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// All trades, in the order they were produced.
    pub trades: Trades,
    /// Hash over `trades`; see [`compute_trade_root`].
    pub trade_root: [u8; 32],
    /// Book snapshot after the last command.
    pub levels: OrderbookLevels,
    /// Orders still resting after the last command.
    pub live_orders: usize,
}

/// Apply `commands` in order to an empty book built from `config`.
///
/// Stops at the first invariant violation and returns it.
pub fn replay(config: BookConfig, commands: &[OrderCommand]) -> Result<ReplayOutcome> {
    let mut book = OrderBook::with_config(config)?;
    let mut trades = Trades::new();

    for command in commands {
        trades.extend(book.apply(command.clone())?);
    }

    let trade_root = compute_trade_root(&trades);

    tracing::info!(
        engine = constants::ENGINE_NAME,
        version = constants::VERSION,
        commands = commands.len(),
        trades = trades.len(),
        live_orders = book.size(),
        trade_root = hex::encode(trade_root),
        "Replay complete"
    );

    Ok(ReplayOutcome {
        trades,
        trade_root,
        levels: book.levels(),
        live_orders: book.size(),
    })
}
