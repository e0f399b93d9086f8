//! # tickbook-matchcore
//!
//! **Single-instrument limit order book with strict price-time priority.**
//!
//! The book accepts good-till-canceled and fill-and-kill orders, crosses
//! them continuously, and reports aggregated liquidity per price. It is:
//!
//! - **Synchronous**: every operation runs to completion on `&mut self`
//! - **Deterministic**: same command stream -> same trades, same trade root
//! - **Single-owner**: orders live in one slab arena; levels and the
//!   identity index only hold keys into it

pub mod determinism;
pub mod matcher;
pub mod orderbook;
pub mod price_level;
pub mod replay;

pub use determinism::{compute_trade_root, verify_trade_root};
pub use orderbook::{OrderBook, OrderLocation};
pub use price_level::PriceLevel;
pub use replay::{ReplayOutcome, replay};
