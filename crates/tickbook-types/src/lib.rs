//! # tickbook-types
//!
//! Shared types, errors, and configuration for the **tickbook** order book.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`OrderId`], plus the [`Price`] and [`Quantity`] units
//! - **Order model**: [`Order`], [`Side`], [`OrderType`], [`ModifyOrder`]
//! - **Trade model**: [`Trade`], [`TradeInfo`]
//! - **Book snapshot**: [`LevelInfo`], [`OrderbookLevels`]
//! - **Commands**: [`OrderCommand`]
//! - **Configuration**: [`BookConfig`]
//! - **Errors**: [`TickbookError`] with `TB_ERR_` prefix codes
//! - **Constants**: limits and defaults

pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod levels;
pub mod order;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use tickbook_types::{Order, Side, Trade, ...};

pub use command::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use levels::*;
pub use order::*;
pub use trade::*;

// Constants are accessed via `tickbook_types::constants::FOO`
// (not re-exported to avoid name collisions).
