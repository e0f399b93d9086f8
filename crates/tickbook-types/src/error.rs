//! Error types for the tickbook matching engine.
//!
//! All errors use the `TB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Input validation
//! - 5xx: Matching / book invariant violations
//! - 9xx: General errors (configuration)
//!
//! Expected rejections (duplicate id, unmatched fill-and-kill, unknown id on
//! cancel or modify) are not errors; the book reports them as "no trades".

use thiserror::Error;

use crate::{OrderId, Quantity, Trades};

/// Central error enum for all tickbook operations.
#[derive(Debug, Error)]
pub enum TickbookError {
    // =================================================================
    // Input Errors (1xx)
    // =================================================================
    /// A decoded order violates `remaining <= initial`.
    #[error("TB_ERR_100: Invalid order {order_id}: {reason}")]
    InvalidOrder { order_id: OrderId, reason: String },

    // =================================================================
    // Matching Errors (5xx)
    // =================================================================
    /// A fill asked for more than the order had left.
    #[error("TB_ERR_500: Order {order_id} over-filled: requested {requested}, remaining {remaining}")]
    OverFill {
        order_id: OrderId,
        requested: Quantity,
        remaining: Quantity,
    },

    /// The identity index and the level queues disagree.
    #[error("TB_ERR_501: Book corrupted: {reason}")]
    BookCorrupted { reason: String },

    /// A matching pass failed after it had already applied `trades`.
    ///
    /// Those fills are in the book; `trades` is their only record.
    #[error("TB_ERR_502: Matching aborted after {} trade(s): {source}", .trades.len())]
    PartialMatch {
        trades: Trades,
        source: Box<TickbookError>,
    },

    // =================================================================
    // General (9xx)
    // =================================================================
    /// Configuration error (unparseable JSON, out-of-range values).
    #[error("TB_ERR_900: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TickbookError>;

impl From<serde_json::Error> for TickbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
