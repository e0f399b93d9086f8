//! System-wide constants for the tickbook matching engine.

/// Default number of order slots pre-allocated in a book's arena.
pub const DEFAULT_ORDER_CAPACITY: usize = 4096;

/// Upper bound accepted for [`crate::BookConfig::order_capacity`].
pub const MAX_ORDER_CAPACITY: usize = 1 << 24;

/// Domain tag prefixed to every trade root hash.
pub const TRADE_ROOT_DOMAIN: &[u8] = b"tickbook:trade_root:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "tickbook";
