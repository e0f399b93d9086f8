//! A single price level in the order book.
//!
//! Orders live in the book's [`OrderArena`]; a level only threads a FIFO
//! queue through them with `prev`/`next` slab keys. Appending and removing
//! by key are both O(1), and a key stays valid until its order is removed,
//! however the rest of the queue changes.

use slab::Slab;
use tickbook_types::{Order, Price};

/// Arena owning every resting order of a book.
pub type OrderArena = Slab<OrderNode>;

/// An order stored in the arena plus its links within its level's queue.
#[derive(Debug, Clone)]
pub struct OrderNode {
    pub order: Order,
    prev: Option<usize>,
    next: Option<usize>,
}

impl OrderNode {
    #[must_use]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            prev: None,
            next: None,
        }
    }
}

/// A single price level: all resting orders at one price on one side.
///
/// The head of the queue has the highest time priority and is filled first.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl PriceLevel {
    /// Create a new empty price level.
    #[must_use]
    pub fn new(price: Price) -> Self {
        Self {
            price,
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Append the node at `key` to the back of this level (lowest time priority).
    pub fn push_back(&mut self, arena: &mut OrderArena, key: usize) {
        debug_assert_eq!(arena[key].order.price(), self.price);

        let prev_tail = self.tail;
        {
            let node = &mut arena[key];
            node.prev = prev_tail;
            node.next = None;
        }
        match prev_tail {
            Some(tail) => arena[tail].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        self.len += 1;
    }

    /// Unlink the node at `key` from this level's queue.
    ///
    /// The node stays in the arena; the caller decides whether to free it.
    pub fn unlink(&mut self, arena: &mut OrderArena, key: usize) {
        let (prev, next) = {
            let node = &arena[key];
            (node.prev, node.next)
        };
        match prev {
            Some(p) => arena[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => arena[n].prev = prev,
            None => self.tail = prev,
        }
        let node = &mut arena[key];
        node.prev = None;
        node.next = None;
        self.len -= 1;
    }

    /// Key of the oldest order at this level.
    #[must_use]
    pub fn front(&self) -> Option<usize> {
        self.head
    }

    /// Orders from oldest to newest.
    pub fn iter<'a>(&self, arena: &'a OrderArena) -> LevelIter<'a> {
        LevelIter {
            arena,
            cursor: self.head,
        }
    }

    /// Total remaining quantity across all orders at this level.
    #[must_use]
    pub fn total_quantity(&self, arena: &OrderArena) -> u64 {
        self.iter(arena)
            .map(|o| u64::from(o.remaining_quantity()))
            .sum()
    }

    /// Returns `true` if there are no orders at this level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of orders at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }
}

/// FIFO iterator over the orders of one level.
pub struct LevelIter<'a> {
    arena: &'a OrderArena,
    cursor: Option<usize>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.arena[self.cursor?];
        self.cursor = node.next;
        Some(&node.order)
    }
}
