//! Two-sided price-time-priority order book.
//!
//! ## Structure
//!
//! One [`OrderList`] per side, both keyed by order ids held in the
//! [`OrderStore`]. Every id linked in a list names an active store record,
//! and the walk from front to back visits strictly non-improving prices,
//! older orders first among equals.
//!
//! ## Insertion hints
//!
//! Callers locate the insert position off-engine and pass it as a hint: an
//! order id, `1` for "at the front", or `0` for "at the back". The book
//! verifies the hinted neighborhood in O(1) and falls back to the
//! authoritative front-to-back scan whenever the hint is missing, stale,
//! or simply wrong, so a bad hint costs a linear scan but never a
//! mis-sorted list.

use crate::orderbook::list::{OrderList, SENTINEL};
use crate::orderbook::store::OrderStore;
use crate::types::{OrderId, RatioPrice, Side};

/// Position hint naming the front of the list.
pub const HINT_FRONT: OrderId = 1;

/// Position hint naming the back of the list.
pub const HINT_BACK: OrderId = SENTINEL;

/// Bid and ask lists over the shared order store.
#[derive(Debug, Clone, Default)]
pub struct Book {
    bids: OrderList,
    asks: OrderList,
}

impl Book {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// The list holding `side`.
    #[inline]
    pub fn list(&self, side: Side) -> &OrderList {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    #[inline]
    fn list_mut(&mut self, side: Side) -> &mut OrderList {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Best order of `side`, `SENTINEL` when the side is empty.
    #[inline]
    pub fn front(&self, side: Side) -> OrderId {
        self.list(side).front()
    }

    /// Worst order of `side`, `SENTINEL` when the side is empty.
    #[inline]
    pub fn back(&self, side: Side) -> OrderId {
        self.list(side).back()
    }

    /// Id after `id` on `side`.
    #[inline]
    pub fn next_of(&self, id: OrderId, side: Side) -> OrderId {
        self.list(side).next_of(id)
    }

    /// Id before `id` on `side`.
    #[inline]
    pub fn prev_of(&self, id: OrderId, side: Side) -> OrderId {
        self.list(side).prev_of(id)
    }

    /// Number of orders resting on `side`.
    #[inline]
    pub fn depth(&self, side: Side) -> usize {
        self.list(side).len()
    }

    /// Link `id` at the front of `side`.
    pub fn insert_first(&mut self, id: OrderId, side: Side) {
        self.list_mut(side).insert_first(id);
    }

    /// Link `id` before `pivot` on `side`; a sentinel pivot appends.
    pub fn insert_before(&mut self, id: OrderId, pivot: OrderId, side: Side) {
        self.list_mut(side).insert_before(id, pivot);
    }

    /// Unlink `id` from `side`.
    pub fn unlink(&mut self, id: OrderId, side: Side) {
        self.list_mut(side).unlink(id);
    }

    /// First resting order of `side` that `price` ranks strictly above,
    /// or `SENTINEL` to append at the back. Linear in the depth scanned.
    pub fn find_insert_position(
        &self,
        store: &OrderStore,
        side: Side,
        price: &RatioPrice,
    ) -> OrderId {
        let mut cursor = self.front(side);
        while cursor != SENTINEL {
            let resting = store
                .get(cursor)
                .expect("book references an unknown order");
            if price.ranks_above(&resting.price(), side) {
                return cursor;
            }
            cursor = self.next_of(cursor, side);
        }
        SENTINEL
    }

    /// Turn a caller-supplied position hint into a verified insert pivot.
    ///
    /// Strict comparisons keep equal-priced orders behind their elders.
    pub fn resolve_insert_position(
        &self,
        store: &OrderStore,
        side: Side,
        price: &RatioPrice,
        hint: OrderId,
    ) -> OrderId {
        match hint {
            HINT_FRONT => self.verify_front(store, side, price),
            HINT_BACK => self.verify_back(store, side, price),
            id => {
                if !self.list(side).contains(id) || !store.is_active(id) {
                    return self.find_insert_position(store, side, price);
                }
                if self.prev_of(id, side) == SENTINEL {
                    return self.verify_front(store, side, price);
                }
                self.verify_interior(store, side, price, id)
            }
        }
    }

    fn verify_front(&self, store: &OrderStore, side: Side, price: &RatioPrice) -> OrderId {
        let front = self.front(side);
        if front == SENTINEL {
            return SENTINEL;
        }
        let front_price = store
            .get(front)
            .expect("book references an unknown order")
            .price();
        if price.ranks_above(&front_price, side) {
            front
        } else {
            self.find_insert_position(store, side, price)
        }
    }

    fn verify_back(&self, store: &OrderStore, side: Side, price: &RatioPrice) -> OrderId {
        let back = self.back(side);
        if back == SENTINEL {
            return SENTINEL;
        }
        let back_price = store
            .get(back)
            .expect("book references an unknown order")
            .price();
        if back_price.ranks_at_least(price, side) {
            SENTINEL
        } else {
            self.find_insert_position(store, side, price)
        }
    }

    fn verify_interior(
        &self,
        store: &OrderStore,
        side: Side,
        price: &RatioPrice,
        hint: OrderId,
    ) -> OrderId {
        let hint_price = store
            .get(hint)
            .expect("book references an unknown order")
            .price();
        let prev = self.prev_of(hint, side);
        let prev_price = store
            .get(prev)
            .expect("book references an unknown order")
            .price();

        let below_prev = prev_price.ranks_at_least(price, side);
        let above_hint = price.ranks_above(&hint_price, side);
        if below_prev && above_hint {
            hint
        } else {
            self.find_insert_position(store, side, price)
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
