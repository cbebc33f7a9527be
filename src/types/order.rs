//! Resting maker-order record.
//!
//! ## SSZ Serialization
//!
//! The record derives `SimpleSerialize` so the engine can fold a
//! deterministic byte encoding of every resting order into its state
//! digest. Token fields are stored as raw `u8` values (enums are not SSZ
//! containers) with typed accessors on top.
//!
//! ## Invariants
//!
//! While a record is active, `selling_amt > 0`, `buying_amt > 0`, and the
//! price pair `(ratio, bigger)` binds the two amounts: the smaller side
//! times the ratio equals the bigger side times `SCALE`, up to the floor
//! division performed when the record was built.

use ssz_rs::prelude::*;

use crate::types::ratio::{Amount, RatioPrice};
use crate::types::token::{Side, Token};

/// Resting-order identifier. Ids 0 and 1 are reserved sentinels; real
/// orders are numbered densely from 2.
pub type OrderId = u64;

/// Opaque account identifier used by the ledger seam.
pub type AccountId = u64;

/// A maker order resting on the book.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct RestingOrder {
    /// Unique order identifier (assigned by the store)
    pub id: u64,

    /// Owner account; receives proceeds and may cancel
    pub owner: u64,

    /// Token being sold, as u8 (0 = A, 1 = B)
    pub selling_raw: u8,

    /// Remaining amount of the sold token, held in escrow
    pub selling_amt: u128,

    /// Remaining amount of the bought token still expected
    pub buying_amt: u128,

    /// Scaled price ratio, `max * SCALE / min` at creation
    pub ratio: u128,

    /// Token with the numerically larger amount, as u8 (0 = A, 1 = B)
    pub bigger_raw: u8,

    /// True while the order is linked into a book
    pub active: bool,
}

impl RestingOrder {
    /// Build a record from its typed parts. The record starts inactive;
    /// the book flips the flag when the order is linked.
    pub fn new(
        id: OrderId,
        owner: AccountId,
        selling: Token,
        selling_amt: Amount,
        buying_amt: Amount,
        price: RatioPrice,
    ) -> Self {
        Self {
            id,
            owner,
            selling_raw: selling.to_u8(),
            selling_amt,
            buying_amt,
            ratio: price.ratio,
            bigger_raw: price.bigger.to_u8(),
            active: false,
        }
    }

    /// Token this order sells
    #[inline]
    pub fn selling(&self) -> Token {
        Token::from_u8(self.selling_raw).unwrap_or(Token::A)
    }

    /// Token this order buys
    #[inline]
    pub fn buying(&self) -> Token {
        self.selling().other()
    }

    /// Book side this order rests on
    #[inline]
    pub fn side(&self) -> Side {
        Side::for_selling(self.selling())
    }

    /// The order's price pair
    #[inline]
    pub fn price(&self) -> RatioPrice {
        RatioPrice {
            ratio: self.ratio,
            bigger: Token::from_u8(self.bigger_raw).unwrap_or(Token::B),
        }
    }

    /// Consume `quantity` of the sold token against `cost` of the bought
    /// token. Callers bound both values beforehand.
    #[inline]
    pub fn fill(&mut self, quantity: Amount, cost: Amount) {
        self.selling_amt = self.selling_amt.saturating_sub(quantity);
        self.buying_amt = self.buying_amt.saturating_sub(cost);
    }

    /// True once the escrowed inventory is exhausted
    #[inline]
    pub fn is_spent(&self) -> bool {
        self.selling_amt == 0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
