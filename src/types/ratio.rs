//! Ratio-based price representation.
//!
//! ## Encoding
//!
//! A price is the pair `(ratio, bigger)` where `ratio = max(a, b) * SCALE /
//! min(a, b)` for the two amounts of an order and `bigger` names the token
//! with the larger amount (ties resolve to `B`). The pair encodes the
//! exchange rate of the order without fractions and without caring which
//! token is being sold: "5 A for 1 B" and "1 B for 5 A" carry the same
//! `(5 * SCALE, A)` price.
//!
//! ## Why not a plain quotient?
//!
//! A single scaled quotient would conflate "5 A per B" with "5 B per A".
//! Carrying the bigger token disambiguates the direction and keeps every
//! comparison a pure integer comparison once both pairs are normalized.
//!
//! ## Arithmetic
//!
//! Amounts are `u128`. Any product that can exceed 128 bits is widened to
//! `U256` and narrowed back with an explicit overflow check, so no step of
//! the pricing math ever rounds through floating point.

use primitive_types::U256;
use rust_decimal::prelude::*;

use crate::types::token::{Side, Token};

/// Scaling factor for ratio arithmetic: 10^15.
pub const SCALE: u128 = 1_000_000_000_000_000;

/// Amount of either token, in its smallest unit.
pub type Amount = u128;

/// Multiply then divide in 256-bit space, truncating toward zero.
///
/// Returns `None` when the divisor is zero or the result does not fit in
/// 128 bits.
pub(crate) fn mul_div(a: u128, b: u128, divisor: u128) -> Option<u128> {
    if divisor == 0 {
        return None;
    }
    let wide = U256::from(a) * U256::from(b) / U256::from(divisor);
    if wide > U256::from(u128::MAX) {
        None
    } else {
        Some(wide.low_u128())
    }
}

// ============================================================================
// RatioPrice
// ============================================================================

/// Direction-agnostic price of an order over the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioPrice {
    /// `max * SCALE / min` over the order's two amounts; always >= SCALE
    pub ratio: u128,
    /// The token whose amount is the larger of the two
    pub bigger: Token,
}

impl RatioPrice {
    /// Compute the price of an order from its `A` and `B` amounts.
    ///
    /// Both amounts must be positive. Returns `None` when the scaled ratio
    /// does not fit in 128 bits.
    ///
    /// ```
    /// use pairbook::types::{RatioPrice, Token, SCALE};
    ///
    /// let price = RatioPrice::from_amounts(5, 1).unwrap();
    /// assert_eq!(price.ratio, 5 * SCALE);
    /// assert_eq!(price.bigger, Token::A);
    ///
    /// // Equal amounts tie to B.
    /// let par = RatioPrice::from_amounts(7, 7).unwrap();
    /// assert_eq!(par.ratio, SCALE);
    /// assert_eq!(par.bigger, Token::B);
    /// ```
    pub fn from_amounts(a_amt: Amount, b_amt: Amount) -> Option<Self> {
        debug_assert!(a_amt > 0 && b_amt > 0);
        let (bigger, max, min) = if a_amt > b_amt {
            (Token::A, a_amt, b_amt)
        } else {
            (Token::B, b_amt, a_amt)
        };
        let ratio = mul_div(max, SCALE, min)?;
        Some(Self { ratio, bigger })
    }

    /// Convert an amount of `from` into the other token at this price,
    /// truncating toward zero.
    pub fn convert(&self, from: Token, amount: Amount) -> Option<Amount> {
        if from == self.bigger {
            mul_div(amount, SCALE, self.ratio)
        } else {
            mul_div(amount, self.ratio, SCALE)
        }
    }

    /// The exact counter-amount owed for selling `selling_amt` of `selling`
    /// at this price. Used to rebuild the bought side of a resting order
    /// after matching has truncated it.
    #[inline]
    pub fn counter_amount(&self, selling: Token, selling_amt: Amount) -> Option<Amount> {
        self.convert(selling, selling_amt)
    }

    /// Strict "ranks above" under the ordering of the given book side.
    ///
    /// Ask book: between two `bigger = A` prices the smaller ratio ranks
    /// first, between two `bigger = B` prices the larger ratio ranks first,
    /// and a `bigger = A` price ranks above any `bigger = B` price. The bid
    /// book is the exact dual (equivalently, the same rules with the two
    /// tokens swapped). Both orderings are total and transitive, and an
    /// incoming order crosses exactly the resting orders that rank at least
    /// as high as it does, so the crossing set is always a front prefix of
    /// the opposite list.
    pub fn ranks_above(&self, other: &RatioPrice, side: Side) -> bool {
        let ahead_as_ask = match (self.bigger, other.bigger) {
            (Token::A, Token::A) => self.ratio < other.ratio,
            (Token::B, Token::B) => self.ratio > other.ratio,
            (Token::A, Token::B) => true,
            (Token::B, Token::A) => false,
        };
        match side {
            Side::Ask => ahead_as_ask,
            // Equal prices rank above on neither side.
            Side::Bid => !ahead_as_ask && self != other,
        }
    }

    /// Non-strict variant of [`ranks_above`](Self::ranks_above).
    #[inline]
    pub fn ranks_at_least(&self, other: &RatioPrice, side: Side) -> bool {
        self == other || self.ranks_above(other, side)
    }

    /// Render the ratio as a decimal string (units of the bigger token per
    /// one unit of the smaller), falling back to the raw scaled integer for
    /// values beyond decimal range.
    pub fn display_rate(&self) -> String {
        match Decimal::from_u128(self.ratio) {
            Some(d) => (d / Decimal::from(SCALE as u64)).normalize().to_string(),
            None => format!("{}e-15", self.ratio),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
