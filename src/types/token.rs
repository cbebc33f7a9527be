//! Token and book-side identifiers for the traded pair.
//!
//! The engine trades exactly one pair of fungible assets, named `A` and `B`.
//! Every order sells one token of the pair and buys the other, so a book
//! side is fully determined by the token being sold:
//!
//! - **Ask**: sells `A`, buys `B`
//! - **Bid**: sells `B`, buys `A`
//!
//! Both enums carry `u8` conversions so records can be stored with
//! deterministic fixed-size encodings and so untyped transports can submit
//! the sold side as a raw flag.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

// ============================================================================
// Token
// ============================================================================

/// One of the two assets of the traded pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Token {
    /// The base asset of the pair
    #[default]
    A,
    /// The quote asset of the pair
    B,
}

impl Token {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Token::A => 0,
            Token::B => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Token::A),
            1 => Some(Token::B),
            _ => None,
        }
    }

    /// Returns the other token of the pair
    pub fn other(self) -> Self {
        match self {
            Token::A => Token::B,
            Token::B => Token::A,
        }
    }
}

// ============================================================================
// Side
// ============================================================================

/// Book side, named after the token the resting order sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Sells `B`, buys `A`
    Bid,
    /// Sells `A`, buys `B`
    Ask,
}

impl Side {
    /// The token an order on this side sells (and escrows).
    #[inline]
    pub fn selling_token(self) -> Token {
        match self {
            Side::Ask => Token::A,
            Side::Bid => Token::B,
        }
    }

    /// The token an order on this side buys.
    #[inline]
    pub fn buying_token(self) -> Token {
        self.selling_token().other()
    }

    /// The side whose orders sell `token`.
    #[inline]
    pub fn for_selling(token: Token) -> Self {
        match token {
            Token::A => Side::Ask,
            Token::B => Side::Bid,
        }
    }

    /// Returns the opposite side
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Interpret a raw "selling A" flag from an untyped caller.
    ///
    /// `1` sells `A` (ask), `0` sells `B` (bid); anything else is rejected.
    pub fn from_flag(value: u8) -> Result<Self, InputError> {
        match value {
            0 => Ok(Side::Bid),
            1 => Ok(Side::Ask),
            other => Err(InputError::SellingTokenNotBool { value: other }),
        }
    }

    /// The raw "selling A" flag for this side.
    pub fn as_flag(self) -> u8 {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_conversion() {
        assert_eq!(Token::A.to_u8(), 0);
        assert_eq!(Token::B.to_u8(), 1);
        assert_eq!(Token::from_u8(0), Some(Token::A));
        assert_eq!(Token::from_u8(1), Some(Token::B));
        assert_eq!(Token::from_u8(2), None);
    }

    #[test]
    fn test_token_other() {
        assert_eq!(Token::A.other(), Token::B);
        assert_eq!(Token::B.other(), Token::A);
    }

    #[test]
    fn test_side_tokens() {
        assert_eq!(Side::Ask.selling_token(), Token::A);
        assert_eq!(Side::Ask.buying_token(), Token::B);
        assert_eq!(Side::Bid.selling_token(), Token::B);
        assert_eq!(Side::Bid.buying_token(), Token::A);
    }

    #[test]
    fn test_side_for_selling() {
        assert_eq!(Side::for_selling(Token::A), Side::Ask);
        assert_eq!(Side::for_selling(Token::B), Side::Bid);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
    }

    #[test]
    fn test_side_flag_roundtrip() {
        assert_eq!(Side::from_flag(1), Ok(Side::Ask));
        assert_eq!(Side::from_flag(0), Ok(Side::Bid));
        assert_eq!(Side::Ask.as_flag(), 1);
        assert_eq!(Side::Bid.as_flag(), 0);
        assert_eq!(
            Side::from_flag(2),
            Err(InputError::SellingTokenNotBool { value: 2 })
        );
    }
}
