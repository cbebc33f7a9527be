//! Core data types for the pairbook engine.
//!
//! All amounts are `u128` in the smallest unit of their token; all prices
//! are integer `(ratio, bigger)` pairs scaled by 10^15.
//!
//! ## Types
//!
//! - [`Token`]: one of the two assets of the pair
//! - [`Side`]: book side, named after the sold token (bid sells B, ask sells A)
//! - [`RatioPrice`]: direction-agnostic integer price
//! - [`RestingOrder`]: a maker order resting on the book

mod order;
pub mod ratio;
mod token;

// Re-export all types at module level
pub use order::{AccountId, OrderId, RestingOrder};
pub use ratio::{Amount, RatioPrice, SCALE};
pub use token::{Side, Token};
