//! # pairbook
//!
//! Price-time-priority matching engine for a single pair of fungible
//! assets `A` and `B`, with integer ratio pricing, escrowed maker
//! inventory, and proportional maker/taker fees.
//!
//! ## Architecture
//!
//! - **Types**: tokens, ratio prices, resting-order records
//! - **OrderBook**: id-keyed store plus two sentinel-linked lists
//! - **Engine**: settlement, crossing walks, and the public admission
//!   surface, settling through a pluggable [`AssetLedger`]
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical inputs produce identical state and events
//! 2. **No Floating Point**: prices are `(ratio, bigger-token)` integer
//!    pairs scaled by 10^15; oversize products widen to 256 bits
//! 3. **Serialized Execution**: public operations run to completion under
//!    `&mut self`; each one commits or rolls back atomically
//!
//! ## Example
//!
//! ```
//! use pairbook::{Engine, InMemoryLedger, Side, Token};
//!
//! let escrow = 1000;
//! let mut engine = Engine::new(
//!     InMemoryLedger::new(escrow),
//!     InMemoryLedger::new(escrow),
//!     escrow,
//!     1,    // admin
//!     2,    // fee recipient
//! );
//!
//! // A maker sells 5 A for 1 B.
//! engine.ledger_mut(Token::A).credit(10, 5);
//! let id = engine.make_order(10, 5, 1, Side::Ask, 0).unwrap().unwrap();
//! assert_eq!(engine.best(Side::Ask), Some(id));
//!
//! // A taker buys the whole lot for 1 B.
//! engine.ledger_mut(Token::B).credit(20, 1);
//! engine.make_order(20, 1, 1, Side::Bid, 0).unwrap();
//! assert_eq!(engine.ledger(Token::A).balance_of(20), 5);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: tokens, ratio prices, resting orders
pub mod types;

/// Typed error taxonomy
pub mod error;

/// Observable event stream
pub mod events;

/// Asset-ledger seam and in-memory implementation
pub mod ledger;

/// Order store and the two-sided linked book
pub mod orderbook;

/// Settlement, matching, and the public admission surface
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{Engine, FEE_DENOMINATOR, MAX_FEE_BPS};
pub use error::{EngineError, InputError, LedgerError, StateError};
pub use events::EngineEvent;
pub use ledger::{AssetLedger, InMemoryLedger};
pub use orderbook::{Book, OrderList, OrderStore, HINT_BACK, HINT_FRONT, SENTINEL};
pub use types::{AccountId, Amount, OrderId, RatioPrice, RestingOrder, Side, Token, SCALE};
