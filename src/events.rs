//! Observable events emitted by the public operations.
//!
//! Events accumulate in the engine's buffer during a call and are only
//! observable once the call has succeeded; a rolled-back call leaves no
//! events behind. Per settled fill the engine emits `OfferTake`, then
//! `OfferUpdate` or `DeleteOffer`, then the two fee events.

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Amount, OrderId, Token};

/// Event stream entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A maker order was recorded and escrowed
    OfferCreate {
        id: OrderId,
        owner: AccountId,
        selling: Token,
        selling_amt: Amount,
        buying_amt: Amount,
    },

    /// A fill consumed part of a resting order's inventory
    OfferTake {
        id: OrderId,
        taker: AccountId,
        quantity: Amount,
        cost: Amount,
    },

    /// Remaining amounts of a partially filled order
    OfferUpdate {
        id: OrderId,
        selling_amt: Amount,
        buying_amt: Amount,
    },

    /// An order left the book (fully filled or cancelled)
    DeleteOffer { id: OrderId },

    /// Taker-side fee collected, in the pay token of the fill
    TakerFeePaid {
        payer: AccountId,
        token: Token,
        amount: Amount,
    },

    /// Maker-side fee withheld from the maker's proceeds
    MakerFeePaid {
        maker: AccountId,
        token: Token,
        amount: Amount,
    },

    /// A maker order rested on the book. `position` is the id of the order
    /// it was inserted in front of, 1 when that order was the front of the
    /// list, 0 when appended at the back.
    MakerOrderCreated { id: OrderId, position: OrderId },

    /// A take walk finished; `remaining_amt` of the spending token was not
    /// consumed by the book
    TakerOrder {
        remaining_amt: Amount,
        spending: Token,
    },

    /// Amounts consumed by an immediate-or-cancel order
    IoCOrder {
        a_used: Amount,
        b_used: Amount,
        selling: Token,
    },

    /// Amounts consumed by a fill-or-kill order
    FoKOrder {
        a_used: Amount,
        b_used: Amount,
        selling: Token,
    },

    /// An order was cancelled by its owner
    OrderCancelled { id: OrderId, owner: AccountId },
}
