//! Matching engine facade.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical call sequences produce identical state,
//!    events, and digests
//! 2. **No Floating Point**: all pricing is integer ratio arithmetic
//! 3. **Serialized Execution**: every public operation takes `&mut self`
//!    and runs to completion; there are no internal suspension points
//! 4. **Per-Call Atomicity**: a failing operation restores the engine,
//!    including the owned ledgers, to its pre-call state
//!
//! ## Public surface
//!
//! [`Engine::make_order`], [`Engine::take`],
//! [`Engine::immediate_or_cancel`], [`Engine::fill_or_kill`],
//! [`Engine::cancel`], and the fee setters. Observable events accumulate
//! per call and are collected with [`Engine::drain_events`].

pub mod matching;
pub mod settlement;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{EngineError, InputError, LedgerError, StateError};
use crate::events::EngineEvent;
use crate::ledger::AssetLedger;
use crate::orderbook::{Book, OrderStore, SENTINEL};
use crate::types::{AccountId, Amount, OrderId, RatioPrice, RestingOrder, Side, Token};

/// Basis-point denominator for fee arithmetic.
pub const FEE_DENOMINATOR: u128 = 10_000;

/// Upper bound on either fee parameter (50%).
pub const MAX_FEE_BPS: u32 = 5_000;

/// Price-time-priority matching engine over one `A`/`B` pair.
///
/// Generic over the ledger implementation; the two ledger instances are
/// owned so that the per-call checkpoint covers balances as well as book
/// state.
#[derive(Debug, Clone)]
pub struct Engine<L> {
    pub(crate) store: OrderStore,
    pub(crate) book: Book,
    pub(crate) ledger_a: L,
    pub(crate) ledger_b: L,
    pub(crate) escrow: AccountId,
    pub(crate) fee_recipient: AccountId,
    pub(crate) admin: AccountId,
    pub(crate) taker_fee_bps: u32,
    pub(crate) maker_fee_bps: u32,
    pub(crate) events: Vec<EngineEvent>,
}

impl<L> Engine<L> {
    /// Create an engine with zero fees.
    ///
    /// `escrow` is the account the ledgers debit on outbound transfers;
    /// `admin` may change fee parameters; `fee_recipient` collects fees.
    pub fn new(
        ledger_a: L,
        ledger_b: L,
        escrow: AccountId,
        admin: AccountId,
        fee_recipient: AccountId,
    ) -> Self {
        Self {
            store: OrderStore::new(),
            book: Book::new(),
            ledger_a,
            ledger_b,
            escrow,
            fee_recipient,
            admin,
            taker_fee_bps: 0,
            maker_fee_bps: 0,
            events: Vec::new(),
        }
    }

    /// Ledger instance holding `token` balances.
    pub fn ledger(&self, token: Token) -> &L {
        match token {
            Token::A => &self.ledger_a,
            Token::B => &self.ledger_b,
        }
    }

    /// Mutable access to the ledger holding `token` balances, for host
    /// setup such as funding test accounts.
    pub fn ledger_mut(&mut self, token: Token) -> &mut L {
        match token {
            Token::A => &mut self.ledger_a,
            Token::B => &mut self.ledger_b,
        }
    }

    /// Best resting order of `side`, if any.
    pub fn best(&self, side: Side) -> Option<OrderId> {
        match self.book.front(side) {
            SENTINEL => None,
            id => Some(id),
        }
    }

    /// Number of orders resting on `side`.
    #[inline]
    pub fn depth(&self, side: Side) -> usize {
        self.book.depth(side)
    }

    /// Resting order ids of `side`, best first.
    pub fn side_ids(&self, side: Side) -> Vec<OrderId> {
        self.book.list(side).iter().collect()
    }

    /// Look up a resting order.
    #[inline]
    pub fn order(&self, id: OrderId) -> Option<&RestingOrder> {
        self.store.get(id)
    }

    /// Current taker fee in basis points.
    #[inline]
    pub fn taker_fee_bps(&self) -> u32 {
        self.taker_fee_bps
    }

    /// Current maker fee in basis points.
    #[inline]
    pub fn maker_fee_bps(&self) -> u32 {
        self.maker_fee_bps
    }

    /// Account the ledgers debit for outbound escrow transfers.
    #[inline]
    pub fn escrow_account(&self) -> AccountId {
        self.escrow
    }

    /// Events emitted since the last drain.
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Take the accumulated event stream.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// SHA-256 commitment to the engine state: the SSZ encoding of every
    /// resting order in book order on both sides, the id allocator, and
    /// the fee parameters.
    pub fn state_digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for side in [Side::Bid, Side::Ask] {
            for id in self.book.list(side).iter() {
                let order = self
                    .store
                    .get(id)
                    .expect("book references an unknown order");
                let bytes =
                    ssz_rs::serialize(order).expect("fixed-size record serialization cannot fail");
                hasher.update(&bytes);
            }
        }
        hasher.update(self.store.peek_next_id().to_le_bytes());
        hasher.update(self.taker_fee_bps.to_le_bytes());
        hasher.update(self.maker_fee_bps.to_le_bytes());

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }

    /// Hex rendering of [`state_digest`](Self::state_digest).
    pub fn state_digest_hex(&self) -> String {
        hex::encode(self.state_digest())
    }
}

impl<L: AssetLedger + Clone> Engine<L> {
    /// Run `op` against the engine, restoring the pre-call state on error.
    fn transactional<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let checkpoint = self.clone();
        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                *self = checkpoint;
                Err(err)
            }
        }
    }

    /// Submit a limit order selling one side of the pair.
    ///
    /// The order first takes any crossing liquidity; a positive remainder
    /// is escrowed and rested at the position named by `position_hint`
    /// (an order id, 1 for the front, 0 for the back), verified and
    /// repaired as needed. Returns the resting order id, or `None` when
    /// the order was completely filled as a taker.
    pub fn make_order(
        &mut self,
        owner: AccountId,
        a_amt: Amount,
        b_amt: Amount,
        side: Side,
        position_hint: OrderId,
    ) -> Result<Option<OrderId>, EngineError> {
        self.transactional(|eng| eng.make_order_inner(owner, a_amt, b_amt, side, position_hint))
    }

    /// Spend up to `amt` of `spending` against the opposite side of the
    /// book with no price limit. Returns the unspent remainder.
    pub fn take(
        &mut self,
        taker: AccountId,
        amt: Amount,
        spending: Token,
    ) -> Result<Amount, EngineError> {
        self.transactional(|eng| {
            if amt == 0 {
                return Err(InputError::ZeroTokenAmount.into());
            }
            let remaining = eng.take_walk(taker, amt, spending)?;
            eng.events.push(EngineEvent::TakerOrder {
                remaining_amt: remaining,
                spending,
            });
            debug!(remaining, ?spending, "take walk finished");
            Ok(remaining)
        })
    }

    /// Match like [`make_order`](Self::make_order) but never rest the
    /// remainder. Returns the `(a, b)` amounts consumed.
    pub fn immediate_or_cancel(
        &mut self,
        taker: AccountId,
        a_amt: Amount,
        b_amt: Amount,
        side: Side,
    ) -> Result<(Amount, Amount), EngineError> {
        self.transactional(|eng| {
            let (a_used, b_used) = eng.match_only(taker, a_amt, b_amt, side)?;
            eng.events.push(EngineEvent::IoCOrder {
                a_used,
                b_used,
                selling: side.selling_token(),
            });
            Ok((a_used, b_used))
        })
    }

    /// Match like [`immediate_or_cancel`](Self::immediate_or_cancel) but
    /// abort, undoing every fill, unless the selling side is completely
    /// consumed.
    pub fn fill_or_kill(
        &mut self,
        taker: AccountId,
        a_amt: Amount,
        b_amt: Amount,
        side: Side,
    ) -> Result<(Amount, Amount), EngineError> {
        self.transactional(|eng| {
            let (a_used, b_used) = eng.match_only(taker, a_amt, b_amt, side)?;
            let selling_used = match side {
                Side::Ask => a_used,
                Side::Bid => b_used,
            };
            let selling_amt = match side {
                Side::Ask => a_amt,
                Side::Bid => b_amt,
            };
            if selling_used < selling_amt {
                return Err(EngineError::FillOrKillNotFilled);
            }
            eng.events.push(EngineEvent::FoKOrder {
                a_used,
                b_used,
                selling: side.selling_token(),
            });
            Ok((a_used, b_used))
        })
    }

    /// Cancel a resting order, returning its escrowed remainder to the
    /// owner. Only the owner may cancel, and only once.
    pub fn cancel(&mut self, caller: AccountId, id: OrderId) -> Result<(), EngineError> {
        self.transactional(|eng| eng.cancel_inner(caller, id))
    }

    /// Set the taker fee. Administrator only; capped at 5000 bps.
    pub fn set_taker_fee(&mut self, caller: AccountId, bps: u32) -> Result<(), EngineError> {
        self.check_fee_update(caller, bps)?;
        self.taker_fee_bps = bps;
        Ok(())
    }

    /// Set the maker fee. Administrator only; capped at 5000 bps.
    pub fn set_maker_fee(&mut self, caller: AccountId, bps: u32) -> Result<(), EngineError> {
        self.check_fee_update(caller, bps)?;
        self.maker_fee_bps = bps;
        Ok(())
    }

    fn check_fee_update(&self, caller: AccountId, bps: u32) -> Result<(), EngineError> {
        if caller != self.admin {
            return Err(StateError::NotAdmin.into());
        }
        if bps > MAX_FEE_BPS {
            return Err(InputError::InvalidFeeValue { bps }.into());
        }
        Ok(())
    }

    fn make_order_inner(
        &mut self,
        owner: AccountId,
        a_amt: Amount,
        b_amt: Amount,
        side: Side,
        position_hint: OrderId,
    ) -> Result<Option<OrderId>, EngineError> {
        if a_amt == 0 || b_amt == 0 {
            return Err(InputError::ZeroTokenAmount.into());
        }
        let price = RatioPrice::from_amounts(a_amt, b_amt).ok_or(EngineError::AmountOverflow)?;

        let (a_rem, b_rem) = self.match_crossing(owner, price, side, a_amt, b_amt)?;
        let selling_rem = match side {
            Side::Ask => a_rem,
            Side::Bid => b_rem,
        };
        if selling_rem == 0 {
            debug!(owner, ?side, "order fully filled as taker");
            return Ok(None);
        }

        // Rebuild the bought side from the original ratio; matching may
        // have truncated the tracked remainder by one unit.
        let selling = side.selling_token();
        let buying_rem = price
            .counter_amount(selling, selling_rem)
            .ok_or(EngineError::AmountOverflow)?;
        if buying_rem == 0 {
            // Sub-unit remainder, nothing worth resting.
            debug!(owner, ?side, selling_rem, "dust remainder dropped");
            return Ok(None);
        }

        let id = self.store.allocate_id();
        let escrow = self.escrow;
        if !self
            .ledger_mut(selling)
            .transfer_from(owner, escrow, selling_rem)
        {
            return Err(LedgerError::TransferToEscrowError.into());
        }

        let mut order = RestingOrder::new(id, owner, selling, selling_rem, buying_rem, price);
        order.active = true;
        self.store.insert(order);

        let pivot = self
            .book
            .resolve_insert_position(&self.store, side, &price, position_hint);
        let front_before = self.book.front(side);
        self.book.insert_before(id, pivot, side);

        let position = if pivot == SENTINEL {
            0
        } else if pivot == front_before {
            1
        } else {
            pivot
        };

        self.events.push(EngineEvent::OfferCreate {
            id,
            owner,
            selling,
            selling_amt: selling_rem,
            buying_amt: buying_rem,
        });
        self.events
            .push(EngineEvent::MakerOrderCreated { id, position });
        debug!(id, owner, ?side, rate = %price.display_rate(), "maker order rested");

        Ok(Some(id))
    }

    /// Shared validate-and-match path of the two non-resting order kinds.
    fn match_only(
        &mut self,
        taker: AccountId,
        a_amt: Amount,
        b_amt: Amount,
        side: Side,
    ) -> Result<(Amount, Amount), EngineError> {
        if a_amt == 0 || b_amt == 0 {
            return Err(InputError::ZeroTokenAmount.into());
        }
        let price = RatioPrice::from_amounts(a_amt, b_amt).ok_or(EngineError::AmountOverflow)?;
        let (a_rem, b_rem) = self.match_crossing(taker, price, side, a_amt, b_amt)?;
        Ok((a_amt - a_rem, b_amt - b_rem))
    }

    fn cancel_inner(&mut self, caller: AccountId, id: OrderId) -> Result<(), EngineError> {
        let record = match self.store.get(id) {
            Some(r) if r.active => r.clone(),
            _ => return Err(StateError::InactiveOrder(id).into()),
        };
        if record.owner != caller {
            return Err(StateError::NonOwnerCantCancelOrder(id).into());
        }

        // Owner captured above, before the record disappears.
        let side = record.side();
        if !self
            .ledger_mut(record.selling())
            .transfer(record.owner, record.selling_amt)
        {
            return Err(LedgerError::EscrowToBuyerError.into());
        }

        self.store.set_active(id, false);
        self.book.unlink(id, side);
        self.store.remove(id);

        self.events.push(EngineEvent::OrderCancelled {
            id,
            owner: record.owner,
        });
        self.events.push(EngineEvent::DeleteOffer { id });
        debug!(id, owner = record.owner, "order cancelled");

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
