//! Fill settlement against a single resting order.
//!
//! One settlement moves value three ways in the fill's pay token and one
//! way in its receive token:
//!
//! ```text
//! taker ──(taker fee + maker fee)──> fee recipient
//! taker ──(cost − maker fee)───────> maker owner
//! escrow ──(quantity)──────────────> taker
//! ```
//!
//! The resting order's amounts shrink by the quantity and its exact
//! proportional cost; an emptied order is deactivated here and unlinked by
//! the caller, keeping book topology out of the accounting path.

use tracing::trace;

use crate::error::{EngineError, InputError, LedgerError, StateError};
use crate::events::EngineEvent;
use crate::ledger::AssetLedger;
use crate::types::ratio::mul_div;
use crate::types::{AccountId, Amount, OrderId};

use super::{Engine, FEE_DENOMINATOR};

/// Result of settling one fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FillOutcome {
    /// Pay-token amount the taker spent (before fees)
    pub cost: Amount,
    /// True when the resting order was emptied and deactivated
    pub retired: bool,
}

impl<L: AssetLedger> Engine<L> {
    /// Settle the purchase of `quantity` units of order `rid`'s selling
    /// token by `taker`.
    ///
    /// Requires `0 < quantity <= selling_amt` and an active order. The
    /// caller unlinks the order when the outcome reports it retired.
    pub(crate) fn execute_buy(
        &mut self,
        rid: OrderId,
        quantity: Amount,
        taker: AccountId,
    ) -> Result<FillOutcome, EngineError> {
        if quantity == 0 {
            return Err(InputError::ZeroBuyQuantity.into());
        }
        let record = match self.store.get(rid) {
            Some(r) if r.active => r.clone(),
            _ => return Err(StateError::InactiveOrder(rid).into()),
        };
        if quantity > record.selling_amt {
            return Err(InputError::QuantityExceedsOrderAmount {
                requested: quantity,
                available: record.selling_amt,
            }
            .into());
        }

        let cost = mul_div(record.buying_amt, quantity, record.selling_amt)
            .ok_or(EngineError::AmountOverflow)?;
        let taker_fee = mul_div(cost, self.taker_fee_bps as u128, FEE_DENOMINATOR)
            .ok_or(EngineError::AmountOverflow)?;
        let maker_fee = mul_div(cost, self.maker_fee_bps as u128, FEE_DENOMINATOR)
            .ok_or(EngineError::AmountOverflow)?;

        let pay = record.buying();
        let receive = record.selling();
        let fee_recipient = self.fee_recipient;

        if !self
            .ledger_mut(pay)
            .transfer_from(taker, fee_recipient, taker_fee + maker_fee)
        {
            return Err(LedgerError::LackingFundsForFees.into());
        }
        if !self
            .ledger_mut(pay)
            .transfer_from(taker, record.owner, cost - maker_fee)
        {
            return Err(LedgerError::LackingFundsForTransaction.into());
        }
        if !self.ledger_mut(receive).transfer(taker, quantity) {
            return Err(LedgerError::EscrowToBuyerError.into());
        }

        let order = self
            .store
            .get_mut(rid)
            .expect("settled order vanished from the store");
        order.fill(quantity, cost);
        let selling_left = order.selling_amt;
        let buying_left = order.buying_amt;
        let retired = order.is_spent();

        self.events.push(EngineEvent::OfferTake {
            id: rid,
            taker,
            quantity,
            cost,
        });
        if retired {
            self.store.set_active(rid, false);
            self.events.push(EngineEvent::DeleteOffer { id: rid });
        } else {
            self.events.push(EngineEvent::OfferUpdate {
                id: rid,
                selling_amt: selling_left,
                buying_amt: buying_left,
            });
        }
        self.events.push(EngineEvent::TakerFeePaid {
            payer: taker,
            token: pay,
            amount: taker_fee,
        });
        self.events.push(EngineEvent::MakerFeePaid {
            maker: record.owner,
            token: pay,
            amount: maker_fee,
        });
        trace!(rid, taker, quantity, cost, retired, "fill settled");

        Ok(FillOutcome { cost, retired })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::ledger::InMemoryLedger;
    use crate::types::{Side, Token};

    const ESCROW: AccountId = 1000;
    const ADMIN: AccountId = 1001;
    const FEES: AccountId = 1002;
    const MAKER: AccountId = 10;
    const TAKER: AccountId = 20;

    /// Engine with one resting ask: 100 A for 10 B.
    fn engine_with_ask() -> (Engine<InMemoryLedger>, OrderId) {
        let mut eng = Engine::new(
            InMemoryLedger::new(ESCROW),
            InMemoryLedger::new(ESCROW),
            ESCROW,
            ADMIN,
            FEES,
        );
        eng.ledger_mut(Token::A).credit(MAKER, 100);
        eng.ledger_mut(Token::B).credit(TAKER, 1_000);
        let id = eng.make_order(MAKER, 100, 10, Side::Ask, 0).unwrap().unwrap();
        eng.drain_events();
        (eng, id)
    }

    #[test]
    fn test_partial_fill_accounting() {
        let (mut eng, id) = engine_with_ask();

        let outcome = eng.execute_buy(id, 40, TAKER).unwrap();
        assert_eq!(outcome, FillOutcome {
            cost: 4,
            retired: false
        });

        let order = eng.order(id).unwrap();
        assert_eq!(order.selling_amt, 60);
        assert_eq!(order.buying_amt, 6);
        assert!(order.active);

        assert_eq!(eng.ledger(Token::A).balance_of(TAKER), 40);
        assert_eq!(eng.ledger(Token::A).balance_of(ESCROW), 60);
        assert_eq!(eng.ledger(Token::B).balance_of(MAKER), 4);
        assert_eq!(eng.ledger(Token::B).balance_of(TAKER), 996);
    }

    #[test]
    fn test_full_fill_retires() {
        let (mut eng, id) = engine_with_ask();

        let outcome = eng.execute_buy(id, 100, TAKER).unwrap();
        assert_eq!(outcome, FillOutcome {
            cost: 10,
            retired: true
        });
        assert!(!eng.store.is_active(id));

        let events = eng.drain_events();
        assert_eq!(
            events[0],
            EngineEvent::OfferTake {
                id,
                taker: TAKER,
                quantity: 100,
                cost: 10
            }
        );
        assert_eq!(events[1], EngineEvent::DeleteOffer { id });
        assert!(matches!(events[2], EngineEvent::TakerFeePaid { .. }));
        assert!(matches!(events[3], EngineEvent::MakerFeePaid { .. }));
    }

    #[test]
    fn test_fees_split_between_recipient_and_maker() {
        let (mut eng, id) = engine_with_ask();
        eng.set_taker_fee(ADMIN, 1_000).unwrap(); // 10%
        eng.set_maker_fee(ADMIN, 500).unwrap(); // 5%

        eng.execute_buy(id, 100, TAKER).unwrap();

        // cost = 10: taker fee 1, maker fee 0 (floor of 0.5).
        assert_eq!(eng.ledger(Token::B).balance_of(FEES), 1);
        assert_eq!(eng.ledger(Token::B).balance_of(MAKER), 10);
        assert_eq!(eng.ledger(Token::B).balance_of(TAKER), 989);
    }

    #[test]
    fn test_maker_fee_withheld_from_proceeds() {
        let (mut eng, id) = engine_with_ask();
        eng.set_maker_fee(ADMIN, 5_000).unwrap(); // 50%

        eng.execute_buy(id, 100, TAKER).unwrap();

        // cost = 10, maker fee 5: recipient gets 5, maker gets 5.
        assert_eq!(eng.ledger(Token::B).balance_of(FEES), 5);
        assert_eq!(eng.ledger(Token::B).balance_of(MAKER), 5);
        assert_eq!(eng.ledger(Token::B).balance_of(TAKER), 990);
    }

    #[test]
    fn test_input_validation() {
        let (mut eng, id) = engine_with_ask();

        assert_eq!(
            eng.execute_buy(id, 0, TAKER),
            Err(InputError::ZeroBuyQuantity.into())
        );
        assert_eq!(
            eng.execute_buy(id, 101, TAKER),
            Err(InputError::QuantityExceedsOrderAmount {
                requested: 101,
                available: 100
            }
            .into())
        );
        assert_eq!(
            eng.execute_buy(999, 1, TAKER),
            Err(StateError::InactiveOrder(999).into())
        );
    }

    #[test]
    fn test_underfunded_taker_fails_cleanly() {
        let (mut eng, id) = engine_with_ask();
        // Drain the taker's pay balance.
        let balance = eng.ledger(Token::B).balance_of(TAKER);
        eng.ledger_mut(Token::B)
            .transfer_from(TAKER, 999, balance);

        assert_eq!(
            eng.execute_buy(id, 100, TAKER),
            Err(LedgerError::LackingFundsForTransaction.into())
        );
    }
}
