//! Crossing walks over the opposite book side.
//!
//! Both walks consume the front of the opposite list, settling one fill
//! per step, and stop when the incoming intent is exhausted, the front no
//! longer crosses, or the next fill would price below one unit of the pay
//! token. Fills always execute at the resting order's ratio; an incoming
//! limit only decides *whether* the front crosses, never the rate paid.

use tracing::trace;

use crate::error::EngineError;
use crate::ledger::AssetLedger;
use crate::orderbook::SENTINEL;
use crate::types::ratio::mul_div;
use crate::types::{AccountId, Amount, RatioPrice, Side, Token};

use super::Engine;

impl<L: AssetLedger> Engine<L> {
    /// Match an incoming order against every crossing resting order.
    ///
    /// Returns the `(a, b)` amounts still unmatched. The remainder on the
    /// bought side may lag the exact ratio by one unit from floor
    /// division; admission rebuilds it before resting the order.
    pub(crate) fn match_crossing(
        &mut self,
        taker: AccountId,
        price: RatioPrice,
        side: Side,
        a_amt: Amount,
        b_amt: Amount,
    ) -> Result<(Amount, Amount), EngineError> {
        let book_side = side.opposite();
        let mut a_rem = a_amt;
        let mut b_rem = b_amt;

        loop {
            let selling_rem = match side {
                Side::Ask => a_rem,
                Side::Bid => b_rem,
            };
            if selling_rem == 0 {
                break;
            }
            let front = self.book.front(book_side);
            if front == SENTINEL {
                break;
            }
            let resting = self
                .store
                .get(front)
                .expect("book references an unknown order")
                .clone();
            if !resting.price().ranks_at_least(&price, book_side) {
                break;
            }

            // Most the incoming order can absorb, in units of the resting
            // order's selling token, valued at the resting ratio.
            let want = resting
                .price()
                .convert(resting.buying(), selling_rem)
                .ok_or(EngineError::AmountOverflow)?;
            let quantity = want.min(resting.selling_amt);
            if quantity == 0 {
                break;
            }
            if mul_div(resting.buying_amt, quantity, resting.selling_amt)
                .ok_or(EngineError::AmountOverflow)?
                == 0
            {
                break;
            }

            let outcome = self.execute_buy(front, quantity, taker)?;
            if outcome.retired {
                self.book.unlink(front, book_side);
                self.store.remove(front);
            }
            trace!(front, quantity, cost = outcome.cost, "crossing fill");

            match side {
                Side::Ask => {
                    a_rem = a_rem.saturating_sub(outcome.cost);
                    b_rem = b_rem.saturating_sub(quantity);
                }
                Side::Bid => {
                    b_rem = b_rem.saturating_sub(outcome.cost);
                    a_rem = a_rem.saturating_sub(quantity);
                }
            }
        }

        Ok((a_rem, b_rem))
    }

    /// Spend up to `amt` of `spending` against the book with no price
    /// limit, front to back. Returns the unspent remainder.
    pub(crate) fn take_walk(
        &mut self,
        taker: AccountId,
        amt: Amount,
        spending: Token,
    ) -> Result<Amount, EngineError> {
        // Resting orders buying the spent token sell the other one.
        let book_side = Side::for_selling(spending.other());
        let mut remaining = amt;

        loop {
            if remaining == 0 {
                break;
            }
            let front = self.book.front(book_side);
            if front == SENTINEL {
                break;
            }
            let resting = self
                .store
                .get(front)
                .expect("book references an unknown order")
                .clone();

            let quantity = if remaining >= resting.buying_amt {
                resting.selling_amt
            } else {
                mul_div(remaining, resting.selling_amt, resting.buying_amt)
                    .ok_or(EngineError::AmountOverflow)?
            };
            if quantity == 0 {
                break;
            }
            if mul_div(resting.buying_amt, quantity, resting.selling_amt)
                .ok_or(EngineError::AmountOverflow)?
                == 0
            {
                break;
            }

            let outcome = self.execute_buy(front, quantity, taker)?;
            if outcome.retired {
                self.book.unlink(front, book_side);
                self.store.remove(front);
            }
            trace!(front, quantity, cost = outcome.cost, "take fill");

            remaining = remaining.saturating_sub(outcome.cost);
        }

        Ok(remaining)
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

    const ESCROW: AccountId = 1000;
    const ADMIN: AccountId = 1001;
    const FEES: AccountId = 1002;
    const MAKER: AccountId = 10;
    const TAKER: AccountId = 20;

    fn engine() -> Engine<InMemoryLedger> {
        let mut eng = Engine::new(
            InMemoryLedger::new(ESCROW),
            InMemoryLedger::new(ESCROW),
            ESCROW,
            ADMIN,
            FEES,
        );
        eng.ledger_mut(Token::A).credit(MAKER, 1_000_000);
        eng.ledger_mut(Token::B).credit(MAKER, 1_000_000);
        eng.ledger_mut(Token::A).credit(TAKER, 1_000_000);
        eng.ledger_mut(Token::B).credit(TAKER, 1_000_000);
        eng
    }

    #[test]
    fn test_walk_consumes_front_first() {
        let mut eng = engine();
        // Among asks with bigger = A the smaller ratio rests in front.
        let low = eng.make_order(MAKER, 2, 1, Side::Ask, 0).unwrap().unwrap();
        let high = eng.make_order(MAKER, 3, 1, Side::Ask, 0).unwrap().unwrap();
        assert_eq!(eng.side_ids(Side::Ask), vec![low, high]);

        // A 2-for-1 bid crosses the front ask only.
        let price = RatioPrice::from_amounts(2, 1).unwrap();
        let (a_rem, b_rem) = eng
            .match_crossing(TAKER, price, Side::Bid, 2, 1)
            .unwrap();
        assert_eq!((a_rem, b_rem), (0, 0));
        assert!(eng.order(low).is_none());
        assert!(eng.order(high).is_some());
    }

    #[test]
    fn test_walk_stops_at_non_crossing_order() {
        let mut eng = engine();
        eng.make_order(MAKER, 5, 1, Side::Ask, 0).unwrap();

        // Bid demanding 4 A per B ranks below the resting ask.
        let price = RatioPrice::from_amounts(4, 1).unwrap();
        let (a_rem, b_rem) = eng
            .match_crossing(TAKER, price, Side::Bid, 4, 1)
            .unwrap();
        assert_eq!((a_rem, b_rem), (4, 1));
        assert_eq!(eng.depth(Side::Ask), 1);
    }

    #[test]
    fn test_partial_fill_leaves_resting_remainder() {
        let mut eng = engine();
        let id = eng
            .make_order(MAKER, 100, 10, Side::Ask, 0)
            .unwrap()
            .unwrap();

        // Equal-rate bid funded for only 30 A worth.
        let price = RatioPrice::from_amounts(10, 1).unwrap();
        let (a_rem, b_rem) = eng
            .match_crossing(TAKER, price, Side::Bid, 30, 3)
            .unwrap();
        assert_eq!((a_rem, b_rem), (0, 0));

        let order = eng.order(id).unwrap();
        assert_eq!(order.selling_amt, 70);
        assert_eq!(order.buying_amt, 7);
    }

    #[test]
    fn test_walk_spans_multiple_orders() {
        let mut eng = engine();
        for _ in 0..3 {
            eng.make_order(MAKER, 10, 1, Side::Ask, 0).unwrap();
        }

        let price = RatioPrice::from_amounts(10, 1).unwrap();
        let (a_rem, b_rem) = eng
            .match_crossing(TAKER, price, Side::Bid, 30, 3)
            .unwrap();
        assert_eq!((a_rem, b_rem), (0, 0));
        assert_eq!(eng.depth(Side::Ask), 0);
    }

    #[test]
    fn test_sub_unit_budget_stops_cleanly() {
        let mut eng = engine();
        // Ask wants 3 B for 7 A; a 1 B budget converts to 2 A whose
        // floor cost is zero, so nothing trades.
        let id = eng.make_order(MAKER, 7, 3, Side::Ask, 0).unwrap().unwrap();

        let price = RatioPrice::from_amounts(3, 1).unwrap();
        let (a_rem, b_rem) = eng
            .match_crossing(TAKER, price, Side::Bid, 3, 1)
            .unwrap();
        assert_eq!((a_rem, b_rem), (3, 1));
        assert_eq!(eng.order(id).unwrap().selling_amt, 7);
        assert_eq!(eng.order(id).unwrap().buying_amt, 3);
    }

    #[test]
    fn test_take_walk_spends_across_book() {
        let mut eng = engine();
        // Bids paying 10, 20, 50 A for 1 B each.
        for a in [50, 20, 10] {
            eng.make_order(MAKER, a, 1, Side::Bid, 0).unwrap();
        }

        let remaining = eng.take_walk(TAKER, 100, Token::A).unwrap();
        assert_eq!(remaining, 20);
        assert_eq!(eng.depth(Side::Bid), 0);
    }

    #[test]
    fn test_take_walk_partial_last_order() {
        let mut eng = engine();
        let id = eng
            .make_order(MAKER, 100, 10, Side::Bid, 0)
            .unwrap()
            .unwrap();

        // 40 A buys 4 B of the resting 10 B.
        let remaining = eng.take_walk(TAKER, 40, Token::A).unwrap();
        assert_eq!(remaining, 0);
        assert_eq!(eng.order(id).unwrap().selling_amt, 6);
        assert_eq!(eng.order(id).unwrap().buying_amt, 60);
    }
}
