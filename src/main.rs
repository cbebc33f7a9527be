//! pairbook - Demo Entry Point
//!
//! Runs a short trading session against an in-memory ledger pair and
//! prints the resulting events, book state, and state digest.

use pairbook::{Engine, InMemoryLedger, Side, Token};

const ESCROW: u64 = 1000;
const ADMIN: u64 = 1001;
const FEE_SINK: u64 = 1002;

const ALICE: u64 = 1;
const BOB: u64 = 2;
const CAROL: u64 = 3;

fn main() {
    tracing_subscriber::fmt::init();

    println!("===========================================");
    println!("  pairbook - ratio matching engine demo");
    println!("===========================================");
    println!();

    let mut engine = Engine::new(
        InMemoryLedger::new(ESCROW),
        InMemoryLedger::new(ESCROW),
        ESCROW,
        ADMIN,
        FEE_SINK,
    );
    engine.set_taker_fee(ADMIN, 30).expect("admin sets fees"); // 0.30%
    engine.set_maker_fee(ADMIN, 10).expect("admin sets fees"); // 0.10%

    engine.ledger_mut(Token::A).credit(ALICE, 1_000_000);
    engine.ledger_mut(Token::B).credit(BOB, 1_000_000);
    engine.ledger_mut(Token::B).credit(CAROL, 1_000_000);

    // Alice quotes two asks at different rates.
    println!("Alice posts 500000 A for 100000 B ...");
    engine
        .make_order(ALICE, 500_000, 100_000, Side::Ask, 0)
        .expect("order rests");
    println!("Alice posts 300000 A for 50000 B ...");
    engine
        .make_order(ALICE, 300_000, 50_000, Side::Ask, 0)
        .expect("order rests");

    // Bob lifts part of the book with a matching bid.
    println!("Bob bids 250000 A for 50000 B ...");
    engine
        .make_order(BOB, 250_000, 50_000, Side::Bid, 0)
        .expect("order matches");

    // Carol sweeps whatever 80000 B can buy.
    println!("Carol takes with 80000 B ...");
    let remaining = engine.take(CAROL, 80_000, Token::B).expect("take runs");
    println!("  Carol's unspent B: {}", remaining);
    println!();

    println!("Events:");
    for event in engine.drain_events() {
        println!("  {:?}", event);
    }
    println!();

    for side in [Side::Ask, Side::Bid] {
        println!("{:?} book ({} orders):", side, engine.depth(side));
        for id in engine.side_ids(side) {
            let order = engine.order(id).expect("listed order exists");
            println!(
                "  #{} owner={} sells {} {:?} for {} {:?} (rate {})",
                order.id,
                order.owner,
                order.selling_amt,
                order.selling(),
                order.buying_amt,
                order.buying(),
                order.price().display_rate(),
            );
        }
    }
    println!();

    println!("Balances:");
    for (name, account) in [("alice", ALICE), ("bob", BOB), ("carol", CAROL), ("fees", FEE_SINK)] {
        println!(
            "  {:>5}: {} A / {} B",
            name,
            engine.ledger(Token::A).balance_of(account),
            engine.ledger(Token::B).balance_of(account),
        );
    }
    println!();
    println!("State digest: {}", engine.state_digest_hex());
}
