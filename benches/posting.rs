//! Benchmark suite for ledger posting and reporting
//!
//! Measures the hot paths: recording payments through the engine and
//! building the daily summary over a populated journal, using the divan
//! benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use chrono::NaiveDate;
use pledge_ledger_engine::core::PledgeLedger;
use pledge_ledger_engine::types::PaymentMethod;
use rust_decimal::Decimal;

fn main() {
    divan::main();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Engine seeded with `pledges` open pledges of 10000.00 each
fn seeded_engine(pledges: u32) -> PledgeLedger {
    let mut engine = PledgeLedger::new();
    engine.register_company(1).expect("register company");
    for _ in 0..pledges {
        engine
            .open_pledge(
                1,
                10,
                1,
                date(2025, 1, 1),
                date(2025, 4, 1),
                Decimal::new(1000000, 2),
                Decimal::ZERO,
                Decimal::ZERO,
            )
            .expect("open pledge");
    }
    engine
}

/// Record 100 small payments across 100 pledges
#[divan::bench]
fn record_payments_100(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| seeded_engine(100))
        .bench_values(|mut engine| {
            for pledge in 1..=100 {
                engine
                    .record_payment(
                        pledge,
                        date(2025, 2, 1),
                        Decimal::new(10000, 2),
                        None,
                        PaymentMethod::Cash,
                        1,
                    )
                    .expect("payment");
            }
            engine
        });
}

/// Daily summary over a journal with 1000 payment groups
#[divan::bench]
fn daily_summary_1000(bencher: divan::Bencher) {
    let mut engine = seeded_engine(1000);
    for pledge in 1..=1000 {
        engine
            .record_payment(
                pledge,
                date(2025, 2, 1),
                Decimal::new(10000, 2),
                None,
                PaymentMethod::Cash,
                1,
            )
            .expect("payment");
    }

    bencher.bench(|| {
        engine
            .daily_summary(1, date(2025, 2, 1))
            .expect("daily summary")
    });
}

/// Account-wise summary over the same populated journal
#[divan::bench]
fn account_wise_summary_1000(bencher: divan::Bencher) {
    let mut engine = seeded_engine(1000);
    for pledge in 1..=1000 {
        engine
            .record_payment(
                pledge,
                date(2025, 2, 1),
                Decimal::new(10000, 2),
                None,
                PaymentMethod::Cash,
                1,
            )
            .expect("payment");
    }

    bencher.bench(|| {
        engine
            .account_wise_summary(1, date(2025, 2, 1))
            .expect("account summary")
    });
}
