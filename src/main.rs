//! Pledge Ledger CLI
//!
//! Command-line interface for processing pledge operations from CSV
//! files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > balances.csv
//! cargo run -- --daybook 2025-02-01 --company 1 operations.csv > daybook.csv
//! ```
//!
//! The program streams operation records from the input CSV through the
//! ledger engine and writes pledge balances (or, with `--daybook`, the
//! account-wise daybook for a date) to stdout. Row-level problems are
//! reported to stderr and processing continues.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, report failure, etc.)

use pledge_ledger_engine::cli;
use pledge_ledger_engine::core::PledgeLedger;
use pledge_ledger_engine::io;
use std::process;

fn main() {
    let args = cli::parse_args();

    let mut engine = PledgeLedger::new();
    if let Err(e) = io::process_operations(&args.input_file, &mut engine) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let mut output = std::io::stdout();
    let result = match args.daybook {
        Some(date) => {
            let company = args.company.unwrap_or(1);
            match engine.account_wise_summary(company, date) {
                Ok(summaries) => io::write_daybook_csv(&summaries, &mut output),
                Err(e) => Err(format!("Daybook failed: {}", e)),
            }
        }
        None => io::write_balances_csv(&io::collect_balances(&engine), &mut output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
