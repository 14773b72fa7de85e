//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `sync_reader` - Streaming CSV reader with iterator interface

pub mod csv_format;
pub mod sync_reader;

pub use csv_format::{
    convert_csv_record, write_balances_csv, write_daybook_csv, CsvRecord, OperationRecord,
    PledgeBalance,
};
pub use sync_reader::SyncReader;

use crate::core::PledgeLedger;
use crate::types::UserId;
use std::path::Path;

// Operations CSV rows carry no operator; attribute them to a fixed
// batch user
const BATCH_USER: UserId = 0;

/// Stream an operations CSV through the engine
///
/// Row-level problems (parse errors, rejected operations) go to stderr
/// and processing continues; only infrastructure failures (unreadable
/// file) are fatal. Companies are registered on first sight so a demo
/// file is self-contained.
pub fn process_operations(path: &Path, engine: &mut PledgeLedger) -> Result<(), String> {
    let reader = SyncReader::new(path)?;

    for result in reader {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        if let Err(e) = apply(engine, record) {
            eprintln!("{}", e);
        }
    }
    Ok(())
}

fn apply(engine: &mut PledgeLedger, record: OperationRecord) -> Result<(), String> {
    match record {
        OperationRecord::OpenPledge {
            company,
            customer,
            date,
            due_date,
            total_loan_amount,
            document_charges,
            first_month_interest,
        } => {
            if !engine.has_company(company) {
                engine
                    .register_company(company)
                    .map_err(|e| format!("Failed to register company {}: {}", company, e))?;
            }
            engine
                .open_pledge(
                    company,
                    customer,
                    1,
                    date,
                    due_date,
                    total_loan_amount,
                    document_charges,
                    first_month_interest,
                )
                .map(|_| ())
                .map_err(|e| format!("Pledge rejected: {}", e))
        }
        OperationRecord::Payment {
            pledge,
            date,
            amount,
            split,
            method,
        } => engine
            .record_payment(pledge, date, amount, split, method, BATCH_USER)
            .map(|_| ())
            .map_err(|e| format!("Payment on pledge {} rejected: {}", pledge, e)),
        OperationRecord::Default { pledge } => engine
            .mark_defaulted(pledge)
            .map(|_| ())
            .map_err(|e| format!("Default on pledge {} rejected: {}", pledge, e)),
        OperationRecord::Close { pledge } => engine
            .close_pledge(pledge)
            .map(|_| ())
            .map_err(|e| format!("Close on pledge {} rejected: {}", pledge, e)),
    }
}

/// Collect per-pledge balances for the output CSV
pub fn collect_balances(engine: &PledgeLedger) -> Vec<PledgeBalance> {
    engine
        .pledges()
        .iter()
        .map(|pledge| PledgeBalance {
            pledge: pledge.id,
            pledge_number: pledge.pledge_number.clone(),
            status: pledge.status.to_string(),
            outstanding: pledge.final_amount - engine.payment_total(pledge.id),
        })
        .collect()
}
