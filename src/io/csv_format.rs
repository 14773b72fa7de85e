//! CSV format handling for operation records and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain operations
//! - Balances and daybook output serialization
//!
//! All functions are pure (no I/O beyond the passed writer) for easy
//! testing.
//!
//! # Pledge rows
//!
//! Pledge origination reuses the amount columns: `amount` carries the
//! redemption (final) amount, `principal` the disbursed loan and
//! `interest` the first month interest. Document charges fall out as
//! `amount - principal - interest`. The due date defaults to 90 days
//! after the row date.

use crate::core::daybook::AccountSummary;
use crate::core::Split;
use crate::types::{CompanyId, CustomerId, PaymentMethod, PledgeId};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the operations CSV with columns:
/// op, company, pledge, customer, amount, interest, principal, penalty,
/// method, date. Most fields are optional because different operations
/// populate different columns.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub company: Option<CompanyId>,
    pub pledge: Option<PledgeId>,
    pub customer: Option<CustomerId>,
    pub amount: Option<String>,
    pub interest: Option<String>,
    pub principal: Option<String>,
    pub penalty: Option<String>,
    pub method: Option<String>,
    pub date: Option<String>,
}

/// A parsed operation ready for the engine
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRecord {
    OpenPledge {
        company: CompanyId,
        customer: CustomerId,
        date: NaiveDate,
        due_date: NaiveDate,
        total_loan_amount: Decimal,
        document_charges: Decimal,
        first_month_interest: Decimal,
    },
    Payment {
        pledge: PledgeId,
        date: NaiveDate,
        amount: Decimal,
        split: Option<Split>,
        method: PaymentMethod,
    },
    Default {
        pledge: PledgeId,
    },
    Close {
        pledge: PledgeId,
    },
}

fn parse_decimal(field: &Option<String>, name: &str) -> Result<Option<Decimal>, String> {
    match field {
        Some(raw) if !raw.trim().is_empty() => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(|_| format!("Invalid {} '{}'", name, raw)),
        _ => Ok(None),
    }
}

fn require_decimal(field: &Option<String>, name: &str) -> Result<Decimal, String> {
    parse_decimal(field, name)?.ok_or_else(|| format!("Missing required column '{}'", name))
}

fn parse_date(field: &Option<String>) -> Result<NaiveDate, String> {
    let raw = field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing required column 'date'".to_string())?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("Invalid date '{}'", raw))
}

fn parse_method(field: &Option<String>) -> Result<PaymentMethod, String> {
    let raw = field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("cash");
    match raw.to_lowercase().as_str() {
        "cash" => Ok(PaymentMethod::Cash),
        "bank" => Ok(PaymentMethod::Bank),
        "upi" => Ok(PaymentMethod::Upi),
        "card" => Ok(PaymentMethod::Card),
        other => Err(format!("Invalid payment method '{}'", other)),
    }
}

/// Convert a CsvRecord to an OperationRecord
///
/// Validates that each operation's required columns are present and
/// parseable. Returns a descriptive error string for the caller to
/// report; the row is then skipped.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<OperationRecord, String> {
    match csv_record.op.to_lowercase().as_str() {
        "pledge" => {
            let company = csv_record
                .company
                .ok_or_else(|| "Pledge row requires a company".to_string())?;
            let customer = csv_record
                .customer
                .ok_or_else(|| "Pledge row requires a customer".to_string())?;
            let date = parse_date(&csv_record.date)?;
            let final_amount = require_decimal(&csv_record.amount, "amount")?;
            let total_loan_amount = require_decimal(&csv_record.principal, "principal")?;
            let first_month_interest =
                parse_decimal(&csv_record.interest, "interest")?.unwrap_or(Decimal::ZERO);
            let document_charges = final_amount - total_loan_amount - first_month_interest;
            if document_charges < Decimal::ZERO {
                return Err(format!(
                    "Pledge amount {} is less than principal {} plus interest {}",
                    final_amount, total_loan_amount, first_month_interest
                ));
            }
            let due_date = date
                .checked_add_days(Days::new(90))
                .ok_or_else(|| format!("Due date overflow for pledge date {}", date))?;
            Ok(OperationRecord::OpenPledge {
                company,
                customer,
                date,
                due_date,
                total_loan_amount,
                document_charges,
                first_month_interest,
            })
        }
        "payment" => {
            let pledge = csv_record
                .pledge
                .ok_or_else(|| "Payment row requires a pledge".to_string())?;
            let date = parse_date(&csv_record.date)?;
            let amount = require_decimal(&csv_record.amount, "amount")?;
            let method = parse_method(&csv_record.method)?;
            let interest = parse_decimal(&csv_record.interest, "interest")?;
            let principal = parse_decimal(&csv_record.principal, "principal")?;
            let penalty = parse_decimal(&csv_record.penalty, "penalty")?;
            // Any explicit component makes the whole split explicit
            let split = if interest.is_some() || principal.is_some() || penalty.is_some() {
                Some(Split {
                    interest: interest.unwrap_or(Decimal::ZERO),
                    principal: principal.unwrap_or(Decimal::ZERO),
                    penalty: penalty.unwrap_or(Decimal::ZERO),
                })
            } else {
                None
            };
            Ok(OperationRecord::Payment {
                pledge,
                date,
                amount,
                split,
                method,
            })
        }
        "default" => {
            let pledge = csv_record
                .pledge
                .ok_or_else(|| "Default row requires a pledge".to_string())?;
            Ok(OperationRecord::Default { pledge })
        }
        "close" => {
            let pledge = csv_record
                .pledge
                .ok_or_else(|| "Close row requires a pledge".to_string())?;
            Ok(OperationRecord::Close { pledge })
        }
        other => Err(format!("Invalid operation: '{}'", other)),
    }
}

/// A pledge balance line for the output CSV
#[derive(Debug, Clone, PartialEq)]
pub struct PledgeBalance {
    pub pledge: PledgeId,
    pub pledge_number: String,
    pub status: String,
    pub outstanding: Decimal,
}

/// Write pledge balances to CSV format
///
/// Columns: pledge, number, status, outstanding. Sorted by pledge id
/// for deterministic output.
pub fn write_balances_csv(
    balances: &[PledgeBalance],
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["pledge", "number", "status", "outstanding"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted = balances.to_vec();
    sorted.sort_by_key(|balance| balance.pledge);

    for balance in sorted {
        writer
            .write_record(&[
                balance.pledge.to_string(),
                balance.pledge_number,
                balance.status,
                format!("{:.2}", balance.outstanding),
            ])
            .map_err(|e| format!("Failed to write balance record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;
    Ok(())
}

/// Write an account-wise daybook to CSV format
///
/// Columns: code, name, debit, credit. Summaries arrive already sorted
/// by account code.
pub fn write_daybook_csv(
    summaries: &[AccountSummary],
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["code", "name", "debit", "credit"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for summary in summaries {
        writer
            .write_record(&[
                summary.code.clone(),
                summary.name.clone(),
                format!("{:.2}", summary.total_debit),
                format!("{:.2}", summary.total_credit),
            ])
            .map_err(|e| format!("Failed to write daybook record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;
    Ok(())
}
