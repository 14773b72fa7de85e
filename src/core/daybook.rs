//! Daybook and reporting projections
//!
//! Read-only aggregation over posted ledger entries. These functions
//! never create, modify or infer ledger rows; any discrepancy between a
//! convenience field elsewhere and the ledger-derived numbers here is a
//! bug to surface, not to reconcile silently.

use crate::core::chart::ChartOfAccounts;
use crate::core::journal::Journal;
use crate::types::{AccountId, CompanyId, LedgerEntry, LedgerError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// One daybook line: a ledger entry annotated with its account's
/// display code and name
#[derive(Debug, Clone, PartialEq)]
pub struct DaybookLine {
    pub entry: LedgerEntry,
    pub account_code: String,
    pub account_name: String,
}

/// A company's ledger activity for one calendar date
///
/// Opening balance is the signed (debit − credit) sum strictly before
/// the date; closing is opening plus the day's signed sum. With all
/// groups balanced, both are zero company-wide — reported anyway so a
/// broken invariant is visible.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub lines: Vec<DaybookLine>,
}

/// Per-account debit/credit totals for one calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub account: AccountId,
    pub code: String,
    pub name: String,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

/// All ledger activity of a company on one date, with opening and
/// closing balances
///
/// Lines come back in posting order. Accounts missing from the chart
/// (which would indicate a corrupted store) fail with `UnknownAccount`.
pub fn daily_summary(
    journal: &Journal,
    chart: &ChartOfAccounts,
    company: CompanyId,
    date: NaiveDate,
) -> Result<DailySummary, LedgerError> {
    let mut opening = Decimal::ZERO;
    let mut day_total = Decimal::ZERO;
    let mut lines = Vec::new();

    for entry in journal.entries() {
        if entry.company != company {
            continue;
        }
        if entry.transaction_date < date {
            opening += entry.signed();
        } else if entry.transaction_date == date {
            day_total += entry.signed();
            let account = chart.require(entry.account)?;
            lines.push(DaybookLine {
                entry: entry.clone(),
                account_code: account.code.clone(),
                account_name: account.name.clone(),
            });
        }
    }

    Ok(DailySummary {
        date,
        opening_balance: opening,
        closing_balance: opening + day_total,
        lines,
    })
}

/// The day's entries grouped by account, ordered by account code
pub fn account_wise_summary(
    journal: &Journal,
    chart: &ChartOfAccounts,
    company: CompanyId,
    date: NaiveDate,
) -> Result<Vec<AccountSummary>, LedgerError> {
    let mut totals: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();
    for entry in journal.entries() {
        if entry.company != company || entry.transaction_date != date {
            continue;
        }
        let slot = totals.entry(entry.account).or_insert((Decimal::ZERO, Decimal::ZERO));
        slot.0 += entry.debit;
        slot.1 += entry.credit;
    }

    let mut summaries = Vec::with_capacity(totals.len());
    for (account, (total_debit, total_credit)) in totals {
        let node = chart.require(account)?;
        summaries.push(AccountSummary {
            account,
            code: node.code.clone(),
            name: node.name.clone(),
            total_debit,
            total_credit,
        });
    }
    // Account-code ascending for determinism
    summaries.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(summaries)
}
