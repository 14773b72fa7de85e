//! Ledger entry types
//!
//! One entry is a single debit or credit line against one account.
//! A business event always creates a balanced group of entries (Σdebit =
//! Σcredit) keyed by its originating reference; entries are append-only
//! and never edited.

use crate::types::account::{AccountId, CompanyId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger entry identifier
pub type EntryId = u64;

/// Voucher identifier for manual/correction groups
pub type VoucherId = u32;

/// The business event a ledger group originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    /// A pledge payment (interest/principal/penalty split)
    Payment,
    /// Pledge origination (loan disbursement)
    Pledge,
    /// Manual adjustment or reversal, grouped by a voucher header
    Voucher,
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReferenceType::Payment => "payment",
            ReferenceType::Pledge => "pledge",
            ReferenceType::Voucher => "voucher",
        };
        f.write_str(s)
    }
}

/// One immutable debit-or-credit line against one account
///
/// Exactly one of `debit`/`credit` is non-zero. The signed view
/// (debit − credit) is what daybook summaries aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub account: AccountId,

    /// Debit amount, or zero when this is a credit line
    pub debit: Decimal,

    /// Credit amount, or zero when this is a debit line
    pub credit: Decimal,

    /// The kind of business event that produced this group
    pub reference_type: ReferenceType,

    /// Id of the originating event (payment id, pledge id or voucher id)
    pub reference_id: u32,

    /// Free-text narration
    pub narration: String,

    pub transaction_date: NaiveDate,
    pub company: CompanyId,
}

impl LedgerEntry {
    /// Absolute amount of the line (whichever side is set)
    pub fn amount(&self) -> Decimal {
        if self.debit > Decimal::ZERO {
            self.debit
        } else {
            self.credit
        }
    }

    /// Signed amount: positive for debit, negative for credit
    pub fn signed(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// One line of a posting before it is committed to the journal
///
/// Drafts carry no id, date or reference; the journal assigns those when
/// the whole group is validated and appended atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub account: AccountId,
    pub debit: Decimal,
    pub credit: Decimal,
    pub narration: String,
}

impl EntryDraft {
    /// Draft a debit line
    pub fn debit(account: AccountId, amount: Decimal, narration: impl Into<String>) -> Self {
        EntryDraft {
            account,
            debit: amount,
            credit: Decimal::ZERO,
            narration: narration.into(),
        }
    }

    /// Draft a credit line
    pub fn credit(account: AccountId, amount: Decimal, narration: impl Into<String>) -> Self {
        EntryDraft {
            account,
            debit: Decimal::ZERO,
            credit: amount,
            narration: narration.into(),
        }
    }
}

/// Grouping header for ledger entries not tied to a payment or pledge
///
/// Reversals and manual adjustments post under a voucher so that the
/// correction itself is a first-class, deduplicated business event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherMaster {
    pub id: VoucherId,
    pub voucher_type: String,
    pub date: NaiveDate,
    pub company: CompanyId,
}
