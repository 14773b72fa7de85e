//! Types module
//!
//! Core data structures used throughout the crate:
//! - `account`: chart-of-accounts node types
//! - `pledge`: pledge, payment and lifecycle-status types
//! - `entry`: ledger entry and voucher types
//! - `error`: the `LedgerError` taxonomy

pub mod account;
pub mod entry;
pub mod error;
pub mod pledge;

pub use account::{Account, AccountId, AccountStatus, AccountType, CompanyId};
pub use entry::{EntryDraft, EntryId, LedgerEntry, ReferenceType, VoucherId, VoucherMaster};
pub use error::LedgerError;
pub use pledge::{
    CustomerId, PaymentId, PaymentMethod, PaymentOutcome, Pledge, PledgePayment, PledgeId,
    PledgeStatus, SchemeId, UserId,
};

use rust_decimal::Decimal;

/// Monetary comparison tolerance (ε = 0.01 currency units)
///
/// Component splits must sum to their payment amount within this
/// tolerance, and a pledge whose outstanding balance falls inside it is
/// considered fully redeemed.
pub fn money_tolerance() -> Decimal {
    Decimal::new(1, 2)
}
