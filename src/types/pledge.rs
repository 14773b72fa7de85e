//! Pledge and payment types
//!
//! A pledge is a loan issued against pawned collateral. Payments against
//! a pledge are split into interest/principal/penalty components and are
//! immutable once recorded; corrections are new offsetting entries.

use crate::types::account::CompanyId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pledge identifier
pub type PledgeId = u32;

/// Customer identifier (owned by the external CRUD layer)
pub type CustomerId = u32;

/// Scheme identifier (interest scheme master data, external)
pub type SchemeId = u32;

/// Acting user identifier (authenticated actor, external)
pub type UserId = u32;

/// Payment identifier, assigned by the payment book
pub type PaymentId = u32;

/// Pledge lifecycle status
///
/// `Active` is the only state that accepts payments. `Redeemed`,
/// `Closed` and `Defaulted` are terminal. The allowed transitions live
/// in [`crate::core::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PledgeStatus {
    /// Loan outstanding; payments accepted
    Active,
    /// Fully repaid; reached automatically when the balance hits zero
    Redeemed,
    /// Voided/cancelled by an administrator
    Closed,
    /// Past due and written off by an administrator
    Defaulted,
}

impl PledgeStatus {
    /// Whether this status accepts no further transitions or payments
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PledgeStatus::Active)
    }
}

impl fmt::Display for PledgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PledgeStatus::Active => "active",
            PledgeStatus::Redeemed => "redeemed",
            PledgeStatus::Closed => "closed",
            PledgeStatus::Defaulted => "defaulted",
        };
        f.write_str(s)
    }
}

/// A loan against pawned collateral
///
/// Created once at origination with status `Active`; thereafter only the
/// status field changes, and only through the lifecycle state machine.
/// The outstanding balance is never stored: it is always
/// `final_amount − Σ payments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pledge {
    pub id: PledgeId,

    /// Company-scoped sequential human-readable number (e.g. "PLG-1-00004")
    pub pledge_number: String,

    pub customer: CustomerId,
    pub scheme: SchemeId,

    pub pledge_date: NaiveDate,
    pub due_date: NaiveDate,

    /// Principal disbursed to the customer
    pub total_loan_amount: Decimal,

    /// Charges collected at origination
    pub document_charges: Decimal,

    /// Interest collected for the first month at origination
    pub first_month_interest: Decimal,

    /// The amount that fully redeems the pledge
    pub final_amount: Decimal,

    pub status: PledgeStatus,
    pub company: CompanyId,
}

/// How a payment was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Bank,
    Upi,
    Card,
}

/// A settlement event against a pledge
///
/// Recorded exactly once and immutable thereafter. The component
/// breakdown must sum to `amount` within the 0.01 tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PledgePayment {
    pub id: PaymentId,
    pub pledge: PledgeId,
    pub payment_date: NaiveDate,

    /// Total amount received
    pub amount: Decimal,

    /// Portion allocated to interest income
    pub interest_amount: Decimal,

    /// Portion reducing the outstanding principal
    pub principal_amount: Decimal,

    /// Portion allocated to penalty income
    pub penalty_amount: Decimal,

    pub method: PaymentMethod,

    /// Generated receipt number (e.g. "RCPT-1-2025-00009")
    pub receipt_number: String,

    /// Actor who recorded the payment
    pub created_by: UserId,

    pub company: CompanyId,
}

/// Result of recording a payment
///
/// Carries the created payment row plus the pledge state the caller
/// needs to report back: resulting status and ledger-derived balance.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    pub payment: PledgePayment,
    pub status: PledgeStatus,
    pub outstanding: Decimal,
}
