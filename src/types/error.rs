//! Error types for the pledge ledger engine
//!
//! All business-rule failures are surfaced verbatim to the caller (the
//! external API layer translates them to its own transport codes); none
//! are downgraded to warnings. Infrastructure failures travel as the
//! distinct `StorageUnavailable` kind, which is the only retryable one.

use crate::types::account::{AccountId, CompanyId};
use crate::types::entry::ReferenceType;
use crate::types::pledge::{PledgeId, PledgeStatus};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the pledge ledger engine
///
/// Each variant carries the context needed to diagnose the rejected
/// operation. Any failure inside the atomic payment+posting unit rolls
/// back both the payment row and any partial ledger entries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The referenced pledge does not exist
    #[error("Pledge {pledge} not found")]
    UnknownPledge { pledge: PledgeId },

    /// Payment attempted against a pledge in a terminal state
    #[error("Pledge {pledge} is {status} and accepts no payments")]
    PledgeNotActive {
        pledge: PledgeId,
        status: PledgeStatus,
    },

    /// Zero or negative monetary amount
    #[error("Invalid amount {amount}: must be positive")]
    InvalidAmount { amount: Decimal },

    /// Explicit split components do not sum to the payment amount
    #[error(
        "Split mismatch: interest {interest} + principal {principal} + penalty {penalty} != amount {amount}"
    )]
    SplitMismatch {
        amount: Decimal,
        interest: Decimal,
        principal: Decimal,
        penalty: Decimal,
    },

    /// Payment would push the outstanding balance below zero
    #[error(
        "Overpayment not allowed on pledge {pledge}: outstanding {outstanding}, requested {requested}"
    )]
    OverpaymentNotAllowed {
        pledge: PledgeId,
        outstanding: Decimal,
        requested: Decimal,
    },

    /// Entry group debits and credits do not balance
    #[error("Unbalanced transaction: debits {debits} != credits {credits}")]
    UnbalancedTransaction { debits: Decimal, credits: Decimal },

    /// Account code already taken within the company
    #[error("Duplicate account code '{code}' for company {company}")]
    DuplicateCode { company: CompanyId, code: String },

    /// Parent account missing or owned by a different company
    #[error("Invalid parent account {parent}")]
    InvalidParent { parent: AccountId },

    /// Destructive account edit blocked by existing ledger history
    #[error("Account {account} has ledger history and cannot be removed")]
    AccountHasHistory { account: AccountId },

    /// The referenced account does not exist (or is invisible to the company)
    #[error("Account {account} not found")]
    UnknownAccount { account: AccountId },

    /// No standard accounts registered for the company
    #[error("Company {company} is not registered")]
    UnknownCompany { company: CompanyId },

    /// No ledger group exists for the given reference
    #[error("No ledger entries found for {reference_type} {reference_id}")]
    UnknownReference {
        reference_type: ReferenceType,
        reference_id: u32,
    },

    /// A group for this reference was already posted (retry dedupe)
    #[error("Ledger entries for {reference_type} {reference_id} already posted")]
    DuplicateReference {
        reference_type: ReferenceType,
        reference_id: u32,
    },

    /// Pledge status change not listed in the transition table
    #[error("Invalid pledge status transition {from} -> {to}")]
    InvalidTransition {
        from: PledgeStatus,
        to: PledgeStatus,
    },

    /// Entry line with both sides set, or neither side positive
    #[error("Entry for account {account} must set exactly one of debit or credit to a positive amount")]
    MalformedEntry { account: AccountId },

    /// Posting with no entry lines
    #[error("Posting contains no entries")]
    EmptyPosting,

    /// Infrastructure failure; retryable by the caller
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },
}

// Infrastructure failures surface as the retryable kind.
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::StorageUnavailable {
            message: error.to_string(),
        }
    }
}

// Helper constructors for the common rejections

impl LedgerError {
    /// Create an UnknownPledge error
    pub fn unknown_pledge(pledge: PledgeId) -> Self {
        LedgerError::UnknownPledge { pledge }
    }

    /// Create a PledgeNotActive error
    pub fn pledge_not_active(pledge: PledgeId, status: PledgeStatus) -> Self {
        LedgerError::PledgeNotActive { pledge, status }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create a SplitMismatch error
    pub fn split_mismatch(
        amount: Decimal,
        interest: Decimal,
        principal: Decimal,
        penalty: Decimal,
    ) -> Self {
        LedgerError::SplitMismatch {
            amount,
            interest,
            principal,
            penalty,
        }
    }

    /// Create an OverpaymentNotAllowed error
    pub fn overpayment(pledge: PledgeId, outstanding: Decimal, requested: Decimal) -> Self {
        LedgerError::OverpaymentNotAllowed {
            pledge,
            outstanding,
            requested,
        }
    }

    /// Create an UnbalancedTransaction error
    pub fn unbalanced(debits: Decimal, credits: Decimal) -> Self {
        LedgerError::UnbalancedTransaction { debits, credits }
    }

    /// Create a DuplicateCode error
    pub fn duplicate_code(company: CompanyId, code: &str) -> Self {
        LedgerError::DuplicateCode {
            company,
            code: code.to_string(),
        }
    }

    /// Create an InvalidParent error
    pub fn invalid_parent(parent: AccountId) -> Self {
        LedgerError::InvalidParent { parent }
    }

    /// Create an AccountHasHistory error
    pub fn account_has_history(account: AccountId) -> Self {
        LedgerError::AccountHasHistory { account }
    }

    /// Create an UnknownAccount error
    pub fn unknown_account(account: AccountId) -> Self {
        LedgerError::UnknownAccount { account }
    }

    /// Create an UnknownCompany error
    pub fn unknown_company(company: CompanyId) -> Self {
        LedgerError::UnknownCompany { company }
    }

    /// Create an UnknownReference error
    pub fn unknown_reference(reference_type: ReferenceType, reference_id: u32) -> Self {
        LedgerError::UnknownReference {
            reference_type,
            reference_id,
        }
    }

    /// Create a DuplicateReference error
    pub fn duplicate_reference(reference_type: ReferenceType, reference_id: u32) -> Self {
        LedgerError::DuplicateReference {
            reference_type,
            reference_id,
        }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(from: PledgeStatus, to: PledgeStatus) -> Self {
        LedgerError::InvalidTransition { from, to }
    }

    /// Create a MalformedEntry error
    pub fn malformed_entry(account: AccountId) -> Self {
        LedgerError::MalformedEntry { account }
    }

    /// Create a StorageUnavailable error
    pub fn storage_unavailable(message: &str) -> Self {
        LedgerError::StorageUnavailable {
            message: message.to_string(),
        }
    }

    /// Whether the caller may retry the operation with unchanged input
    ///
    /// Only infrastructure failures are retryable; business-rule
    /// rejections require changed input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::StorageUnavailable { .. })
    }
}
