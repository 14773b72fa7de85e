//! Pledge Ledger Engine Library
//! # Overview
//!
//! This library provides a double-entry accounting engine for pawn-shop
//! pledge operations: loan origination, payment recording with
//! interest/principal/penalty allocation, lifecycle management and
//! daybook reporting.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Pledge, LedgerEntry, etc.)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::chart`] - Chart of accounts management
//!   - [`core::journal`] - Append-only double-entry journal
//!   - [`core::allocator`] - Payment amount allocation
//!   - [`core::lifecycle`] - Pledge status state machine
//!   - [`core::engine`] - Pledge ledger orchestration
//!   - [`core::shared`] - Thread-safe ledger for concurrent payments
//!   - [`core::daybook`] - Daily and per-account reporting
//! - [`io`] - CSV input pipeline and report output
//!
//! # Accounting Model
//!
//! Every financial event posts a balanced group of ledger entries
//! (total debits equal total credits). Entries are append-only;
//! corrections happen by posting reversals, never by editing. Balances
//! are always derived by summing entries, so the ledger remains the
//! single source of truth.
//!
//! # Pledge Lifecycle
//!
//! A pledge starts Active and moves to exactly one terminal state:
//!
//! - **Redeemed**: fully paid off
//! - **Closed**: settled administratively
//! - **Defaulted**: unpaid past due, collateral pending auction
//!
//! Terminal pledges accept no further payments.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use crate::core::{PledgeLedger, SharedPledgeLedger, Split};
pub use crate::io::{process_operations, write_balances_csv};
pub use types::{
    Account, AccountId, CompanyId, LedgerEntry, LedgerError, PaymentMethod, Pledge, PledgeId,
    PledgePayment, PledgeStatus,
};
