//! Core business logic module
//!
//! This module contains the core pledge accounting components:
//! - `chart` - Chart of accounts management
//! - `journal` - Append-only double-entry journal
//! - `allocator` - Payment amount allocation across interest/principal/penalty
//! - `lifecycle` - Pledge status state machine
//! - `payments` - Payment record storage
//! - `numbering` - Receipt and pledge-number sequences
//! - `daybook` - Daily and per-account reporting projections
//! - `engine` - Single-threaded pledge ledger orchestration
//! - `shared` - Thread-safe ledger for concurrent payment recording

pub mod allocator;
pub mod chart;
pub mod daybook;
pub mod engine;
pub mod journal;
pub mod lifecycle;
pub mod numbering;
pub mod payments;
pub mod shared;

pub use allocator::{plan_payment, AllocationOrder, PaymentPlan, Split};
pub use chart::ChartOfAccounts;
pub use daybook::{AccountSummary, DailySummary, DaybookLine};
pub use engine::{CompanyAccounts, PledgeLedger};
pub use journal::Journal;
pub use numbering::SequenceRegistry;
pub use payments::PaymentBook;
pub use shared::SharedPledgeLedger;
