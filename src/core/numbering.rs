//! Company-scoped document numbering
//!
//! Receipt numbers are sequential per company and calendar year
//! (`RCPT-{company}-{year}-{seq:05}`); pledge numbers are sequential per
//! company (`PLG-{company}-{seq:05}`). The external CRUD layer obtains
//! pledge numbers from here so they stay unique per company.

use crate::types::CompanyId;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// Sequence counters for receipt and pledge numbers
pub struct SequenceRegistry {
    receipts: HashMap<(CompanyId, i32), u32>,
    pledges: HashMap<CompanyId, u32>,
}

impl SequenceRegistry {
    /// Create an empty registry; all sequences start at 1
    pub fn new() -> Self {
        SequenceRegistry {
            receipts: HashMap::new(),
            pledges: HashMap::new(),
        }
    }

    /// Next receipt number for a company, scoped to the payment year
    pub fn next_receipt(&mut self, company: CompanyId, date: NaiveDate) -> String {
        let year = date.year();
        let counter = self.receipts.entry((company, year)).or_insert(0);
        *counter += 1;
        format!("RCPT-{}-{}-{:05}", company, year, counter)
    }

    /// Next pledge number for a company
    pub fn next_pledge_number(&mut self, company: CompanyId) -> String {
        let counter = self.pledges.entry(company).or_insert(0);
        *counter += 1;
        format!("PLG-{}-{:05}", company, counter)
    }
}

impl Default for SequenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
