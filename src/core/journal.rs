//! Append-only ledger journal
//!
//! The journal is the single atomic transaction boundary for postings: a
//! balanced entry group is validated in full before anything is
//! appended, so partial groups are never visible. Entries are immutable;
//! corrections are new offsetting groups, never edits.
//!
//! # Idempotence
//!
//! Each group is keyed by `(reference_type, reference_id)`. Posting the
//! same key twice (a simulated retry) fails with `DuplicateReference`
//! rather than double-counting.

use crate::core::chart::ChartOfAccounts;
use crate::types::{
    money_tolerance, AccountId, CompanyId, EntryDraft, EntryId, LedgerEntry, LedgerError,
    ReferenceType, VoucherMaster,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Append-only store of balanced ledger entry groups
pub struct Journal {
    entries: Vec<LedgerEntry>,
    /// Reference keys already posted, for retry dedupe
    references: HashSet<(ReferenceType, u32)>,
    next_id: EntryId,
}

impl Journal {
    /// Create an empty journal
    pub fn new() -> Self {
        Journal {
            entries: Vec::new(),
            references: HashSet::new(),
            next_id: 1,
        }
    }

    /// Post a balanced entry group atomically
    ///
    /// Validation runs in full before any entry is appended, so a
    /// failed posting leaves no partial rows.
    ///
    /// # Errors
    ///
    /// * `EmptyPosting` for an empty draft list
    /// * `MalformedEntry` if a line sets both sides or neither
    /// * `InvalidAmount` for a negative side
    /// * `UnknownAccount` if a line targets a missing account or one
    ///   owned by a different company
    /// * `UnbalancedTransaction` when Σdebit != Σcredit (beyond ε)
    /// * `DuplicateReference` when the reference key was already posted
    pub fn post(
        &mut self,
        chart: &ChartOfAccounts,
        date: NaiveDate,
        company: CompanyId,
        reference_type: ReferenceType,
        reference_id: u32,
        drafts: Vec<EntryDraft>,
    ) -> Result<Vec<EntryId>, LedgerError> {
        if drafts.is_empty() {
            return Err(LedgerError::EmptyPosting);
        }
        if self.references.contains(&(reference_type, reference_id)) {
            return Err(LedgerError::duplicate_reference(reference_type, reference_id));
        }

        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for draft in &drafts {
            if draft.debit < Decimal::ZERO {
                return Err(LedgerError::invalid_amount(draft.debit));
            }
            if draft.credit < Decimal::ZERO {
                return Err(LedgerError::invalid_amount(draft.credit));
            }
            let debit_set = draft.debit > Decimal::ZERO;
            let credit_set = draft.credit > Decimal::ZERO;
            if debit_set == credit_set {
                return Err(LedgerError::malformed_entry(draft.account));
            }

            let account = chart.require(draft.account)?;
            if account.company != company {
                return Err(LedgerError::unknown_account(draft.account));
            }

            debits += draft.debit;
            credits += draft.credit;
        }

        if (debits - credits).abs() > money_tolerance() {
            return Err(LedgerError::unbalanced(debits, credits));
        }

        // Validation complete; append the whole group.
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = self.next_id;
            self.next_id += 1;
            self.entries.push(LedgerEntry {
                id,
                account: draft.account,
                debit: draft.debit,
                credit: draft.credit,
                reference_type,
                reference_id,
                narration: draft.narration,
                transaction_date: date,
                company,
            });
            ids.push(id);
        }
        self.references.insert((reference_type, reference_id));
        Ok(ids)
    }

    /// Post the offsetting group for a previously posted reference
    ///
    /// Swaps debit and credit of every entry in the original group and
    /// posts the result under the given voucher, leaving the original
    /// untouched. Fails with `UnknownReference` if no entries exist for
    /// the reference.
    pub fn reverse(
        &mut self,
        chart: &ChartOfAccounts,
        reference_type: ReferenceType,
        reference_id: u32,
        voucher: &VoucherMaster,
    ) -> Result<Vec<EntryId>, LedgerError> {
        let drafts: Vec<EntryDraft> = self
            .entries
            .iter()
            .filter(|e| e.reference_type == reference_type && e.reference_id == reference_id)
            .map(|e| EntryDraft {
                account: e.account,
                debit: e.credit,
                credit: e.debit,
                narration: format!("reversal: {}", e.narration),
            })
            .collect();

        if drafts.is_empty() {
            return Err(LedgerError::unknown_reference(reference_type, reference_id));
        }

        self.post(
            chart,
            voucher.date,
            voucher.company,
            ReferenceType::Voucher,
            voucher.id,
            drafts,
        )
    }

    /// All entries, in posting order
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Entries belonging to one reference group
    pub fn entries_for_reference(
        &self,
        reference_type: ReferenceType,
        reference_id: u32,
    ) -> Vec<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.reference_type == reference_type && e.reference_id == reference_id)
            .collect()
    }

    /// Whether an account has any postings at all
    pub fn account_has_entries(&self, account: AccountId) -> bool {
        self.entries.iter().any(|e| e.account == account)
    }

    /// Signed balance of an account, derived by summation
    ///
    /// The sign convention follows the queried account's type
    /// (asset/expense: debits − credits; others: credits − debits); when
    /// `include_descendants` is set, child accounts inherit the root's
    /// convention. Returns zero for an account with no postings.
    pub fn balance(
        &self,
        chart: &ChartOfAccounts,
        account: AccountId,
        as_of: Option<NaiveDate>,
        include_descendants: bool,
    ) -> Result<Decimal, LedgerError> {
        let root = chart.require(account)?;
        let scope: Vec<AccountId> = if include_descendants {
            chart.subtree(account)
        } else {
            vec![account]
        };

        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for entry in &self.entries {
            if !scope.contains(&entry.account) {
                continue;
            }
            if let Some(cutoff) = as_of {
                if entry.transaction_date > cutoff {
                    continue;
                }
            }
            debits += entry.debit;
            credits += entry.credit;
        }

        Ok(if root.account_type.debit_normal() {
            debits - credits
        } else {
            credits - debits
        })
    }

    /// Total debits and credits for a company up to a date (inclusive)
    ///
    /// The balanced-books invariant says the two totals are always
    /// equal; reporting and tests check it through this accessor.
    pub fn trial_totals(
        &self,
        company: CompanyId,
        as_of: Option<NaiveDate>,
    ) -> (Decimal, Decimal) {
        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for entry in &self.entries {
            if entry.company != company {
                continue;
            }
            if let Some(cutoff) = as_of {
                if entry.transaction_date > cutoff {
                    continue;
                }
            }
            debits += entry.debit;
            credits += entry.credit;
        }
        (debits, credits)
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn chart_with_accounts() -> (ChartOfAccounts, AccountId, AccountId) {
        let mut chart = ChartOfAccounts::new();
        let cash = chart
            .create_account("1001", "Cash", AccountType::Asset, None, 1)
            .unwrap();
        let income = chart
            .create_account("4001", "Interest Income", AccountType::Income, None, 1)
            .unwrap();
        (chart, cash, income)
    }

    #[test]
    fn test_post_balanced_group() {
        let (chart, cash, income) = chart_with_accounts();
        let mut journal = Journal::new();

        let ids = journal
            .post(
                &chart,
                date(2025, 1, 10),
                1,
                ReferenceType::Payment,
                1,
                vec![
                    EntryDraft::debit(cash, Decimal::new(50000, 2), "receipt"),
                    EntryDraft::credit(income, Decimal::new(50000, 2), "interest"),
                ],
            )
            .unwrap();

        assert_eq!(ids.len(), 2);
        assert_eq!(journal.entries().len(), 2);
        let (d, c) = journal.trial_totals(1, None);
        assert_eq!(d, c);
    }

    #[test]
    fn test_unbalanced_group_leaves_nothing() {
        let (chart, cash, income) = chart_with_accounts();
        let mut journal = Journal::new();

        let result = journal.post(
            &chart,
            date(2025, 1, 10),
            1,
            ReferenceType::Payment,
            1,
            vec![
                EntryDraft::debit(cash, Decimal::new(50000, 2), "receipt"),
                EntryDraft::credit(income, Decimal::new(40000, 2), "interest"),
            ],
        );

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::UnbalancedTransaction { .. }
        ));
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn test_duplicate_reference_rejected() {
        let (chart, cash, income) = chart_with_accounts();
        let mut journal = Journal::new();

        let drafts = || {
            vec![
                EntryDraft::debit(cash, Decimal::new(100, 2), "receipt"),
                EntryDraft::credit(income, Decimal::new(100, 2), "interest"),
            ]
        };

        journal
            .post(&chart, date(2025, 1, 10), 1, ReferenceType::Payment, 1, drafts())
            .unwrap();
        let result = journal.post(&chart, date(2025, 1, 10), 1, ReferenceType::Payment, 1, drafts());

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::DuplicateReference { .. }
        ));
        // First group intact, nothing double-counted
        assert_eq!(journal.entries().len(), 2);
    }

    #[test]
    fn test_entry_with_both_sides_rejected() {
        let (chart, cash, _) = chart_with_accounts();
        let mut journal = Journal::new();

        let malformed = EntryDraft {
            account: cash,
            debit: Decimal::new(100, 2),
            credit: Decimal::new(100, 2),
            narration: String::new(),
        };
        let result = journal.post(
            &chart,
            date(2025, 1, 10),
            1,
            ReferenceType::Payment,
            1,
            vec![malformed],
        );

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::MalformedEntry { .. }
        ));
    }

    #[test]
    fn test_empty_posting_rejected() {
        let (chart, _, _) = chart_with_accounts();
        let mut journal = Journal::new();

        let result = journal.post(&chart, date(2025, 1, 10), 1, ReferenceType::Payment, 1, vec![]);
        assert!(matches!(result.unwrap_err(), LedgerError::EmptyPosting));
    }

    #[test]
    fn test_cross_company_account_rejected() {
        let (mut chart, cash, _) = chart_with_accounts();
        let other = chart
            .create_account("1001", "Cash", AccountType::Asset, None, 2)
            .unwrap();
        let mut journal = Journal::new();

        let result = journal.post(
            &chart,
            date(2025, 1, 10),
            1,
            ReferenceType::Payment,
            1,
            vec![
                EntryDraft::debit(cash, Decimal::new(100, 2), ""),
                EntryDraft::credit(other, Decimal::new(100, 2), ""),
            ],
        );

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::UnknownAccount { .. }
        ));
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn test_balance_sign_conventions() {
        let (chart, cash, income) = chart_with_accounts();
        let mut journal = Journal::new();

        journal
            .post(
                &chart,
                date(2025, 1, 10),
                1,
                ReferenceType::Payment,
                1,
                vec![
                    EntryDraft::debit(cash, Decimal::new(50000, 2), ""),
                    EntryDraft::credit(income, Decimal::new(50000, 2), ""),
                ],
            )
            .unwrap();

        // Asset grows on debit, income grows on credit: both positive
        assert_eq!(
            journal.balance(&chart, cash, None, false).unwrap(),
            Decimal::new(50000, 2)
        );
        assert_eq!(
            journal.balance(&chart, income, None, false).unwrap(),
            Decimal::new(50000, 2)
        );
    }

    #[test]
    fn test_balance_as_of_cutoff() {
        let (chart, cash, income) = chart_with_accounts();
        let mut journal = Journal::new();

        for (day, reference) in [(10u32, 1u32), (20, 2)] {
            journal
                .post(
                    &chart,
                    date(2025, 1, day),
                    1,
                    ReferenceType::Payment,
                    reference,
                    vec![
                        EntryDraft::debit(cash, Decimal::new(10000, 2), ""),
                        EntryDraft::credit(income, Decimal::new(10000, 2), ""),
                    ],
                )
                .unwrap();
        }

        assert_eq!(
            journal
                .balance(&chart, cash, Some(date(2025, 1, 15)), false)
                .unwrap(),
            Decimal::new(10000, 2)
        );
        assert_eq!(
            journal.balance(&chart, cash, None, false).unwrap(),
            Decimal::new(20000, 2)
        );
    }

    #[test]
    fn test_balance_includes_descendants() {
        let mut chart = ChartOfAccounts::new();
        let root = chart
            .create_account("2000", "Customer Accounts", AccountType::Liability, None, 1)
            .unwrap();
        let child = chart
            .create_account("2000-001", "Asha", AccountType::Liability, Some(root), 1)
            .unwrap();
        let cash = chart
            .create_account("1001", "Cash", AccountType::Asset, None, 1)
            .unwrap();
        let mut journal = Journal::new();

        journal
            .post(
                &chart,
                date(2025, 1, 10),
                1,
                ReferenceType::Voucher,
                1,
                vec![
                    EntryDraft::debit(cash, Decimal::new(100, 2), ""),
                    EntryDraft::credit(child, Decimal::new(100, 2), ""),
                ],
            )
            .unwrap();

        // Nothing posted on the root directly
        assert_eq!(
            journal.balance(&chart, root, None, false).unwrap(),
            Decimal::ZERO
        );
        // Subtree picks up the child's credit, liability convention
        assert_eq!(
            journal.balance(&chart, root, None, true).unwrap(),
            Decimal::new(100, 2)
        );
    }

    #[test]
    fn test_balance_of_unposted_account_is_zero() {
        let (chart, cash, _) = chart_with_accounts();
        let journal = Journal::new();
        assert_eq!(
            journal.balance(&chart, cash, None, false).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_reverse_posts_swapped_group() {
        let (chart, cash, income) = chart_with_accounts();
        let mut journal = Journal::new();

        journal
            .post(
                &chart,
                date(2025, 1, 10),
                1,
                ReferenceType::Payment,
                7,
                vec![
                    EntryDraft::debit(cash, Decimal::new(50000, 2), "receipt"),
                    EntryDraft::credit(income, Decimal::new(50000, 2), "interest"),
                ],
            )
            .unwrap();

        let voucher = VoucherMaster {
            id: 1,
            voucher_type: "reversal".to_string(),
            date: date(2025, 1, 11),
            company: 1,
        };
        journal
            .reverse(&chart, ReferenceType::Payment, 7, &voucher)
            .unwrap();

        // Original untouched, reversal posted, net balance zero
        assert_eq!(journal.entries().len(), 4);
        assert_eq!(
            journal.balance(&chart, cash, None, false).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            journal.balance(&chart, income, None, false).unwrap(),
            Decimal::ZERO
        );
        let (d, c) = journal.trial_totals(1, None);
        assert_eq!(d, c);
    }

    #[test]
    fn test_reverse_unknown_reference() {
        let (chart, _, _) = chart_with_accounts();
        let mut journal = Journal::new();

        let voucher = VoucherMaster {
            id: 1,
            voucher_type: "reversal".to_string(),
            date: date(2025, 1, 11),
            company: 1,
        };
        let result = journal.reverse(&chart, ReferenceType::Payment, 99, &voucher);
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::UnknownReference { .. }
        ));
    }
}
