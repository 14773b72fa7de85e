//! Chart-of-accounts node types
//!
//! This module defines the Account structure and the balance-sign
//! conventions attached to each account type.

use serde::{Deserialize, Serialize};

/// Account identifier, assigned by the chart of accounts store
pub type AccountId = u32;

/// Company (tenant) identifier
pub type CompanyId = u16;

/// Ledger account classification
///
/// The type decides which side of the books increases the account:
/// assets and expenses grow on debit, liabilities, income and equity
/// grow on credit. Balance queries are signed accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Income,
    Expense,
    Equity,
}

impl AccountType {
    /// Whether this account type has a debit-normal balance
    ///
    /// Debit-normal accounts report balance as Σdebit − Σcredit;
    /// credit-normal accounts as Σcredit − Σdebit.
    pub fn debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }
}

/// Account lifecycle status
///
/// Accounts are never deleted; a retired account is marked inactive so
/// its ledger history stays addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// A node in the chart of accounts
///
/// Accounts form a company-scoped tree through the optional `parent`
/// reference (customer sub-accounts nest under a "Customer Accounts"
/// liability root). Balances are never stored here; they are always
/// derived by summing ledger entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account id
    pub id: AccountId,

    /// Human-readable account code, unique per company (e.g. "2000-007")
    pub code: String,

    /// Display name
    pub name: String,

    /// Classification driving the balance-sign convention
    pub account_type: AccountType,

    /// Parent account forming the hierarchy; `None` for roots
    pub parent: Option<AccountId>,

    /// Owning company
    pub company: CompanyId,

    /// Active/inactive flag (soft-disable, never hard delete)
    pub status: AccountStatus,
}

impl Account {
    /// Create a new active account
    pub fn new(
        id: AccountId,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        parent: Option<AccountId>,
        company: CompanyId,
    ) -> Self {
        Account {
            id,
            code: code.into(),
            name: name.into(),
            account_type,
            parent,
            company,
            status: AccountStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccountType::Asset, true)]
    #[case(AccountType::Expense, true)]
    #[case(AccountType::Liability, false)]
    #[case(AccountType::Income, false)]
    #[case(AccountType::Equity, false)]
    fn test_debit_normal_convention(#[case] account_type: AccountType, #[case] expected: bool) {
        assert_eq!(account_type.debit_normal(), expected);
    }

    #[test]
    fn test_new_account_starts_active() {
        let account = Account::new(1, "1001", "Cash", AccountType::Asset, None, 1);
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.parent, None);
        assert_eq!(account.code, "1001");
    }
}
