//! Chart of accounts store
//!
//! Maintains the hierarchical account registry for all companies. The
//! hierarchy is an arena of `Account` records indexed by id with the
//! parent stored as an optional id reference; tree traversal is an
//! explicit iterative walk. The store holds no balances: those are
//! always derived from the journal.

use crate::types::{Account, AccountId, AccountStatus, AccountType, CompanyId, LedgerError};
use std::collections::HashMap;

/// Hierarchical account registry
///
/// Codes are unique per `(company, code)`; ids are globally unique and
/// assigned by the store. Parents must pre-exist and belong to the same
/// company, so the parent chain can never form a cycle.
pub struct ChartOfAccounts {
    accounts: HashMap<AccountId, Account>,
    /// Index enforcing company-scoped code uniqueness
    codes: HashMap<(CompanyId, String), AccountId>,
    next_id: AccountId,
}

impl ChartOfAccounts {
    /// Create an empty chart
    pub fn new() -> Self {
        ChartOfAccounts {
            accounts: HashMap::new(),
            codes: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a new account
    ///
    /// # Errors
    ///
    /// * `DuplicateCode` if `(company, code)` is already taken
    /// * `InvalidParent` if the parent does not exist or belongs to
    ///   another company
    pub fn create_account(
        &mut self,
        code: &str,
        name: &str,
        account_type: AccountType,
        parent: Option<AccountId>,
        company: CompanyId,
    ) -> Result<AccountId, LedgerError> {
        let key = (company, code.to_string());
        if self.codes.contains_key(&key) {
            return Err(LedgerError::duplicate_code(company, code));
        }

        if let Some(parent_id) = parent {
            match self.accounts.get(&parent_id) {
                Some(parent_account) if parent_account.company == company => {}
                _ => return Err(LedgerError::invalid_parent(parent_id)),
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.accounts
            .insert(id, Account::new(id, code, name, account_type, parent, company));
        self.codes.insert(key, id);
        Ok(id)
    }

    /// Get an account by id
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Get an account by id, failing with `UnknownAccount`
    pub fn require(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts
            .get(&id)
            .ok_or_else(|| LedgerError::unknown_account(id))
    }

    /// Look up an account id by company-scoped code
    pub fn lookup(&self, company: CompanyId, code: &str) -> Option<AccountId> {
        self.codes.get(&(company, code.to_string())).copied()
    }

    /// Rename an account (customer display-name changes propagate here)
    pub fn rename(&mut self, id: AccountId, name: &str) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| LedgerError::unknown_account(id))?;
        account.name = name.to_string();
        Ok(())
    }

    /// Set the active/inactive status of an account
    pub fn set_status(&mut self, id: AccountId, status: AccountStatus) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| LedgerError::unknown_account(id))?;
        account.status = status;
        Ok(())
    }

    /// Ids of an account and all its descendants
    ///
    /// Iterative walk over the parent references; used by balance
    /// queries that include child accounts.
    pub fn subtree(&self, root: AccountId) -> Vec<AccountId> {
        let mut result = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            result.push(id);
            for account in self.accounts.values() {
                if account.parent == Some(id) {
                    stack.push(account.id);
                }
            }
        }
        result
    }

    /// Number of direct children of an account
    pub fn child_count(&self, parent: AccountId) -> usize {
        self.accounts
            .values()
            .filter(|a| a.parent == Some(parent))
            .count()
    }

    /// All accounts of a company, sorted by code for deterministic output
    pub fn accounts_for_company(&self, company: CompanyId) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self
            .accounts
            .values()
            .filter(|a| a.company == company)
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }
}

impl Default for ChartOfAccounts {
    fn default() -> Self {
        Self::new()
    }
}
