//! Pledge ledger engine
//!
//! This module provides the PledgeLedger that orchestrates pledge
//! accounting by coordinating the chart of accounts, the journal, the
//! payment book, sequence numbering and the lifecycle state machine.
//!
//! The engine enforces business rules such as:
//! - Pledge status checks before accepting payments
//! - Payment allocation (interest-first by default, explicit splits validated)
//! - Balanced double-entry groups for every financial event
//! - Receipt and pledge-number sequencing per company

use crate::core::allocator::{self, AllocationOrder, Split};
use crate::core::chart::ChartOfAccounts;
use crate::core::daybook::{self, AccountSummary, DailySummary};
use crate::core::journal::Journal;
use crate::core::lifecycle;
use crate::core::numbering::SequenceRegistry;
use crate::core::payments::PaymentBook;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::types::{
    Account, AccountId, AccountStatus, AccountType, CompanyId, CustomerId, EntryDraft, EntryId,
    LedgerError, PaymentId, PaymentMethod, PaymentOutcome, Pledge, PledgeId, PledgePayment,
    PledgeStatus, ReferenceType, SchemeId, UserId, VoucherId, VoucherMaster,
};

/// The standard accounts provisioned for each registered company
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyAccounts {
    pub cash: AccountId,
    pub bank: AccountId,
    pub pledge_loans: AccountId,
    pub customer_root: AccountId,
    pub interest_income: AccountId,
    pub penalty_income: AccountId,
}

/// Pledge accounting engine
///
/// Owns all in-memory stores and exposes the operational surface:
/// company registration, pledge origination, payment recording,
/// lifecycle transitions, reversals, balances and daybook reports.
pub struct PledgeLedger {
    chart: ChartOfAccounts,
    journal: Journal,
    pledges: HashMap<PledgeId, Pledge>,
    payments: PaymentBook,
    vouchers: HashMap<VoucherId, VoucherMaster>,
    next_voucher: VoucherId,
    next_pledge: PledgeId,
    sequences: SequenceRegistry,
    companies: HashMap<CompanyId, CompanyAccounts>,
    allocation: AllocationOrder,
}

impl PledgeLedger {
    /// Create a new PledgeLedger with no companies, pledges or entries
    pub fn new() -> Self {
        PledgeLedger {
            chart: ChartOfAccounts::new(),
            journal: Journal::new(),
            pledges: HashMap::new(),
            payments: PaymentBook::new(),
            vouchers: HashMap::new(),
            next_voucher: 1,
            next_pledge: 1,
            sequences: SequenceRegistry::new(),
            companies: HashMap::new(),
            allocation: AllocationOrder::default(),
        }
    }

    /// Create an engine that allocates principal before interest
    pub fn with_allocation(allocation: AllocationOrder) -> Self {
        PledgeLedger {
            allocation,
            ..PledgeLedger::new()
        }
    }

    /// Register a company and provision its standard chart of accounts
    ///
    /// Creates Cash (1001), Bank (1002), Pledge Loans (1101), Customer
    /// Accounts root (2000), Interest Income (4001) and Penalty Income
    /// (4002). Registering the same company twice is a `DuplicateCode`
    /// error from the first account collision.
    pub fn register_company(&mut self, company: CompanyId) -> Result<CompanyAccounts, LedgerError> {
        let cash = self
            .chart
            .create_account("1001", "Cash", AccountType::Asset, None, company)?;
        let bank = self
            .chart
            .create_account("1002", "Bank", AccountType::Asset, None, company)?;
        let pledge_loans =
            self.chart
                .create_account("1101", "Pledge Loans", AccountType::Asset, None, company)?;
        let customer_root = self.chart.create_account(
            "2000",
            "Customer Accounts",
            AccountType::Liability,
            None,
            company,
        )?;
        let interest_income = self.chart.create_account(
            "4001",
            "Interest Income",
            AccountType::Income,
            None,
            company,
        )?;
        let penalty_income = self.chart.create_account(
            "4002",
            "Penalty Income",
            AccountType::Income,
            None,
            company,
        )?;
        let accounts = CompanyAccounts {
            cash,
            bank,
            pledge_loans,
            customer_root,
            interest_income,
            penalty_income,
        };
        self.companies.insert(company, accounts);
        Ok(accounts)
    }

    fn company_accounts(&self, company: CompanyId) -> Result<CompanyAccounts, LedgerError> {
        self.companies
            .get(&company)
            .copied()
            .ok_or_else(|| LedgerError::unknown_company(company))
    }

    /// Originate a pledge and post its loan disbursement
    ///
    /// Assigns the pledge id and PLG number, records the pledge as
    /// Active, and posts debit Pledge Loans / credit Cash for the total
    /// loan amount under a `pledge` reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the company is unregistered, the loan amount
    /// is not positive, or any charge component is negative.
    #[allow(clippy::too_many_arguments)]
    pub fn open_pledge(
        &mut self,
        company: CompanyId,
        customer: CustomerId,
        scheme: SchemeId,
        pledge_date: NaiveDate,
        due_date: NaiveDate,
        total_loan_amount: Decimal,
        document_charges: Decimal,
        first_month_interest: Decimal,
    ) -> Result<PledgeId, LedgerError> {
        let accounts = self.company_accounts(company)?;
        if total_loan_amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(total_loan_amount));
        }
        if document_charges < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(document_charges));
        }
        if first_month_interest < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(first_month_interest));
        }

        let id = self.next_pledge;
        let pledge_number = self.sequences.next_pledge_number(company);
        let final_amount = total_loan_amount + document_charges + first_month_interest;

        self.journal.post(
            &self.chart,
            pledge_date,
            company,
            ReferenceType::Pledge,
            id,
            vec![
                EntryDraft::debit(
                    accounts.pledge_loans,
                    total_loan_amount,
                    format!("loan disbursement {pledge_number}"),
                ),
                EntryDraft::credit(
                    accounts.cash,
                    total_loan_amount,
                    format!("loan disbursement {pledge_number}"),
                ),
            ],
        )?;

        self.pledges.insert(
            id,
            Pledge {
                id,
                pledge_number,
                customer,
                scheme,
                pledge_date,
                due_date,
                total_loan_amount,
                document_charges,
                first_month_interest,
                final_amount,
                status: PledgeStatus::Active,
                company,
            },
        );
        self.next_pledge += 1;
        Ok(id)
    }

    /// Record a payment against an active pledge
    ///
    /// Allocates the amount across interest, principal and penalty
    /// (explicit split if given, otherwise the configured order), posts
    /// the balanced ledger group, stores the payment row with its
    /// receipt number, and transitions the pledge to Redeemed when the
    /// outstanding reaches zero.
    ///
    /// The ledger group is posted before the payment row is stored, so
    /// a rejected group leaves no trace of the payment.
    pub fn record_payment(
        &mut self,
        pledge_id: PledgeId,
        payment_date: NaiveDate,
        amount: Decimal,
        split: Option<Split>,
        method: PaymentMethod,
        created_by: UserId,
    ) -> Result<PaymentOutcome, LedgerError> {
        let pledge = self
            .pledges
            .get(&pledge_id)
            .ok_or_else(|| LedgerError::unknown_pledge(pledge_id))?
            .clone();
        let accounts = self.company_accounts(pledge.company)?;
        let plan = allocator::plan_payment(
            &pledge,
            amount,
            self.payments.total_paid(pledge_id),
            self.payments.interest_paid(pledge_id),
            self.payments.principal_paid(pledge_id),
            split,
            self.allocation,
        )?;

        let payment_id = self.payments.next_payment_id();
        let drafts = payment_drafts(&accounts, method, amount, &plan.split, &pledge.pledge_number);
        self.journal.post(
            &self.chart,
            payment_date,
            pledge.company,
            ReferenceType::Payment,
            payment_id,
            drafts,
        )?;

        let receipt_number = self.sequences.next_receipt(pledge.company, payment_date);
        let payment = PledgePayment {
            id: payment_id,
            pledge: pledge_id,
            payment_date,
            amount,
            interest_amount: plan.split.interest,
            principal_amount: plan.split.principal,
            penalty_amount: plan.split.penalty,
            method,
            receipt_number,
            created_by,
            company: pledge.company,
        };
        self.payments.insert(payment.clone());

        let status = if plan.redeems {
            let next = lifecycle::transition(pledge.status, PledgeStatus::Redeemed)?;
            if let Some(stored) = self.pledges.get_mut(&pledge_id) {
                stored.status = next;
            }
            next
        } else {
            pledge.status
        };

        Ok(PaymentOutcome {
            payment,
            status,
            outstanding: plan.outstanding_after,
        })
    }

    /// Mark an active pledge as defaulted (auction pending)
    pub fn mark_defaulted(&mut self, pledge_id: PledgeId) -> Result<PledgeStatus, LedgerError> {
        self.set_status(pledge_id, PledgeStatus::Defaulted)
    }

    /// Close an active pledge administratively
    pub fn close_pledge(&mut self, pledge_id: PledgeId) -> Result<PledgeStatus, LedgerError> {
        self.set_status(pledge_id, PledgeStatus::Closed)
    }

    fn set_status(
        &mut self,
        pledge_id: PledgeId,
        to: PledgeStatus,
    ) -> Result<PledgeStatus, LedgerError> {
        let pledge = self
            .pledges
            .get_mut(&pledge_id)
            .ok_or_else(|| LedgerError::unknown_pledge(pledge_id))?;
        let next = lifecycle::transition(pledge.status, to)?;
        pledge.status = next;
        Ok(next)
    }

    /// Outstanding balance of a pledge: final amount minus payments to date
    pub fn outstanding(&self, pledge_id: PledgeId) -> Result<Decimal, LedgerError> {
        let pledge = self
            .pledges
            .get(&pledge_id)
            .ok_or_else(|| LedgerError::unknown_pledge(pledge_id))?;
        Ok(pledge.final_amount - self.payments.total_paid(pledge_id))
    }

    /// Provision a customer sub-account under the company's customer root
    ///
    /// Codes run 2000-001, 2000-002, ... per company.
    pub fn register_customer_account(
        &mut self,
        company: CompanyId,
        name: impl Into<String>,
    ) -> Result<AccountId, LedgerError> {
        let accounts = self.company_accounts(company)?;
        let ordinal = self.chart.child_count(accounts.customer_root) + 1;
        let code = format!("2000-{ordinal:03}");
        self.chart.create_account(
            &code,
            &name.into(),
            AccountType::Liability,
            Some(accounts.customer_root),
            company,
        )
    }

    /// Rename a customer account; postings keep their account id
    pub fn rename_customer_account(
        &mut self,
        account: AccountId,
        name: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.chart.rename(account, &name.into())
    }

    /// Retire a customer account, refusing if it has posted history
    pub fn retire_customer_account(&mut self, account: AccountId) -> Result<(), LedgerError> {
        self.chart.require(account)?;
        if self.journal.account_has_entries(account) {
            return Err(LedgerError::account_has_history(account));
        }
        self.chart.set_status(account, AccountStatus::Inactive)
    }

    /// Reverse a posted transaction group by posting its mirror image
    ///
    /// The reversal goes in under a fresh voucher reference; the
    /// original entries stay untouched.
    pub fn reverse(
        &mut self,
        reference_type: ReferenceType,
        reference_id: u32,
        date: NaiveDate,
        company: CompanyId,
    ) -> Result<Vec<EntryId>, LedgerError> {
        self.company_accounts(company)?;
        let voucher = VoucherMaster {
            id: self.next_voucher,
            voucher_type: "reversal".to_string(),
            date,
            company,
        };
        let ids = self
            .journal
            .reverse(&self.chart, reference_type, reference_id, &voucher)?;
        self.vouchers.insert(voucher.id, voucher);
        self.next_voucher += 1;
        Ok(ids)
    }

    /// Signed balance of an account by its normal-balance convention
    pub fn balance(
        &self,
        account: AccountId,
        as_of: Option<NaiveDate>,
        include_descendants: bool,
    ) -> Result<Decimal, LedgerError> {
        self.journal
            .balance(&self.chart, account, as_of, include_descendants)
    }

    /// Company-wide debit and credit totals up to a date
    pub fn trial_totals(&self, company: CompanyId, as_of: Option<NaiveDate>) -> (Decimal, Decimal) {
        self.journal.trial_totals(company, as_of)
    }

    /// All ledger activity of a company on one date
    pub fn daily_summary(
        &self,
        company: CompanyId,
        date: NaiveDate,
    ) -> Result<DailySummary, LedgerError> {
        daybook::daily_summary(&self.journal, &self.chart, company, date)
    }

    /// The day's activity grouped per account
    pub fn account_wise_summary(
        &self,
        company: CompanyId,
        date: NaiveDate,
    ) -> Result<Vec<AccountSummary>, LedgerError> {
        daybook::account_wise_summary(&self.journal, &self.chart, company, date)
    }

    /// Look up a pledge by id
    pub fn pledge(&self, pledge_id: PledgeId) -> Option<&Pledge> {
        self.pledges.get(&pledge_id)
    }

    /// Total amount paid against a pledge to date
    pub fn payment_total(&self, pledge_id: PledgeId) -> Decimal {
        self.payments.total_paid(pledge_id)
    }

    /// All pledges, ordered by id
    pub fn pledges(&self) -> Vec<&Pledge> {
        let mut all: Vec<&Pledge> = self.pledges.values().collect();
        all.sort_by_key(|pledge| pledge.id);
        all
    }

    /// Whether a company has been registered
    pub fn has_company(&self, company: CompanyId) -> bool {
        self.companies.contains_key(&company)
    }

    /// Look up a stored payment by id
    pub fn payment(&self, payment_id: PaymentId) -> Option<&PledgePayment> {
        self.payments.get(payment_id)
    }

    /// Look up an account node
    pub fn account(&self, account: AccountId) -> Option<&Account> {
        self.chart.get(account)
    }

    /// The chart of accounts
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// The append-only journal
    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

impl Default for PledgeLedger {
    fn default() -> Self {
        PledgeLedger::new()
    }
}

/// Build the balanced entry group for a payment
///
/// Debits cash or bank for the full amount by payment method, credits
/// interest income, pledge loans (principal) and penalty income,
/// skipping zero components.
pub(crate) fn payment_drafts(
    accounts: &CompanyAccounts,
    method: PaymentMethod,
    amount: Decimal,
    split: &Split,
    pledge_number: &str,
) -> Vec<EntryDraft> {
    let receiving = match method {
        PaymentMethod::Cash => accounts.cash,
        PaymentMethod::Bank | PaymentMethod::Upi | PaymentMethod::Card => accounts.bank,
    };
    let mut drafts = vec![EntryDraft::debit(
        receiving,
        amount,
        format!("payment received {pledge_number}"),
    )];
    if split.interest > Decimal::ZERO {
        drafts.push(EntryDraft::credit(
            accounts.interest_income,
            split.interest,
            format!("interest {pledge_number}"),
        ));
    }
    if split.principal > Decimal::ZERO {
        drafts.push(EntryDraft::credit(
            accounts.pledge_loans,
            split.principal,
            format!("principal {pledge_number}"),
        ));
    }
    if split.penalty > Decimal::ZERO {
        drafts.push(EntryDraft::credit(
            accounts.penalty_income,
            split.penalty,
            format!("penalty {pledge_number}"),
        ));
    }
    drafts
}
