//! Thread-safe pledge ledger
//!
//! Wraps the stores behind locks so payments can be recorded from
//! multiple threads. Pledge state plus per-pledge serialization locks
//! live in DashMap for fine-grained access; the chart, journal and
//! payment book sit behind RwLocks. Payment validation runs under read
//! locks, and the write locks are taken only around the commit (ledger
//! group plus payment row), so payments against different pledges
//! proceed in parallel rather than behind one global writer.
//!
//! Concurrent payments against the SAME pledge serialize on that
//! pledge's lock, which is what makes overpayment detection reliable:
//! the second payer sees the first payer's committed totals.

use crate::core::allocator::{self, AllocationOrder, Split};
use crate::core::chart::ChartOfAccounts;
use crate::core::daybook::{self, AccountSummary, DailySummary};
use crate::core::engine::{payment_drafts, CompanyAccounts};
use crate::core::journal::Journal;
use crate::core::lifecycle;
use crate::core::numbering::SequenceRegistry;
use crate::core::payments::PaymentBook;
use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::types::{
    AccountId, AccountType, CompanyId, CustomerId, EntryDraft, LedgerError, PaymentMethod,
    PaymentOutcome, Pledge, PledgeId, PledgePayment, PledgeStatus, ReferenceType, SchemeId, UserId,
};

fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, LedgerError> {
    lock.read()
        .map_err(|_| LedgerError::storage_unavailable("ledger store lock poisoned"))
}

fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, LedgerError> {
    lock.write()
        .map_err(|_| LedgerError::storage_unavailable("ledger store lock poisoned"))
}

fn mutex_lock<T>(lock: &Mutex<T>) -> Result<MutexGuard<'_, T>, LedgerError> {
    lock.lock()
        .map_err(|_| LedgerError::storage_unavailable("ledger store lock poisoned"))
}

/// Thread-safe pledge ledger for concurrent payment recording
///
/// Cheap to clone; clones share the same underlying stores.
#[derive(Clone)]
pub struct SharedPledgeLedger {
    inner: Arc<Shared>,
}

struct Shared {
    chart: RwLock<ChartOfAccounts>,
    journal: RwLock<Journal>,
    payments: RwLock<PaymentBook>,
    pledges: DashMap<PledgeId, Pledge>,
    pledge_locks: DashMap<PledgeId, Arc<Mutex<()>>>,
    companies: DashMap<CompanyId, CompanyAccounts>,
    sequences: Mutex<SequenceRegistry>,
    next_pledge: Mutex<PledgeId>,
    allocation: AllocationOrder,
}

impl SharedPledgeLedger {
    pub fn new() -> Self {
        SharedPledgeLedger {
            inner: Arc::new(Shared {
                chart: RwLock::new(ChartOfAccounts::new()),
                journal: RwLock::new(Journal::new()),
                payments: RwLock::new(PaymentBook::new()),
                pledges: DashMap::new(),
                pledge_locks: DashMap::new(),
                companies: DashMap::new(),
                sequences: Mutex::new(SequenceRegistry::new()),
                next_pledge: Mutex::new(1),
                allocation: AllocationOrder::default(),
            }),
        }
    }

    /// Register a company and provision its standard accounts
    pub fn register_company(&self, company: CompanyId) -> Result<CompanyAccounts, LedgerError> {
        let mut chart = write_lock(&self.inner.chart)?;
        let cash = chart.create_account("1001", "Cash", AccountType::Asset, None, company)?;
        let bank = chart.create_account("1002", "Bank", AccountType::Asset, None, company)?;
        let pledge_loans =
            chart.create_account("1101", "Pledge Loans", AccountType::Asset, None, company)?;
        let customer_root = chart.create_account(
            "2000",
            "Customer Accounts",
            AccountType::Liability,
            None,
            company,
        )?;
        let interest_income =
            chart.create_account("4001", "Interest Income", AccountType::Income, None, company)?;
        let penalty_income =
            chart.create_account("4002", "Penalty Income", AccountType::Income, None, company)?;
        let accounts = CompanyAccounts {
            cash,
            bank,
            pledge_loans,
            customer_root,
            interest_income,
            penalty_income,
        };
        self.inner.companies.insert(company, accounts);
        Ok(accounts)
    }

    fn company_accounts(&self, company: CompanyId) -> Result<CompanyAccounts, LedgerError> {
        self.inner
            .companies
            .get(&company)
            .map(|entry| *entry.value())
            .ok_or_else(|| LedgerError::unknown_company(company))
    }

    fn pledge_lock(&self, pledge_id: PledgeId) -> Arc<Mutex<()>> {
        self.inner
            .pledge_locks
            .entry(pledge_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Originate a pledge and post its loan disbursement
    #[allow(clippy::too_many_arguments)]
    pub fn open_pledge(
        &self,
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

        let mut next_pledge = mutex_lock(&self.inner.next_pledge)?;
        let id = *next_pledge;
        let pledge_number = mutex_lock(&self.inner.sequences)?.next_pledge_number(company);
        let final_amount = total_loan_amount + document_charges + first_month_interest;

        {
            let chart = read_lock(&self.inner.chart)?;
            let mut journal = write_lock(&self.inner.journal)?;
            journal.post(
                &chart,
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
        }

        self.inner.pledges.insert(
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
        *next_pledge += 1;
        Ok(id)
    }

    /// Record a payment, serialized per pledge
    ///
    /// The pledge's lock is held from reading prior totals through the
    /// commit, so two racing payments that together exceed the
    /// outstanding cannot both succeed.
    pub fn record_payment(
        &self,
        pledge_id: PledgeId,
        payment_date: NaiveDate,
        amount: Decimal,
        split: Option<Split>,
        method: PaymentMethod,
        created_by: UserId,
    ) -> Result<PaymentOutcome, LedgerError> {
        let lock = self.pledge_lock(pledge_id);
        let _guard = lock
            .lock()
            .map_err(|_| LedgerError::storage_unavailable("pledge lock poisoned"))?;

        let pledge = self
            .inner
            .pledges
            .get(&pledge_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LedgerError::unknown_pledge(pledge_id))?;
        let accounts = self.company_accounts(pledge.company)?;

        // Planning needs only this pledge's prior totals, which the
        // pledge lock already pins; a read lock keeps other pledges'
        // payments flowing while we validate
        let plan = {
            let payments = read_lock(&self.inner.payments)?;
            allocator::plan_payment(
                &pledge,
                amount,
                payments.total_paid(pledge_id),
                payments.interest_paid(pledge_id),
                payments.principal_paid(pledge_id),
                split,
                self.inner.allocation,
            )?
        };
        let drafts = payment_drafts(&accounts, method, amount, &plan.split, &pledge.pledge_number);
        let receipt_number =
            mutex_lock(&self.inner.sequences)?.next_receipt(pledge.company, payment_date);

        // Write locks cover only the commit. The payment id is drawn
        // inside them so racing commits on other pledges can never
        // collide on a reference key.
        let payment = {
            let chart = read_lock(&self.inner.chart)?;
            let mut journal = write_lock(&self.inner.journal)?;
            let mut payments = write_lock(&self.inner.payments)?;

            let payment_id = payments.next_payment_id();
            journal.post(
                &chart,
                payment_date,
                pledge.company,
                ReferenceType::Payment,
                payment_id,
                drafts,
            )?;
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
            payments.insert(payment.clone());
            payment
        };

        let status = if plan.redeems {
            let next = lifecycle::transition(pledge.status, PledgeStatus::Redeemed)?;
            if let Some(mut stored) = self.inner.pledges.get_mut(&pledge_id) {
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

    /// Mark an active pledge as defaulted
    pub fn mark_defaulted(&self, pledge_id: PledgeId) -> Result<PledgeStatus, LedgerError> {
        self.set_status(pledge_id, PledgeStatus::Defaulted)
    }

    /// Close an active pledge administratively
    pub fn close_pledge(&self, pledge_id: PledgeId) -> Result<PledgeStatus, LedgerError> {
        self.set_status(pledge_id, PledgeStatus::Closed)
    }

    fn set_status(&self, pledge_id: PledgeId, to: PledgeStatus) -> Result<PledgeStatus, LedgerError> {
        let lock = self.pledge_lock(pledge_id);
        let _guard = lock
            .lock()
            .map_err(|_| LedgerError::storage_unavailable("pledge lock poisoned"))?;
        let mut pledge = self
            .inner
            .pledges
            .get_mut(&pledge_id)
            .ok_or_else(|| LedgerError::unknown_pledge(pledge_id))?;
        let next = lifecycle::transition(pledge.status, to)?;
        pledge.status = next;
        Ok(next)
    }

    /// Outstanding balance of a pledge
    pub fn outstanding(&self, pledge_id: PledgeId) -> Result<Decimal, LedgerError> {
        let pledge = self
            .inner
            .pledges
            .get(&pledge_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LedgerError::unknown_pledge(pledge_id))?;
        let payments = read_lock(&self.inner.payments)?;
        Ok(pledge.final_amount - payments.total_paid(pledge_id))
    }

    /// Look up a pledge snapshot
    pub fn pledge(&self, pledge_id: PledgeId) -> Option<Pledge> {
        self.inner
            .pledges
            .get(&pledge_id)
            .map(|entry| entry.value().clone())
    }

    /// Signed balance of an account by its normal-balance convention
    pub fn balance(
        &self,
        account: AccountId,
        as_of: Option<NaiveDate>,
        include_descendants: bool,
    ) -> Result<Decimal, LedgerError> {
        let chart = read_lock(&self.inner.chart)?;
        let journal = read_lock(&self.inner.journal)?;
        journal.balance(&chart, account, as_of, include_descendants)
    }

    /// All ledger activity of a company on one date
    pub fn daily_summary(
        &self,
        company: CompanyId,
        date: NaiveDate,
    ) -> Result<DailySummary, LedgerError> {
        let chart = read_lock(&self.inner.chart)?;
        let journal = read_lock(&self.inner.journal)?;
        daybook::daily_summary(&journal, &chart, company, date)
    }

    /// The day's activity grouped per account
    pub fn account_wise_summary(
        &self,
        company: CompanyId,
        date: NaiveDate,
    ) -> Result<Vec<AccountSummary>, LedgerError> {
        let chart = read_lock(&self.inner.chart)?;
        let journal = read_lock(&self.inner.journal)?;
        daybook::account_wise_summary(&journal, &chart, company, date)
    }
}

impl Default for SharedPledgeLedger {
    fn default() -> Self {
        SharedPledgeLedger::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger_with_pledge() -> (SharedPledgeLedger, PledgeId, CompanyAccounts) {
        let ledger = SharedPledgeLedger::new();
        let accounts = ledger.register_company(1).unwrap();
        let pledge = ledger
            .open_pledge(
                1,
                10,
                1,
                date(2025, 1, 1),
                date(2025, 4, 1),
                Decimal::new(5000000, 2),
                Decimal::new(50000, 2),
                Decimal::new(50000, 2),
            )
            .unwrap();
        (ledger, pledge, accounts)
    }

    #[test]
    fn test_single_threaded_payment() {
        let (ledger, pledge, _) = ledger_with_pledge();
        let outcome = ledger
            .record_payment(
                pledge,
                date(2025, 2, 1),
                Decimal::new(5100000, 2),
                None,
                PaymentMethod::Cash,
                1,
            )
            .unwrap();
        assert_eq!(outcome.status, PledgeStatus::Redeemed);
        assert_eq!(ledger.outstanding(pledge).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_racing_payments_never_overshoot() {
        let (ledger, pledge, _) = ledger_with_pledge();
        // Each 30000.00; outstanding 51000.00 only fits one such pair
        // with room for 21000.00, so exactly one of any overshooting
        // combination fails
        let mut handles = Vec::new();
        for _ in 0..3 {
            let ledger = ledger.clone();
            handles.push(thread::spawn(move || {
                ledger.record_payment(
                    pledge,
                    date(2025, 2, 1),
                    Decimal::new(3000000, 2),
                    None,
                    PaymentMethod::Cash,
                    1,
                )
            }));
        }
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let succeeded = results.iter().filter(|r| r.is_ok()).count();

        // 51000 outstanding admits exactly one 30000 payment
        assert_eq!(succeeded, 1);
        assert!(ledger.outstanding(pledge).unwrap() >= Decimal::ZERO);
        for result in results.iter().filter(|r| r.is_err()) {
            assert!(matches!(
                result,
                Err(LedgerError::OverpaymentNotAllowed { .. })
            ));
        }
    }

    #[test]
    fn test_concurrent_payments_across_pledges() {
        let ledger = SharedPledgeLedger::new();
        let accounts = ledger.register_company(1).unwrap();
        let pledges: Vec<PledgeId> = (0..4)
            .map(|_| {
                ledger
                    .open_pledge(
                        1,
                        10,
                        1,
                        date(2025, 1, 1),
                        date(2025, 4, 1),
                        Decimal::new(1000000, 2),
                        Decimal::ZERO,
                        Decimal::ZERO,
                    )
                    .unwrap()
            })
            .collect();

        let handles: Vec<_> = pledges
            .iter()
            .map(|&pledge| {
                let ledger = ledger.clone();
                thread::spawn(move || {
                    ledger
                        .record_payment(
                            pledge,
                            date(2025, 2, 1),
                            Decimal::new(1000000, 2),
                            None,
                            PaymentMethod::Cash,
                            1,
                        )
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            let outcome = handle.join().unwrap();
            assert_eq!(outcome.status, PledgeStatus::Redeemed);
        }

        // Four disbursements out, four repayments in
        assert_eq!(
            ledger.balance(accounts.cash, None, false).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_parallel_commits_draw_distinct_payment_ids() {
        let ledger = SharedPledgeLedger::new();
        ledger.register_company(1).unwrap();
        let pledges: Vec<PledgeId> = (0..8)
            .map(|_| {
                ledger
                    .open_pledge(
                        1,
                        10,
                        1,
                        date(2025, 1, 1),
                        date(2025, 4, 1),
                        Decimal::new(1000000, 2),
                        Decimal::ZERO,
                        Decimal::ZERO,
                    )
                    .unwrap()
            })
            .collect();

        // Payments on distinct pledges race through validation in
        // parallel; every commit must still land under its own
        // reference key
        let handles: Vec<_> = pledges
            .iter()
            .map(|&pledge| {
                let ledger = ledger.clone();
                thread::spawn(move || {
                    ledger
                        .record_payment(
                            pledge,
                            date(2025, 2, 1),
                            Decimal::new(250000, 2),
                            None,
                            PaymentMethod::Cash,
                            1,
                        )
                        .unwrap()
                        .payment
                        .id
                })
            })
            .collect();
        let mut ids: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_terminal_pledge_rejects_payment() {
        let (ledger, pledge, _) = ledger_with_pledge();
        ledger.mark_defaulted(pledge).unwrap();
        let result = ledger.record_payment(
            pledge,
            date(2025, 2, 1),
            Decimal::new(10000, 2),
            None,
            PaymentMethod::Cash,
            1,
        );
        assert!(matches!(result, Err(LedgerError::PledgeNotActive { .. })));
    }

    #[test]
    fn test_receipt_numbers_stay_unique_under_contention() {
        let ledger = SharedPledgeLedger::new();
        ledger.register_company(1).unwrap();
        let pledges: Vec<PledgeId> = (0..8)
            .map(|_| {
                ledger
                    .open_pledge(
                        1,
                        10,
                        1,
                        date(2025, 1, 1),
                        date(2025, 4, 1),
                        Decimal::new(1000000, 2),
                        Decimal::ZERO,
                        Decimal::ZERO,
                    )
                    .unwrap()
            })
            .collect();

        let handles: Vec<_> = pledges
            .iter()
            .map(|&pledge| {
                let ledger = ledger.clone();
                thread::spawn(move || {
                    ledger
                        .record_payment(
                            pledge,
                            date(2025, 2, 1),
                            Decimal::new(500000, 2),
                            None,
                            PaymentMethod::Cash,
                            1,
                        )
                        .unwrap()
                        .payment
                        .receipt_number
                })
            })
            .collect();
        let mut receipts: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        receipts.sort();
        receipts.dedup();
        assert_eq!(receipts.len(), 8);
    }
}
