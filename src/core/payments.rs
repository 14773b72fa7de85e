//! Payment book
//!
//! Stores the immutable `PledgePayment` rows and maintains a per-pledge
//! index so the allocator can derive outstanding balances by summation.
//! Rows are created exactly once per settlement event; corrections are
//! offsetting ledger groups, never edits here.

use crate::types::{PaymentId, PledgeId, PledgePayment};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Immutable store of payment rows with a per-pledge index
pub struct PaymentBook {
    payments: HashMap<PaymentId, PledgePayment>,
    by_pledge: HashMap<PledgeId, Vec<PaymentId>>,
    next_id: PaymentId,
}

impl PaymentBook {
    /// Create an empty payment book
    pub fn new() -> Self {
        PaymentBook {
            payments: HashMap::new(),
            by_pledge: HashMap::new(),
            next_id: 1,
        }
    }

    /// The id the next inserted payment will receive
    ///
    /// The engine builds the ledger group against this id before
    /// inserting, so the payment row and its entries always agree.
    pub fn next_payment_id(&self) -> PaymentId {
        self.next_id
    }

    /// Insert a payment row
    ///
    /// The caller must have built the row with [`next_payment_id`];
    /// insertion advances the sequence.
    ///
    /// [`next_payment_id`]: PaymentBook::next_payment_id
    pub fn insert(&mut self, payment: PledgePayment) {
        self.by_pledge
            .entry(payment.pledge)
            .or_default()
            .push(payment.id);
        self.next_id = self.next_id.max(payment.id) + 1;
        self.payments.insert(payment.id, payment);
    }

    /// Get a payment by id
    pub fn get(&self, id: PaymentId) -> Option<&PledgePayment> {
        self.payments.get(&id)
    }

    /// All payments recorded against a pledge, in recording order
    pub fn for_pledge(&self, pledge: PledgeId) -> Vec<&PledgePayment> {
        self.by_pledge
            .get(&pledge)
            .map(|ids| ids.iter().filter_map(|id| self.payments.get(id)).collect())
            .unwrap_or_default()
    }

    /// Total amount collected against a pledge
    pub fn total_paid(&self, pledge: PledgeId) -> Decimal {
        self.for_pledge(pledge)
            .iter()
            .fold(Decimal::ZERO, |sum, p| sum + p.amount)
    }

    /// Total interest component collected against a pledge
    pub fn interest_paid(&self, pledge: PledgeId) -> Decimal {
        self.for_pledge(pledge)
            .iter()
            .fold(Decimal::ZERO, |sum, p| sum + p.interest_amount)
    }

    /// Total principal component collected against a pledge
    pub fn principal_paid(&self, pledge: PledgeId) -> Decimal {
        self.for_pledge(pledge)
            .iter()
            .fold(Decimal::ZERO, |sum, p| sum + p.principal_amount)
    }
}

impl Default for PaymentBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::NaiveDate;

    fn payment(id: PaymentId, pledge: PledgeId, amount: i64, interest: i64) -> PledgePayment {
        PledgePayment {
            id,
            pledge,
            payment_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            amount: Decimal::new(amount, 2),
            interest_amount: Decimal::new(interest, 2),
            principal_amount: Decimal::new(amount - interest, 2),
            penalty_amount: Decimal::ZERO,
            method: PaymentMethod::Cash,
            receipt_number: format!("RCPT-1-2025-{:05}", id),
            created_by: 1,
            company: 1,
        }
    }

    #[test]
    fn test_insert_and_sum() {
        let mut book = PaymentBook::new();

        book.insert(payment(1, 5, 100000, 30000));
        book.insert(payment(2, 5, 50000, 10000));
        book.insert(payment(3, 6, 77700, 0));

        assert_eq!(book.total_paid(5), Decimal::new(150000, 2));
        assert_eq!(book.interest_paid(5), Decimal::new(40000, 2));
        assert_eq!(book.principal_paid(5), Decimal::new(110000, 2));
        assert_eq!(book.total_paid(6), Decimal::new(77700, 2));
        assert_eq!(book.for_pledge(5).len(), 2);
    }

    #[test]
    fn test_sums_are_zero_for_unknown_pledge() {
        let book = PaymentBook::new();
        assert_eq!(book.total_paid(9), Decimal::ZERO);
        assert_eq!(book.interest_paid(9), Decimal::ZERO);
        assert_eq!(book.principal_paid(9), Decimal::ZERO);
        assert!(book.for_pledge(9).is_empty());
    }

    #[test]
    fn test_next_payment_id_advances_on_insert() {
        let mut book = PaymentBook::new();
        assert_eq!(book.next_payment_id(), 1);

        book.insert(payment(1, 5, 100, 0));
        assert_eq!(book.next_payment_id(), 2);
        assert!(book.get(1).is_some());
    }
}
