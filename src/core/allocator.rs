//! Payment allocation
//!
//! Pure planning logic for splitting an incoming payment into
//! interest/principal/penalty components and deciding whether the
//! pledge redeems. No storage access happens here: the caller supplies
//! the pledge snapshot and the prior-payment sums, and commits the plan
//! atomically afterwards.

use crate::types::{money_tolerance, LedgerError, Pledge, PledgeStatus};
use rust_decimal::Decimal;

/// Order in which a default (unspecified) split is applied
///
/// Interest-first is the pawn-lending convention and the default, but
/// the policy is configuration, not law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationOrder {
    /// Satisfy accrued interest first, remainder to principal
    #[default]
    InterestFirst,
    /// Reduce principal first, remainder to interest
    PrincipalFirst,
}

/// Interest/principal/penalty component breakdown of a payment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    pub interest: Decimal,
    pub principal: Decimal,
    pub penalty: Decimal,
}

impl Split {
    pub fn total(&self) -> Decimal {
        self.interest + self.principal + self.penalty
    }
}

/// A validated payment ready to be committed
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentPlan {
    pub split: Split,
    /// Outstanding balance once this payment lands
    pub outstanding_after: Decimal,
    /// Whether the payment takes the balance to zero (within ε)
    pub redeems: bool,
}

/// Validate a payment and plan its component split
///
/// Implements the allocation algorithm: reject non-positive amounts and
/// payments against non-active pledges; compute the outstanding balance
/// from the prior-payment sum; reject overpayment rather than silently
/// capping; honour an explicit split when its components reconcile, or
/// apply the configured default order otherwise. The prior interest and
/// principal sums cap what the default orders may still allocate to
/// each bucket.
///
/// # Errors
///
/// * `PledgeNotActive` for terminal-state pledges
/// * `InvalidAmount` for `amount <= 0` or a negative explicit component
/// * `OverpaymentNotAllowed` when the amount exceeds the outstanding
///   balance beyond ε
/// * `SplitMismatch` when explicit components do not sum to the amount
pub fn plan_payment(
    pledge: &Pledge,
    amount: Decimal,
    prior_paid: Decimal,
    prior_interest_paid: Decimal,
    prior_principal_paid: Decimal,
    explicit: Option<Split>,
    order: AllocationOrder,
) -> Result<PaymentPlan, LedgerError> {
    if pledge.status != PledgeStatus::Active {
        return Err(LedgerError::pledge_not_active(pledge.id, pledge.status));
    }
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(amount));
    }

    let outstanding = pledge.final_amount - prior_paid;
    if amount > outstanding + money_tolerance() {
        return Err(LedgerError::overpayment(pledge.id, outstanding, amount));
    }

    let split = match explicit {
        Some(split) => {
            for component in [split.interest, split.principal, split.penalty] {
                if component < Decimal::ZERO {
                    return Err(LedgerError::invalid_amount(component));
                }
            }
            if (split.total() - amount).abs() > money_tolerance() {
                return Err(LedgerError::split_mismatch(
                    amount,
                    split.interest,
                    split.principal,
                    split.penalty,
                ));
            }
            split
        }
        None => default_split(pledge, amount, prior_interest_paid, prior_principal_paid, order),
    };

    let outstanding_after = outstanding - amount;
    Ok(PaymentPlan {
        split,
        outstanding_after,
        redeems: outstanding_after <= money_tolerance(),
    })
}

/// Apply the configured default allocation order
///
/// Accrued interest is the pledge's first-month interest less what has
/// already been collected, floored at zero; likewise the principal
/// bucket never absorbs more than the disbursed loan less principal
/// already collected. Penalty is never allocated by default; it only
/// arrives through an explicit split.
fn default_split(
    pledge: &Pledge,
    amount: Decimal,
    prior_interest_paid: Decimal,
    prior_principal_paid: Decimal,
    order: AllocationOrder,
) -> Split {
    let accrued_interest = (pledge.first_month_interest - prior_interest_paid).max(Decimal::ZERO);
    let open_principal =
        (pledge.total_loan_amount - prior_principal_paid).max(Decimal::ZERO);
    match order {
        AllocationOrder::InterestFirst => {
            let interest = amount.min(accrued_interest);
            Split {
                interest,
                principal: amount - interest,
                penalty: Decimal::ZERO,
            }
        }
        AllocationOrder::PrincipalFirst => {
            let principal = amount.min(open_principal);
            Split {
                interest: amount - principal,
                principal,
                penalty: Decimal::ZERO,
            }
        }
    }
}
