//! Pledge lifecycle state machine
//!
//! Pledge status is a closed enumeration with an explicit transition
//! table; anything not listed is rejected. `Active → Redeemed` is the
//! only transition triggered automatically (by the payment allocator
//! when the outstanding balance reaches zero); `Closed` and `Defaulted`
//! require explicit administrative calls.

use crate::types::{LedgerError, PledgeStatus};

/// Validate a pledge status transition
///
/// Returns the target status when the transition is allowed.
///
/// # Errors
///
/// `InvalidTransition` for anything outside the table — terminal states
/// accept no further transitions, and `Closed` is reachable from
/// `Active` only.
pub fn transition(from: PledgeStatus, to: PledgeStatus) -> Result<PledgeStatus, LedgerError> {
    use PledgeStatus::*;
    match (from, to) {
        (Active, Redeemed) | (Active, Closed) | (Active, Defaulted) => Ok(to),
        _ => Err(LedgerError::invalid_transition(from, to)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PledgeStatus::Active, PledgeStatus::Redeemed)]
    #[case(PledgeStatus::Active, PledgeStatus::Closed)]
    #[case(PledgeStatus::Active, PledgeStatus::Defaulted)]
    fn test_allowed_transitions(#[case] from: PledgeStatus, #[case] to: PledgeStatus) {
        assert_eq!(transition(from, to).unwrap(), to);
    }

    #[rstest]
    #[case(PledgeStatus::Active, PledgeStatus::Active)]
    #[case(PledgeStatus::Redeemed, PledgeStatus::Active)]
    #[case(PledgeStatus::Redeemed, PledgeStatus::Closed)]
    #[case(PledgeStatus::Redeemed, PledgeStatus::Defaulted)]
    #[case(PledgeStatus::Closed, PledgeStatus::Redeemed)]
    #[case(PledgeStatus::Defaulted, PledgeStatus::Redeemed)]
    #[case(PledgeStatus::Defaulted, PledgeStatus::Closed)]
    fn test_rejected_transitions(#[case] from: PledgeStatus, #[case] to: PledgeStatus) {
        assert!(matches!(
            transition(from, to).unwrap_err(),
            LedgerError::InvalidTransition { .. }
        ));
    }
}
