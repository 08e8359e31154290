//! Lifecycle plans
//!
//! Each lifecycle scenario is data: the setup steps that bring a fresh offer
//! into the starting state, the transition under test, and what the gateway
//! is expected to answer.

use std::fmt;

use crate::models::{LifecycleCase, OfferStatus};

/// Error text the gateway returns for every illegal transition
pub const TRANSITION_REJECTED: &str = "invalid offer status transition";

/// One side-effecting call against an offer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Pause,
    Reactivate,
    Cancel,
    /// Create a pay-in order against the offer and wait until it is PROCESSING
    CreateOrder,
}

impl Step {
    pub fn method(&self) -> &'static str {
        match self {
            Step::Pause => "PauseOffer",
            Step::Reactivate => "ReactivateOffer",
            Step::Cancel => "CancelOffer",
            Step::CreateOrder => "CreateOrder",
        }
    }

    /// Status after applying this step, or `None` when the gateway must reject it
    pub fn next_status(&self, current: OfferStatus, has_orders: bool) -> Option<OfferStatus> {
        match (self, current) {
            (Step::Pause, OfferStatus::Active) => Some(OfferStatus::OnHold),
            (Step::Reactivate, OfferStatus::OnHold) => Some(OfferStatus::Active),
            (Step::Cancel, OfferStatus::Active | OfferStatus::OnHold) if has_orders => {
                Some(OfferStatus::Inactive)
            }
            (Step::Cancel, OfferStatus::Active | OfferStatus::OnHold) => {
                Some(OfferStatus::Canceled)
            }
            (Step::CreateOrder, status) => Some(status),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method())
    }
}

/// Expected answer to the targeted transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expectation {
    Status(OfferStatus),
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecyclePlan {
    pub case: LifecycleCase,
    /// Cancel every other ACTIVE offer first so the new order lands on ours
    pub clean_slate: bool,
    pub setup: &'static [Step],
    pub target: Step,
    pub expect: Expectation,
}

impl LifecyclePlan {
    pub fn for_case(case: LifecycleCase) -> Self {
        use Expectation::{Rejected, Status};
        use LifecycleCase as C;
        use Step::{Cancel, CreateOrder, Pause, Reactivate};

        let (clean_slate, setup, target, expect): (bool, &'static [Step], Step, Expectation) =
            match case {
                C::PauseOffer => (false, &[], Pause, Status(OfferStatus::OnHold)),
                C::ActivatePausedOffer => (false, &[Pause], Reactivate, Status(OfferStatus::Active)),
                C::CancelOfferWithoutOrders => (false, &[], Cancel, Status(OfferStatus::Canceled)),
                C::CancelActiveOfferWithOrders => {
                    (true, &[CreateOrder], Cancel, Status(OfferStatus::Inactive))
                }
                C::OnHoldToInactive => {
                    (true, &[CreateOrder, Pause], Cancel, Status(OfferStatus::Inactive))
                }
                C::OnHoldToCanceled => (false, &[Pause], Cancel, Status(OfferStatus::Canceled)),
                C::PauseAlreadyPaused => (false, &[Pause], Pause, Rejected),
                C::ReactivateActive => (false, &[], Reactivate, Rejected),
                C::ReactivateInactive => (true, &[CreateOrder, Cancel], Reactivate, Rejected),
                C::CancelInactive => (true, &[CreateOrder, Cancel], Cancel, Rejected),
                C::CancelCanceled => (false, &[Cancel], Cancel, Rejected),
                C::ReactivateCanceled => (false, &[Cancel], Reactivate, Rejected),
                C::PauseCanceled => (false, &[Cancel], Pause, Rejected),
                C::PauseInactive => (true, &[CreateOrder, Cancel], Pause, Rejected),
            };

        Self {
            case,
            clean_slate,
            setup,
            target,
            expect,
        }
    }

    /// Offer status once every setup step has been applied to a new offer
    #[cfg(test)]
    pub fn starting_status(&self) -> Option<OfferStatus> {
        let mut status = OfferStatus::Active;
        let mut has_orders = false;
        for step in self.setup {
            has_orders |= *step == Step::CreateOrder;
            status = step.next_status(status, has_orders)?;
        }
        Some(status)
    }

    #[cfg(test)]
    pub fn has_orders(&self) -> bool {
        self.setup.contains(&Step::CreateOrder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_plan_agrees_with_the_state_machine() {
        for case in LifecycleCase::all() {
            let plan = LifecyclePlan::for_case(case);
            let start = plan
                .starting_status()
                .unwrap_or_else(|| panic!("{} setup is not reachable", case.name()));
            let predicted = plan.target.next_status(start, plan.has_orders());
            let expected = match plan.expect {
                Expectation::Status(status) => Some(status),
                Expectation::Rejected => None,
            };
            assert_eq!(predicted, expected, "{}", case.name());
        }
    }

    #[test]
    fn test_order_dependent_plans_clear_other_offers() {
        for case in LifecycleCase::all() {
            let plan = LifecyclePlan::for_case(case);
            assert_eq!(plan.clean_slate, plan.has_orders(), "{}", case.name());
        }
    }

    #[test]
    fn test_cancel_terminal_state_depends_on_orders() {
        assert_eq!(
            Step::Cancel.next_status(OfferStatus::Active, false),
            Some(OfferStatus::Canceled)
        );
        assert_eq!(
            Step::Cancel.next_status(OfferStatus::OnHold, true),
            Some(OfferStatus::Inactive)
        );
        assert_eq!(Step::Cancel.next_status(OfferStatus::Inactive, true), None);
    }

    #[test]
    fn test_starting_states() {
        let plan = LifecyclePlan::for_case(LifecycleCase::PauseInactive);
        assert_eq!(plan.starting_status(), Some(OfferStatus::Inactive));
        let plan = LifecyclePlan::for_case(LifecycleCase::ActivatePausedOffer);
        assert_eq!(plan.starting_status(), Some(OfferStatus::OnHold));
        assert_eq!(Step::Reactivate.to_string(), "ReactivateOffer");
    }
}
