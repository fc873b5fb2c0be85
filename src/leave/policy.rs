//! Role-based approval policy for leave requests, as pure lookup tables.
//!
//! The chain always starts one level above the submitter: a worker's
//! request waits for a supervisor, a supervisor's for a manager, a
//! manager's for the director. Rejection short-circuits the chain from
//! any pending state; nothing moves once a request is finalized.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::model::{leave_request::LeaveStatus, role::Role};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Outcome string recorded in the approval log.
    pub fn as_outcome(&self) -> &'static str {
        match self {
            Decision::Approve => "Approved",
            Decision::Reject => "Rejected",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TransitionError {
    /// The request already reached Approved or Rejected.
    Finalized,
    /// The (role, status) pair holds no authority for this decision.
    NotAuthorized,
}

/// Initial status for a fresh submission, keyed on the submitter's role.
/// Directors and admins have no approval chain above them and may not
/// submit.
pub fn initial_status(role: Role) -> Option<LeaveStatus> {
    match role {
        Role::Worker => Some(LeaveStatus::AwaitingSupervisor),
        Role::Supervisor => Some(LeaveStatus::AwaitingManager),
        Role::Manager => Some(LeaveStatus::AwaitingDirector),
        Role::Admin | Role::Director => None,
    }
}

/// The transition table. Returns the status the request moves to, or why
/// the decision is refused. Pure: callers fence the actual write on the
/// status this was evaluated against.
pub fn next_status(
    role: Role,
    current: LeaveStatus,
    decision: Decision,
) -> Result<LeaveStatus, TransitionError> {
    if current.is_terminal() {
        return Err(TransitionError::Finalized);
    }
    match decision {
        Decision::Reject => {
            if role.is_approver() {
                Ok(LeaveStatus::Rejected)
            } else {
                Err(TransitionError::NotAuthorized)
            }
        }
        Decision::Approve => match (role, current) {
            (Role::Supervisor, LeaveStatus::AwaitingSupervisor) => {
                Ok(LeaveStatus::ApprovedBySupervisor)
            }
            (Role::Manager, LeaveStatus::ApprovedBySupervisor) => Ok(LeaveStatus::Approved),
            (Role::Manager, LeaveStatus::AwaitingManager) => Ok(LeaveStatus::Approved),
            (Role::Director, LeaveStatus::AwaitingDirector) => Ok(LeaveStatus::Approved),
            _ => Err(TransitionError::NotAuthorized),
        },
    }
}

/// Statuses a given role is responsible for validating. Drives the
/// pending queue each approver sees.
pub fn pending_statuses(role: Role) -> &'static [LeaveStatus] {
    match role {
        Role::Supervisor => &[LeaveStatus::AwaitingSupervisor],
        Role::Manager => &[
            LeaveStatus::ApprovedBySupervisor,
            LeaveStatus::AwaitingManager,
        ],
        Role::Director => &[LeaveStatus::AwaitingDirector],
        Role::Admin | Role::Worker => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 5] = [
        Role::Admin,
        Role::Director,
        Role::Manager,
        Role::Supervisor,
        Role::Worker,
    ];

    #[test]
    fn initial_status_follows_the_role_table() {
        assert_eq!(
            initial_status(Role::Worker),
            Some(LeaveStatus::AwaitingSupervisor)
        );
        assert_eq!(
            initial_status(Role::Supervisor),
            Some(LeaveStatus::AwaitingManager)
        );
        assert_eq!(
            initial_status(Role::Manager),
            Some(LeaveStatus::AwaitingDirector)
        );
        assert_eq!(initial_status(Role::Director), None);
        assert_eq!(initial_status(Role::Admin), None);
    }

    #[test]
    fn approve_is_legal_only_for_the_listed_pairs() {
        let legal = [
            (
                Role::Supervisor,
                LeaveStatus::AwaitingSupervisor,
                LeaveStatus::ApprovedBySupervisor,
            ),
            (
                Role::Manager,
                LeaveStatus::ApprovedBySupervisor,
                LeaveStatus::Approved,
            ),
            (
                Role::Manager,
                LeaveStatus::AwaitingManager,
                LeaveStatus::Approved,
            ),
            (
                Role::Director,
                LeaveStatus::AwaitingDirector,
                LeaveStatus::Approved,
            ),
        ];

        for role in ALL_ROLES {
            for status in LeaveStatus::ALL {
                let expected = legal
                    .iter()
                    .find(|(r, s, _)| *r == role && *s == status)
                    .map(|(_, _, next)| *next);
                let got = next_status(role, status, Decision::Approve);
                match expected {
                    Some(next) => assert_eq!(got, Ok(next), "{role} approving {status}"),
                    None if status.is_terminal() => {
                        assert_eq!(got, Err(TransitionError::Finalized))
                    }
                    None => assert_eq!(
                        got,
                        Err(TransitionError::NotAuthorized),
                        "{role} approving {status}"
                    ),
                }
            }
        }
    }

    #[test]
    fn reject_short_circuits_from_any_pending_state() {
        for role in [Role::Supervisor, Role::Manager, Role::Director] {
            for status in LeaveStatus::ALL {
                if status.is_terminal() {
                    continue;
                }
                assert_eq!(
                    next_status(role, status, Decision::Reject),
                    Ok(LeaveStatus::Rejected),
                    "{role} rejecting {status}"
                );
            }
        }
    }

    #[test]
    fn non_approvers_may_not_reject() {
        for role in [Role::Worker, Role::Admin] {
            assert_eq!(
                next_status(role, LeaveStatus::AwaitingSupervisor, Decision::Reject),
                Err(TransitionError::NotAuthorized)
            );
        }
    }

    #[test]
    fn terminal_states_accept_no_decision() {
        for role in ALL_ROLES {
            for status in [LeaveStatus::Approved, LeaveStatus::Rejected] {
                for decision in [Decision::Approve, Decision::Reject] {
                    assert_eq!(
                        next_status(role, status, decision),
                        Err(TransitionError::Finalized)
                    );
                }
            }
        }
    }

    #[test]
    fn worker_submission_walks_the_full_chain() {
        let start = initial_status(Role::Worker).unwrap();
        assert_eq!(start, LeaveStatus::AwaitingSupervisor);
        let mid = next_status(Role::Supervisor, start, Decision::Approve).unwrap();
        assert_eq!(mid, LeaveStatus::ApprovedBySupervisor);
        let end = next_status(Role::Manager, mid, Decision::Approve).unwrap();
        assert_eq!(end, LeaveStatus::Approved);
        assert!(end.is_terminal());
    }

    #[test]
    fn supervisor_submission_skips_the_supervisor_stage() {
        let start = initial_status(Role::Supervisor).unwrap();
        assert_eq!(start, LeaveStatus::AwaitingManager);
        let end = next_status(Role::Manager, start, Decision::Approve).unwrap();
        assert_eq!(end, LeaveStatus::Approved);
    }

    #[test]
    fn manager_submission_is_rejected_by_director() {
        let start = initial_status(Role::Manager).unwrap();
        assert_eq!(start, LeaveStatus::AwaitingDirector);
        let end = next_status(Role::Director, start, Decision::Reject).unwrap();
        assert_eq!(end, LeaveStatus::Rejected);
        assert_eq!(
            next_status(Role::Director, end, Decision::Approve),
            Err(TransitionError::Finalized)
        );
    }

    #[test]
    fn decision_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::from_str::<Decision>("\"approve\"").unwrap(),
            Decision::Approve
        );
        assert_eq!(
            serde_json::from_str::<Decision>("\"reject\"").unwrap(),
            Decision::Reject
        );
        assert!(serde_json::from_str::<Decision>("\"Approve\"").is_err());
    }

    #[test]
    fn pending_queues_match_each_role() {
        assert_eq!(
            pending_statuses(Role::Supervisor),
            &[LeaveStatus::AwaitingSupervisor]
        );
        assert_eq!(
            pending_statuses(Role::Manager),
            &[
                LeaveStatus::ApprovedBySupervisor,
                LeaveStatus::AwaitingManager
            ]
        );
        assert_eq!(
            pending_statuses(Role::Director),
            &[LeaveStatus::AwaitingDirector]
        );
        assert!(pending_statuses(Role::Worker).is_empty());
        assert!(pending_statuses(Role::Admin).is_empty());
    }
}
