use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: u64,
    pub worker_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: String,
    pub justification: String,
    pub evidence_path: Option<String>,
    pub status: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Closed set of leave-request states. Stored as strings in the `status`
/// column; every read goes through [`LeaveStatus::parse`] so an unknown
/// value surfaces instead of being compared ad hoc.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LeaveStatus {
    AwaitingSupervisor,
    AwaitingManager,
    AwaitingDirector,
    ApprovedBySupervisor,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const ALL: [LeaveStatus; 6] = [
        LeaveStatus::AwaitingSupervisor,
        LeaveStatus::AwaitingManager,
        LeaveStatus::AwaitingDirector,
        LeaveStatus::ApprovedBySupervisor,
        LeaveStatus::Approved,
        LeaveStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::AwaitingSupervisor => "awaiting_supervisor",
            LeaveStatus::AwaitingManager => "awaiting_manager",
            LeaveStatus::AwaitingDirector => "awaiting_director",
            LeaveStatus::ApprovedBySupervisor => "approved_by_supervisor",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "awaiting_supervisor" => Some(LeaveStatus::AwaitingSupervisor),
            "awaiting_manager" => Some(LeaveStatus::AwaitingManager),
            "awaiting_director" => Some(LeaveStatus::AwaitingDirector),
            "approved_by_supervisor" => Some(LeaveStatus::ApprovedBySupervisor),
            "approved" => Some(LeaveStatus::Approved),
            "rejected" => Some(LeaveStatus::Rejected),
            _ => None,
        }
    }

    /// No decision is legal once a request reaches a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_survives_the_string_column() {
        for status in LeaveStatus::ALL {
            assert_eq!(LeaveStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeaveStatus::parse("Disetujui"), None);
        assert_eq!(LeaveStatus::parse(""), None);
    }

    #[test]
    fn only_approved_and_rejected_are_terminal() {
        for status in LeaveStatus::ALL {
            let terminal = matches!(status, LeaveStatus::Approved | LeaveStatus::Rejected);
            assert_eq!(status.is_terminal(), terminal);
        }
    }
}
