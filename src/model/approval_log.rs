use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One decision made against a leave request. Append-only: rows are
/// inserted exactly once per decision and never updated.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApprovalLogEntry {
    pub id: u64,
    pub request_id: u64,
    pub approver_id: u64,
    pub outcome: String,
    pub note: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
}
