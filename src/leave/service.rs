//! Persistence side of the leave lifecycle. The policy tables in
//! [`crate::leave::policy`] decide what is legal; this module makes it
//! durable.
//!
//! The status write is fenced: `UPDATE ... WHERE id = ? AND status = ?`
//! conditions the transition on the status the decision was evaluated
//! against, so two approvers racing on the same request resolve to one
//! winner and one refusal. Reconciliation runs only after the status and
//! approval-log writes are committed and its failures are returned as
//! warnings, never rolled back into the status.

use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::attendance::reconcile::{self, Reconciliation};
use crate::audit;
use crate::error::ApiError;
use crate::leave::policy::{self, Decision, TransitionError};
use crate::model::{leave_request::LeaveStatus, role::Role};

#[derive(Debug)]
pub struct NewLeave {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: String,
    pub justification: String,
    pub evidence_path: Option<String>,
}

#[derive(Debug)]
pub struct Submitted {
    pub request_id: u64,
    pub status: LeaveStatus,
}

#[derive(Debug)]
pub struct DecisionOutcome {
    pub status: LeaveStatus,
    pub reconciliation: Option<Reconciliation>,
}

/// Row shape `decide` works against; only the fields the transition
/// needs.
#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    worker_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
}

pub async fn resolve_worker(pool: &MySqlPool, user_id: u64) -> Result<u64, ApiError> {
    sqlx::query_scalar::<_, u64>("SELECT id FROM workers WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::WorkerNotFound)
}

/// Creates a leave request in the initial status dictated by the
/// submitter's role. No attendance effect at this stage.
pub async fn submit(
    pool: &MySqlPool,
    user_id: u64,
    role: Role,
    leave: NewLeave,
) -> Result<Submitted, ApiError> {
    let initial = policy::initial_status(role).ok_or(ApiError::InvalidRole)?;

    if leave.start_date > leave.end_date {
        return Err(ApiError::InvalidDateRange);
    }

    let worker_id = resolve_worker(pool, user_id).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (worker_id, start_date, end_date, kind, justification, evidence_path, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(worker_id)
    .bind(leave.start_date)
    .bind(leave.end_date)
    .bind(&leave.kind)
    .bind(&leave.justification)
    .bind(&leave.evidence_path)
    .bind(initial.as_str())
    .execute(pool)
    .await?;

    let request_id = result.last_insert_id();

    audit::record(
        pool,
        user_id,
        "LEAVE_SUBMITTED",
        format!(
            "Submitted {} leave from {} to {}",
            leave.kind, leave.start_date, leave.end_date
        ),
    )
    .await;

    Ok(Submitted {
        request_id,
        status: initial,
    })
}

/// Applies one approval or rejection to a request. On a transition to
/// the terminal Approved state, back-fills attendance for the span and
/// reports per-day failures alongside the committed status.
pub async fn decide(
    pool: &MySqlPool,
    request_id: u64,
    approver_id: u64,
    role: Role,
    decision: Decision,
    note: Option<String>,
) -> Result<DecisionOutcome, ApiError> {
    let request = load_request(pool, request_id)
        .await?
        .ok_or(ApiError::RequestNotFound)?;
    let current = parse_status(request_id, &request.status)?;

    let next = match policy::next_status(role, current, decision) {
        Ok(next) => next,
        Err(reason) => {
            audit::record(
                pool,
                approver_id,
                "LEAVE_DECISION_REFUSED",
                format!("Refused decision on request #{request_id} in status {current}"),
            )
            .await;
            return Err(refusal(request_id, role, current, reason));
        }
    };

    // Fenced write: only wins if nobody else moved the status since the
    // read above.
    let updated = sqlx::query("UPDATE leave_requests SET status = ? WHERE id = ? AND status = ?")
        .bind(next.as_str())
        .bind(request_id)
        .bind(current.as_str())
        .execute(pool)
        .await?;

    if updated.rows_affected() == 0 {
        let row = load_request(pool, request_id)
            .await?
            .ok_or(ApiError::RequestNotFound)?;
        let now = parse_status(request_id, &row.status)?;
        let reason = if now.is_terminal() {
            TransitionError::Finalized
        } else {
            TransitionError::NotAuthorized
        };
        return Err(refusal(request_id, role, now, reason));
    }

    sqlx::query(
        r#"
        INSERT INTO approval_log (request_id, approver_id, outcome, note)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(request_id)
    .bind(approver_id)
    .bind(decision.as_outcome())
    .bind(&note)
    .execute(pool)
    .await?;

    audit::record(
        pool,
        approver_id,
        "LEAVE_DECIDED",
        format!("Request #{request_id} moved to {next}"),
    )
    .await;

    let reconciliation = if next == LeaveStatus::Approved {
        let outcome = reconcile::materialize(
            pool,
            request.worker_id,
            request.start_date,
            request.end_date,
        )
        .await;
        audit::record(
            pool,
            approver_id,
            "SYSTEM",
            format!(
                "Back-filled {} leave attendance day(s) for request #{request_id}",
                outcome.days_processed
            ),
        )
        .await;
        Some(outcome)
    } else {
        None
    };

    Ok(DecisionOutcome {
        status: next,
        reconciliation,
    })
}

async fn load_request(pool: &MySqlPool, request_id: u64) -> Result<Option<RequestRow>, ApiError> {
    let row = sqlx::query_as::<_, RequestRow>(
        "SELECT worker_id, start_date, end_date, status FROM leave_requests WHERE id = ?",
    )
    .bind(request_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

fn parse_status(request_id: u64, raw: &str) -> Result<LeaveStatus, ApiError> {
    LeaveStatus::parse(raw).ok_or_else(|| {
        ApiError::Internal(format!(
            "leave request #{request_id} has unknown status '{raw}'"
        ))
    })
}

fn refusal(id: u64, role: Role, status: LeaveStatus, reason: TransitionError) -> ApiError {
    match reason {
        TransitionError::Finalized => ApiError::AlreadyFinalized { id, status },
        TransitionError::NotAuthorized => ApiError::UnauthorizedTransition { id, role, status },
    }
}
