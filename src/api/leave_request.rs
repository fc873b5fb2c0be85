use crate::auth::auth::AuthUser;
use crate::leave::policy::{self, Decision};
use crate::leave::service::{self, NewLeave};
use crate::model::leave_request::LeaveRequest;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2024-06-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-06-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "sick")]
    pub kind: String,
    #[schema(example = "Flu, doctor's note attached")]
    pub justification: String,
    #[schema(example = "uploads/note-123.jpg", nullable = true)]
    pub evidence_path: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DecideLeave {
    #[schema(example = "approve")]
    pub decision: Decision,
    #[schema(example = "insufficient coverage", nullable = true)]
    pub note: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct PendingLeave {
    #[schema(example = 1)]
    pub id: u64,
    /// Name of the worker who submitted the request
    #[schema(example = "budi")]
    pub username: String,
    #[schema(example = "2024-06-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-06-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "sick")]
    pub kind: String,
    pub justification: String,
    #[schema(nullable = true)]
    pub evidence_path: Option<String>,
    #[schema(example = "awaiting_supervisor")]
    pub status: String,
    #[schema(example = "2024-06-09T14:00:00Z", format = "date-time", value_type = String)]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveHistoryRow {
    pub id: u64,
    pub worker_id: u64,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub kind: String,
    pub justification: String,
    pub evidence_path: Option<String>,
    #[schema(example = "approved")]
    pub status: String,
    #[schema(format = "date-time", value_type = String)]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Requester name; only filled for the director's view
    pub requester: Option<String>,
    /// Collapsed approval trail, e.g. "Approved by tono; Approved by rina"
    #[schema(example = "Approved by tono")]
    pub approvals: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct ApprovalRow {
    #[schema(example = "Approved")]
    pub outcome: String,
    pub note: Option<String>,
    /// Name of the user who made this decision
    #[schema(example = "tono")]
    pub approver: String,
    #[schema(format = "date-time", value_type = String)]
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HistoryFilter {
    #[schema(example = "approved")]
    /// Filter by leave status
    pub status: Option<String>,
}

/* =========================
Submit leave request
========================= */
/// Swagger doc for submit_leave endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted",
         body = Object,
         example = json!({
            "request_id": 17,
            "status": "awaiting_supervisor"
         })
        ),
        (status = 400, description = "Invalid role or date range"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Worker profile not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn submit_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let submitted = service::submit(
        pool.get_ref(),
        auth.user_id,
        auth.role,
        NewLeave {
            start_date: payload.start_date,
            end_date: payload.end_date,
            kind: payload.kind,
            justification: payload.justification,
            evidence_path: payload.evidence_path,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "request_id": submitted.request_id,
        "status": submitted.status.as_str()
    })))
}

/* =========================
Decide on a leave request
========================= */
/// Swagger doc for decide_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/decision",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to decide on")
    ),
    request_body(
        content = DecideLeave,
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Decision applied", body = Object, example = json!({
            "status": "approved",
            "reconciliation": { "days_processed": 3, "failures": [] }
        })),
        (status = 400, description = "Missing note on rejection"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role holds no authority over the current status"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request already finalized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn decide_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DecideLeave>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let payload = payload.into_inner();

    if payload.decision == Decision::Reject
        && payload.note.as_deref().is_none_or(|n| n.trim().is_empty())
    {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "a note is required when rejecting a leave request"
        })));
    }

    let outcome = service::decide(
        pool.get_ref(),
        leave_id,
        auth.user_id,
        auth.role,
        payload.decision,
        payload.note,
    )
    .await?;

    let mut body = serde_json::json!({ "status": outcome.status.as_str() });
    if let Some(reconciliation) = outcome.reconciliation {
        body["reconciliation"] = serde_json::to_value(&reconciliation)
            .map_err(actix_web::error::ErrorInternalServerError)?;
    }

    Ok(HttpResponse::Ok().json(body))
}

/* =========================
Validation queue
========================= */
/// Requests awaiting the caller's stage of the approval chain
#[utoipa::path(
    get,
    path = "/api/v1/leave/pending",
    responses(
        (status = 200, description = "Requests awaiting this role", body = [PendingLeave]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn pending_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_approver()?;

    let statuses = policy::pending_statuses(auth.role);
    if statuses.is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<PendingLeave>::new()));
    }

    let placeholders = vec!["?"; statuses.len()].join(", ");
    let sql = format!(
        r#"
        SELECT lr.id, u.username, lr.start_date, lr.end_date, lr.kind,
               lr.justification, lr.evidence_path, lr.status, lr.submitted_at
        FROM leave_requests lr
        JOIN workers w ON lr.worker_id = w.id
        JOIN users u ON w.user_id = u.id
        WHERE lr.status IN ({})
        ORDER BY lr.submitted_at DESC
        "#,
        placeholders
    );

    let mut query = sqlx::query_as::<_, PendingLeave>(&sql);
    for status in statuses {
        query = query.bind(status.as_str());
    }

    let rows = query.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, role = %auth.role, "Failed to fetch validation queue");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}

/* =========================
Leave history
========================= */
/// Own submissions with their approval trail; a director sees every
/// finalized request instead.
#[utoipa::path(
    get,
    path = "/api/v1/leave/history",
    params(HistoryFilter),
    responses(
        (status = 200, description = "Leave history", body = [LeaveHistoryRow]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HistoryFilter>,
) -> actix_web::Result<impl Responder> {
    use crate::model::role::Role;

    let rows = if auth.role == Role::Director {
        let mut sql = String::from(
            r#"
            SELECT lr.id, lr.worker_id, lr.start_date, lr.end_date, lr.kind,
                   lr.justification, lr.evidence_path, lr.status, lr.submitted_at,
                   req.username AS requester,
                   GROUP_CONCAT(CONCAT(al.outcome, ' by ', app.username) SEPARATOR '; ') AS approvals
            FROM leave_requests lr
            JOIN workers w ON lr.worker_id = w.id
            JOIN users req ON w.user_id = req.id
            LEFT JOIN approval_log al ON al.request_id = lr.id
            LEFT JOIN users app ON al.approver_id = app.id
            WHERE lr.status IN ('approved', 'rejected')
            "#,
        );
        if query.status.is_some() {
            sql.push_str(" AND lr.status = ?");
        }
        sql.push_str(" GROUP BY lr.id ORDER BY lr.submitted_at DESC");

        let mut q = sqlx::query_as::<_, LeaveHistoryRow>(&sql);
        if let Some(status) = query.status.as_deref() {
            q = q.bind(status);
        }
        q.fetch_all(pool.get_ref()).await
    } else {
        let worker_id = match service::resolve_worker(pool.get_ref(), auth.user_id).await {
            Ok(id) => id,
            Err(_) => return Ok(HttpResponse::Ok().json(Vec::<LeaveHistoryRow>::new())),
        };

        let mut sql = String::from(
            r#"
            SELECT lr.id, lr.worker_id, lr.start_date, lr.end_date, lr.kind,
                   lr.justification, lr.evidence_path, lr.status, lr.submitted_at,
                   CAST(NULL AS CHAR) AS requester,
                   GROUP_CONCAT(CONCAT(al.outcome, ' by ', app.username) SEPARATOR '; ') AS approvals
            FROM leave_requests lr
            LEFT JOIN approval_log al ON al.request_id = lr.id
            LEFT JOIN users app ON al.approver_id = app.id
            WHERE lr.worker_id = ?
            "#,
        );
        if query.status.is_some() {
            sql.push_str(" AND lr.status = ?");
        }
        sql.push_str(" GROUP BY lr.id ORDER BY lr.submitted_at DESC");

        let mut q = sqlx::query_as::<_, LeaveHistoryRow>(&sql).bind(worker_id);
        if let Some(status) = query.status.as_deref() {
            q = q.bind(status);
        }
        q.fetch_all(pool.get_ref()).await
    };

    let rows = rows.map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to fetch leave history");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}

/* =========================
Single leave request
========================= */
/// One request with its full approval log
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner or an approver"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, worker_id, start_date, end_date, kind, justification,
               evidence_path, status, submitted_at
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let leave = match leave {
        Some(l) => l,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": "Leave request not found"
            })));
        }
    };

    // Approvers and admins may inspect any request; workers only their own.
    if auth.require_supervisor_up().is_err() {
        let worker_id = service::resolve_worker(pool.get_ref(), auth.user_id).await?;
        if worker_id != leave.worker_id {
            return Err(actix_web::error::ErrorForbidden("Not your leave request"));
        }
    }

    let approvals = sqlx::query_as::<_, ApprovalRow>(
        r#"
        SELECT al.outcome, al.note, u.username AS approver, al.decided_at
        FROM approval_log al
        JOIN users u ON al.approver_id = u.id
        WHERE al.request_id = ?
        ORDER BY al.decided_at ASC
        "#,
    )
    .bind(leave_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch approval log");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "request": leave,
        "approvals": approvals
    })))
}
