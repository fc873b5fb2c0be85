use crate::auth::auth::AuthUser;
use crate::model::attendance::{AttendanceStatus, VerificationMethod};
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct ClockIn {
    /// Capture evidence stored by the upload layer, if any
    #[schema(example = "uploads/selfie-123.jpg", nullable = true)]
    pub evidence_path: Option<String>,
    #[schema(example = 2, nullable = true)]
    pub location_id: Option<u64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    #[schema(example = "day")]
    /// Window to list: day (default), week or month
    pub filter: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceRow {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "budi")]
    pub username: String,
    #[schema(example = "2024-06-10", format = "date", value_type = String)]
    pub day: NaiveDate,
    #[schema(example = "2024-06-10T08:02:11", format = "date-time", value_type = String)]
    pub clock_in: NaiveDateTime,
    #[schema(format = "date-time", value_type = String, nullable = true)]
    pub clock_out: Option<NaiveDateTime>,
    #[schema(example = "present")]
    pub status: String,
    #[schema(example = "face")]
    pub method: String,
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-in",
    request_body(content = ClockIn, content_type = "application/json"),
    responses(
        (status = 200, description = "Clocked in successfully", body = Object, example = json!({
            "message": "Clocked in successfully"
        })),
        (status = 400, description = "Already clocked in today", body = Object, example = json!({
            "message": "Already clocked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ClockIn>,
) -> actix_web::Result<impl Responder> {
    let worker_id: u64 = auth
        .worker_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No worker profile"))?;

    let method = if payload.evidence_path.is_some() {
        VerificationMethod::Face
    } else {
        VerificationMethod::Manual
    };

    let result = sqlx::query(
        r#"
        INSERT INTO attendance_records
            (worker_id, day, clock_in, status, method, evidence_path, location_id)
        VALUES (?, CURDATE(), NOW(), ?, ?, ?, ?)
        "#,
    )
    .bind(worker_id)
    .bind(AttendanceStatus::Present.as_str())
    .bind(method.as_str())
    .bind(&payload.evidence_path)
    .bind(payload.location_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Clocked in successfully"
        }))),

        Err(e) => {
            // Duplicate clock-in for same day, caught by the (worker, day)
            // unique key
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already clocked in today"
                    })));
                }
            }

            tracing::error!(error = %e, worker_id, "Clock-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Clock-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/clock-out",
    responses(
        (status = 200, description = "Clocked out successfully", body = Object, example = json!({
            "message": "Clocked out successfully"
        })),
        (status = 400, description = "No open clock-in found for today", body = Object, example = json!({
            "message": "No open clock-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let worker_id: u64 = auth
        .worker_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No worker profile"))?;

    let result = sqlx::query(
        r#"
        UPDATE attendance_records
        SET clock_out = NOW()
        WHERE worker_id = ?
        AND day = CURDATE()
        AND clock_out IS NULL
        "#,
    )
    .bind(worker_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, worker_id, "Clock-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No open clock-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Clocked out successfully"
    })))
}

/// Attendance records for the chosen window
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceRow]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor_up()?;

    let where_sql = match query.filter.as_deref() {
        Some("week") => "WHERE YEARWEEK(ar.day, 1) = YEARWEEK(CURDATE(), 1)",
        Some("month") => {
            "WHERE MONTH(ar.day) = MONTH(CURDATE()) AND YEAR(ar.day) = YEAR(CURDATE())"
        }
        _ => "WHERE ar.day = CURDATE()",
    };

    let sql = format!(
        r#"
        SELECT ar.id, u.username, ar.day, ar.clock_in, ar.clock_out, ar.status, ar.method
        FROM attendance_records ar
        JOIN workers w ON ar.worker_id = w.id
        JOIN users u ON w.user_id = u.id
        {}
        ORDER BY ar.clock_in DESC
        "#,
        where_sql
    );

    let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch attendance records");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(rows))
}
