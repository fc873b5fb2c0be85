use crate::auth::auth::AuthUser;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActivityLogRow {
    #[schema(example = "2024-06-10T08:02:11Z", format = "date-time", value_type = String)]
    pub logged_at: Option<DateTime<Utc>>,
    #[schema(example = "tono")]
    pub username: String,
    #[schema(example = "LEAVE_DECIDED")]
    pub event_type: String,
    #[schema(example = "Request #17 moved to approved")]
    pub description: String,
}

/// Latest activity-log entries
#[utoipa::path(
    get,
    path = "/api/v1/logs",
    responses(
        (status = 200, description = "Latest 50 activity-log entries", body = [ActivityLogRow]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Logs"
)]
pub async fn activity_logs(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin_or_director()?;

    let rows = sqlx::query_as::<_, ActivityLogRow>(
        r#"
        SELECT l.logged_at, u.username, l.event_type, l.description
        FROM activity_log l
        JOIN users u ON l.user_id = u.id
        ORDER BY l.logged_at DESC
        LIMIT 50
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch activity logs");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}
