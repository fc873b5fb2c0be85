use sqlx::MySqlPool;

/// Appends one activity-log row. Fire-and-forget: a failed write is
/// logged and swallowed so it can never abort the operation being
/// audited.
pub async fn record(pool: &MySqlPool, user_id: u64, event_type: &str, description: String) {
    let result = sqlx::query(
        r#"
        INSERT INTO activity_log (user_id, event_type, description)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(event_type)
    .bind(&description)
    .execute(pool)
    .await;

    if let Err(e) = result {
        tracing::warn!(error = %e, user_id, event_type, "failed to write activity log");
    }
}
