use serde::{Deserialize, Serialize};

/// Person eligible to request leave and be tracked for attendance.
/// Created and maintained by worker management; the core only reads it.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Worker {
    pub id: u64,
    pub user_id: u64,
    pub daily_wage: f64,
}
