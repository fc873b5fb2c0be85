use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One row per (worker, calendar day), enforced by a unique key on that
/// pair. Written by clock-in/clock-out or by leave reconciliation.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub id: u64,
    pub worker_id: u64,
    pub day: NaiveDate,
    pub clock_in: NaiveDateTime,
    pub clock_out: Option<NaiveDateTime>,
    pub status: String,
    pub method: String,
    pub evidence_path: Option<String>,
    pub location_id: Option<u64>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttendanceStatus {
    Present,
    Late,
    Leave,
    Overtime,
    EarlyDeparture,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Leave => "leave",
            AttendanceStatus::Overtime => "overtime",
            AttendanceStatus::EarlyDeparture => "early_departure",
            AttendanceStatus::Absent => "absent",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VerificationMethod {
    Face,
    Manual,
    System,
}

impl VerificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMethod::Face => "face",
            VerificationMethod::Manual => "manual",
            VerificationMethod::System => "system",
        }
    }
}
