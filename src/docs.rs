use crate::api::activity_log::ActivityLogRow;
use crate::api::attendance::{AttendanceFilter, AttendanceRow, ClockIn};
use crate::api::leave_request::{
    ApprovalRow, CreateLeave, DecideLeave, HistoryFilter, LeaveHistoryRow, PendingLeave,
};
use crate::attendance::reconcile::{DayFailure, Reconciliation};
use crate::leave::policy::Decision;
use crate::models::LoginReqDto;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Absensi API",
        version = "1.0.0",
        description = r#"
## Workforce Attendance & Leave Management

This API powers a multi-role attendance and leave-management system.

### 🔹 Key Features
- **Leave Management**
  - Submit leave requests with evidence, walk them through the
    Supervisor → Manager → Director approval chain, and keep an
    append-only approval log
- **Attendance Back-fill**
  - Approving a leave automatically materializes one "leave"
    attendance record per day of the span, without clobbering
    records written by a physical clock-in
- **Attendance Tracking**
  - Daily clock-in and clock-out, with day/week/month listings
- **Activity Logs**
  - Audit trail of submissions, decisions and system back-fills

### 🔐 Security
Endpoints are protected using **JWT Bearer authentication**. The role
carried by the token decides which stage of the approval chain the
caller may act on.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::submit_leave,
        crate::api::leave_request::decide_leave,
        crate::api::leave_request::pending_leaves,
        crate::api::leave_request::leave_history,
        crate::api::leave_request::get_leave,

        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::attendance_list,

        crate::api::activity_log::activity_logs,

        crate::auth::handlers::login
    ),
    components(
        schemas(
            CreateLeave,
            DecideLeave,
            Decision,
            PendingLeave,
            LeaveHistoryRow,
            HistoryFilter,
            ApprovalRow,
            Reconciliation,
            DayFailure,
            ClockIn,
            AttendanceFilter,
            AttendanceRow,
            ActivityLogRow,
            LoginReqDto
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave submission and approval APIs"),
        (name = "Attendance", description = "Attendance tracking APIs"),
        (name = "Logs", description = "Activity log APIs"),
        (name = "Auth", description = "Authentication APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
