pub mod activity_log;
pub mod attendance;
pub mod leave_request;
