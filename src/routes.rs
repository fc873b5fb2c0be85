use crate::{
    api::{activity_log, attendance, leave_request},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

/// Replenish interval and burst for a per-route limiter. A config of 0
/// still yields a valid (tightest possible) limiter; the governor
/// builder refuses a zero burst.
fn limiter_params(requests_per_min: u32) -> (u64, u32) {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    (per_ms, requests_per_min.max(1))
}

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let (per_ms, burst) = limiter_params(requests_per_min);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth").service(
            web::resource("/login")
                .wrap(login_limiter.clone())
                .route(web::post().to(handlers::login)),
        ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("").route(web::post().to(leave_request::submit_leave)),
                    )
                    // /leave/pending
                    .service(
                        web::resource("/pending")
                            .route(web::get().to(leave_request::pending_leaves)),
                    )
                    // /leave/history
                    .service(
                        web::resource("/history")
                            .route(web::get().to(leave_request::leave_history)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/decision
                    .service(
                        web::resource("/{id}/decision")
                            .route(web::put().to(leave_request::decide_leave)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::get().to(attendance::attendance_list)))
                    // /attendance/clock-in
                    .service(
                        web::resource("/clock-in").route(web::post().to(attendance::clock_in)),
                    )
                    // /attendance/clock-out
                    .service(
                        web::resource("/clock-out").route(web::put().to(attendance::clock_out)),
                    ),
            )
            .service(
                web::scope("/logs")
                    // /logs
                    .service(web::resource("").route(web::get().to(activity_log::activity_logs))),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_config_still_builds_a_limiter() {
        assert_eq!(limiter_params(0), (1, 1));
        // Must not panic in the governor builder.
        let _ = build_limiter(0);
    }

    #[test]
    fn limiter_params_spread_the_minute_budget() {
        assert_eq!(limiter_params(60), (1_000, 60));
        assert_eq!(limiter_params(1000), (60, 1000));
    }
}
