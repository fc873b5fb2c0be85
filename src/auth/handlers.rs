use crate::{
    auth::{jwt::generate_access_token, password::verify_password},
    config::Config,
    models::{LoginReqDto, UserSql},
};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{info, warn};

/// Login endpoint: verifies the password and issues the bearer token the
/// rest of the API consumes.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginReqDto, content_type = "application/json"),
    responses(
        (status = 200, description = "Logged in", body = Object, example = json!({
            "access_token": "eyJ...",
            "token_type": "Bearer",
            "expires_in": 900
        })),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<LoginReqDto>,
) -> actix_web::Result<impl Responder> {
    let user = sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, username, password, role_id, worker_id
        FROM users
        WHERE username = ? AND is_active = 1
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Login query failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let user = match user {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "Login attempt for unknown user");
            return Ok(HttpResponse::Unauthorized().json(json!({
                "error": "Invalid username or password"
            })));
        }
    };

    if !verify_password(&payload.password, &user.password) {
        warn!(username = %user.username, "Login attempt with wrong password");
        return Ok(HttpResponse::Unauthorized().json(json!({
            "error": "Invalid username or password"
        })));
    }

    let token = generate_access_token(
        user.id,
        user.username.clone(),
        user.role_id,
        user.worker_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    info!(username = %user.username, "User logged in");

    Ok(HttpResponse::Ok().json(json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": config.access_token_ttl
    })))
}
