use crate::config::Config;
use crate::error::ApiError;
use crate::model::role::Role;
use crate::models::Claims;
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::{DecodingKey, Validation, decode};

pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to a worker record
    pub worker_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(ErrorUnauthorized("Invalid role"))),
        };

        ready(Ok(AuthUser {
            user_id: data.claims.user_id,
            username: data.claims.sub,
            role,
            worker_id: data.claims.worker_id,
        }))
    }
}

impl AuthUser {
    /// Supervisor, Manager or Director: the roles holding authority over
    /// some stage of the approval chain.
    pub fn require_approver(&self) -> Result<(), ApiError> {
        if self.role.is_approver() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Approver roles only"))
        }
    }

    pub fn require_supervisor_up(&self) -> Result<(), ApiError> {
        if self.role.is_approver() || self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Supervisor or above only"))
        }
    }

    pub fn require_admin_or_director(&self) -> Result<(), ApiError> {
        if matches!(self.role, Role::Admin | Role::Director) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin/Director only"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{ResponseError, http::StatusCode};

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 1,
            username: "budi".to_string(),
            role,
            worker_id: Some(1),
        }
    }

    #[test]
    fn approver_gate_admits_exactly_the_chain_roles() {
        for role in [Role::Supervisor, Role::Manager, Role::Director] {
            assert!(user(role).require_approver().is_ok(), "{role}");
        }
        for role in [Role::Worker, Role::Admin] {
            let err = user(role).require_approver().unwrap_err();
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN, "{role}");
        }
    }

    #[test]
    fn supervisor_up_gate_also_admits_admin() {
        assert!(user(Role::Admin).require_supervisor_up().is_ok());
        assert!(user(Role::Supervisor).require_supervisor_up().is_ok());
        let err = user(Role::Worker).require_supervisor_up().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn log_gate_is_admin_or_director_only() {
        assert!(user(Role::Admin).require_admin_or_director().is_ok());
        assert!(user(Role::Director).require_admin_or_director().is_ok());
        for role in [Role::Worker, Role::Supervisor, Role::Manager] {
            let err = user(role).require_admin_or_director().unwrap_err();
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN, "{role}");
        }
    }
}
