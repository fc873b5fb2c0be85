use anyhow::Context;
use dotenvy::dotenv;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .context("ACCESS_TOKEN_TTL must be a number of seconds")?,

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("RATE_LOGIN_PER_MIN must be a number")?,
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("RATE_PROTECTED_PER_MIN must be a number")?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so this stays one sequential test.
    #[test]
    fn from_env_reports_missing_and_malformed_vars() {
        unsafe {
            env::remove_var("SERVER_ADDR");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("SERVER_ADDR"));

        unsafe {
            env::set_var("SERVER_ADDR", "127.0.0.1:8080");
            env::set_var("DATABASE_URL", "mysql://root@localhost/absensi");
            env::set_var("JWT_SECRET", "test-secret");
            env::set_var("ACCESS_TOKEN_TTL", "not-a-number");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("ACCESS_TOKEN_TTL"));

        unsafe {
            env::set_var("ACCESS_TOKEN_TTL", "900");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.access_token_ttl, 900);
        assert_eq!(config.api_prefix, "/api/v1");
    }
}
