//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! The configuration is built once in the server bootstrap and handed to the components
//! that need it (token service, account service); there is no process-wide instance.
//!
//! | Variable | Default | Notes |
//! |---|---|---|
//! | `DATABASE_URL` | `sqlite:data/wallet.db` | |
//! | `JWT_SECRET` | required | at least 32 characters |
//! | `JWT_EXPIRATION_HOURS` | `1` | 1 to 720 |
//! | `VERIFY_EMAIL_DOMAIN` | `true` | DNS lookup of the email domain at registration and login |

use crate::error::{AppError, Result};
use lib_utils::envs::{get_env, get_env_or, get_env_parse_or};

const DEFAULT_DATABASE_URL: &str = "sqlite:data/wallet.db";
const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 1;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret key for JWT token signing and verification
    ///
    /// **Must be at least 32 characters long** for security.
    pub jwt_secret: String,

    /// JWT token validity period in hours
    ///
    /// Valid range: 1-720 hours (1 hour to 30 days)
    pub jwt_expiration_hours: i64,

    /// Whether the email domain must resolve in DNS.
    pub verify_email_domain: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let database_url = get_env_or("DATABASE_URL", DEFAULT_DATABASE_URL);

        let jwt_secret = get_env("JWT_SECRET").map_err(|e| AppError::Config(e.to_string()))?;

        let jwt_expiration_hours =
            get_env_parse_or("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS)
                .map_err(|e| AppError::Config(e.to_string()))?;

        let verify_email_domain = get_env_parse_or("VERIFY_EMAIL_DOMAIN", true)
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            verify_email_domain,
        })
    }

    /// Validate configuration values against security and business rules.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < 32 {
            return Err(AppError::Config(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }

        if self.jwt_expiration_hours < 1 || self.jwt_expiration_hours > 720 {
            return Err(AppError::Config(
                "JWT_EXPIRATION_HOURS must be between 1 and 720 (30 days)".to_string(),
            ));
        }

        if self.database_url.trim().is_empty() {
            return Err(AppError::Config("DATABASE_URL cannot be empty".to_string()));
        }

        Ok(())
    }
}
