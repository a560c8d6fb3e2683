//! # Utilities Library
//!
//! Shared helpers for environment variables, time formatting, and input validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use time::{format_time, now_utc};
pub use validation::{
    domain_resolves, validate_email_syntax, validate_letters_only, validate_not_empty,
    validate_password_policy,
};
