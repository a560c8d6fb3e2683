//! # Authentication Library
//!
//! Password hashing and JWT issuance/verification.
//!
//! The signing secret is never global: it lives inside a [`TokenService`] built once at
//! startup and shared by the issuing and verifying sides.

pub mod error;
pub mod pwd;
pub mod token;

// Re-export commonly used types
pub use error::{Error, Result};
pub use pwd::{hash_password, verify_password};
pub use token::{decode_jwt, encode_jwt, Claims, TokenService};
