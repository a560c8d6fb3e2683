//! # Data Transfer Objects (DTOs)
//!
//! Request and response bodies of the `/crypto` REST API.
//!
//! All DTOs use **snake_case** field names in JSON (default serde behavior). Amounts are
//! decimals: requests accept a JSON number or string, responses emit JSON numbers.

pub mod account;
pub mod transaction;
pub mod wallet;

pub use account::*;
pub use transaction::*;
pub use wallet::*;
