//! # Web Library
//!
//! HTTP server, middleware, handlers, and the account service of the wallet backend.

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{create_router, start_server, AppState, ServerConfig};
