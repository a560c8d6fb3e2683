//! # Response Mapping Middleware
//!
//! Adds `Cache-Control: no-store` to every response, since balances and history must
//! always be read fresh, and logs server errors.

use axum::{
    extract::Request,
    http::{header::CACHE_CONTROL, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::error;

/// Response mapping middleware.
pub async fn map_res(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;

    res.headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    if res.status().is_server_error() {
        error!("[RESPONSE] Server error: {}", res.status());
    }

    res
}
