//! # Request Extractors
//!
//! Wrappers around axum's `Json` and `Query` whose rejections are [`AppError`]s, so a
//! malformed body or query string answers `400` with the usual `{"error","code"}` body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Json, Query, Request};
use axum::http::request::Parts;
use lib_core::AppError;
use tracing::debug;

/// JSON request body.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                debug!("[EXTRACT] Rejected JSON body: {}", rejection.body_text());
                AppError::InvalidRequest(rejection.body_text())
            })?;
        Ok(Self(value))
    }
}

/// Query string parameters.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!("[EXTRACT] Rejected query string: {}", rejection.body_text());
                AppError::InvalidRequest(rejection.body_text())
            })?;
        Ok(Self(value))
    }
}
