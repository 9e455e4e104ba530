//! Path parameters whose parse failures answer with the standard error body.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Typed path segments, e.g. `ApiPath(id): ApiPath<i32>`.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await.map_err(|rejection| {
            tracing::debug!("Path rejected: {}", rejection.body_text());
            ApiError::bad_request(rejection.body_text())
        })?;
        Ok(ApiPath(value))
    }
}
