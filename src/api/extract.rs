use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use crate::api::ApiError;
use crate::views::{ViewParams, ViewRequest};

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Query string parsed and validated into [`ViewParams`].
///
/// Both an undecodable query and an invalid value are answered with the
/// JSON error body.
pub struct ViewQuery(pub ViewParams);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ViewQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(request) = Query::<ViewRequest>::from_request_parts(parts, state).await?;
        Ok(ViewQuery(ViewParams::from_request(&request)?))
    }
}
