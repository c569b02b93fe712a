//! Request extractors that never reject on their own.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

/// The id segment of a record route, as sent.
///
/// A segment that cannot be decoded, or a route without an id segment,
/// yields an empty string. No record carries that id, so the lookup ends in
/// the entity's not-found answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RawId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(RawId(id)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Unusable id segment");
                Ok(RawId(String::new()))
            }
        }
    }
}
