use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::TrackerError;

/// Reads the whole body in one step, then parses it as JSON.
///
/// Unlike `axum::Json` this ignores `Content-Type` and turns malformed input
/// into a `{ "error": ... }` 400 instead of a plain-text rejection.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = TrackerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        let value = serde_json::from_slice(&bytes)
            .map_err(|_| TrackerError::Validation("Invalid JSON body"))?;
        Ok(JsonBody(value))
    }
}
