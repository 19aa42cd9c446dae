//! Request extractors that answer rejections in the gateway's failure shape.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::ApiError;

/// JSON request body.
///
/// Unlike `axum::Json`, a malformed body, a wrong content type or a field of
/// the wrong type is answered with 400 and `{success:false, error, details}`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(status = %rejection.status(), reason = %rejection.body_text(), "Request body rejected");
                Err(ApiError::malformed_body(rejection.body_text()))
            }
        }
    }
}
