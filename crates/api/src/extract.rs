//! Request body extractors.

use axum::extract::{FromRequest, Json, Request};
use photoai_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then checked with
/// [`Validate`]. Syntax, shape, and rule failures all become
/// `CoreError::Validation`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Core(CoreError::Validation(rejection.body_text())))?;

        value
            .validate()
            .map_err(|errors| AppError::Core(CoreError::Validation(errors.to_string())))?;

        Ok(Self(value))
    }
}
