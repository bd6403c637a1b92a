//! Extractors applying request contracts at the handler boundary.

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::validation::RequestContract;

/// JSON body checked against its request contract
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: RequestContract,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        T::validate_payload(&payload).map(ValidatedJson).map_err(ApiError::from)
    }
}

/// Query string checked against its request contract.
///
/// Every value reaches the contract as a JSON string.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: RequestContract,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        let payload =
            Value::Object(params.into_iter().map(|(key, value)| (key, Value::String(value))).collect());

        T::validate_payload(&payload).map(ValidatedQuery).map_err(ApiError::from)
    }
}
