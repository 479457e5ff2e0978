// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use soldium_api::convert::auth_error;
use soldium_api::error_mapping::map_error;
use soldium_api::{ApiError, ApiErrorCode};
use soldium_store::StoreErrorCode;
use tracing::{error, warn};

use crate::services::ServiceError;

#[must_use]
pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = StatusCode::from_u16(map_error(&err).status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut resp = (status, Json(err.into_envelope())).into_response();
    if status == StatusCode::SERVICE_UNAVAILABLE {
        resp.headers_mut()
            .insert("retry-after", HeaderValue::from_static("3"));
    }
    resp
}

/// Renders a workflow failure. Store detail is logged here and never reaches
/// the response body.
#[must_use]
pub(crate) fn service_error(err: ServiceError, request_id: &str) -> ApiError {
    let api = match err {
        ServiceError::Validation(e) => ApiError::from(&e),
        ServiceError::Auth(e, op) => {
            if matches!(e, soldium_model::AuthError::Failure(_)) {
                warn!(error = %e, "identity provider failure");
            }
            auth_error(&e, op)
        }
        ServiceError::Unauthenticated => ApiError::unauthenticated(),
        ServiceError::Forbidden(reason) => ApiError::forbidden(reason),
        ServiceError::Store(e) => match e.code {
            StoreErrorCode::NotFound => ApiError::not_found("Presale entry"),
            StoreErrorCode::Conflict => ApiError::new(
                ApiErrorCode::EntryNotPending,
                "Only pending entries can be verified or rejected",
                json!({}),
                "req-unknown",
            ),
            StoreErrorCode::Validation => {
                warn!(code = e.code.as_str(), error = %e.message, "store rejected document");
                ApiError::internal()
            }
            StoreErrorCode::Unavailable | StoreErrorCode::Io => {
                warn!(code = e.code.as_str(), error = %e.message, "store unavailable");
                ApiError::store_unavailable()
            }
            _ => {
                error!(code = e.code.as_str(), error = %e.message, "store failure");
                ApiError::internal()
            }
        },
    };
    api.with_request_id(request_id)
}

#[must_use]
pub(crate) fn failure_response(err: ServiceError, request_id: &str) -> Response {
    api_error_response(service_error(err, request_id))
}

/// Decodes a JSON request body; oversized bodies are 413 and malformed ones
/// are 400 `validation_failed`.
pub(crate) fn decode_body<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
    request_id: &str,
) -> Result<T, Response> {
    let bytes = body.map_err(|rejection| {
        let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::new(
                ApiErrorCode::PayloadTooLarge,
                "Request body is too large",
                json!({}),
                request_id,
            )
        } else {
            ApiError::validation_failed("body", "Request body could not be read")
                .with_request_id(request_id)
        };
        api_error_response(err)
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        api_error_response(
            ApiError::new(
                ApiErrorCode::ValidationFailed,
                "Request body is not valid JSON for this operation",
                json!({"field": "body", "reason": e.to_string()}),
                request_id,
            ),
        )
    })
}

#[must_use]
pub(crate) fn json_ok<T: Serialize>(status: StatusCode, payload: &T) -> Response {
    (status, Json(payload)).into_response()
}
