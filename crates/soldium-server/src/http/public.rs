// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::Ordering;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use serde_json::json;
use std::collections::BTreeMap;
use soldium_api::params::parse_quote_params;
use soldium_api::{ApiError, ApiErrorCode, VersionDto, API_VERSION};
use soldium_model::InquiryForm;
use soldium_store::SettingKey;

use super::request_tracing::RequestTrace;
use super::response_contract::{api_error_response, decode_body, failure_response, json_ok};
use crate::services::run_store;
use crate::AppState;

pub(crate) async fn healthz_handler() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// Ready while accepting traffic and the store answers a settings read.
pub(crate) async fn readyz_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
) -> Response {
    let store_ok = state.ready.load(Ordering::Relaxed)
        && run_store(&state.store, |store| {
            store.get_setting(&SettingKey::countdown())
        })
        .await
        .is_ok();
    if store_ok {
        (StatusCode::OK, "ready").into_response()
    } else {
        api_error_response(ApiError::new(
            ApiErrorCode::NotReady,
            "service not ready",
            json!({}),
            trace.request_id,
        ))
    }
}

pub(crate) async fn version_handler() -> Response {
    let mut response = json_ok(
        StatusCode::OK,
        &VersionDto {
            name: crate::CRATE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            api_version: API_VERSION.to_string(),
        },
    );
    response
        .headers_mut()
        .insert("cache-control", HeaderValue::from_static("public, max-age=30"));
    response
}

pub(crate) async fn terms_handler(State(state): State<AppState>) -> Response {
    json_ok(StatusCode::OK, state.submissions.terms())
}

pub(crate) async fn quote_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let quote = parse_quote_params(&query).and_then(|(currency, raw)| {
        state
            .submissions
            .terms()
            .quote(currency, &raw)
            .map_err(|e| ApiError::from(&e))
    });
    match quote {
        Ok(quote) => json_ok(StatusCode::OK, &quote),
        Err(e) => api_error_response(e.with_request_id(&trace.request_id)),
    }
}

pub(crate) async fn countdown_handler(State(state): State<AppState>) -> Response {
    json_ok(StatusCode::OK, &state.countdown.current())
}

pub(crate) async fn submit_inquiry_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let form: InquiryForm = match decode_body(body, &trace.request_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.partnerships.submit(form).await {
        Ok(inquiry) => json_ok(StatusCode::CREATED, &inquiry),
        Err(e) => failure_response(e, &trace.request_id),
    }
}
