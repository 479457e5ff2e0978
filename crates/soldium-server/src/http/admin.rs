// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::Extension;
use soldium_api::params::{parse_entry_id, parse_status_filter};
use soldium_api::{EntryDto, InquiriesResponseDto, RejectRequestDto};
use soldium_model::CountdownSettingsForm;

use super::authenticate_admin;
use super::request_tracing::RequestTrace;
use super::response_contract::{api_error_response, decode_body, failure_response, json_ok};
use crate::AppState;

macro_rules! admin_or_return {
    ($state:expr, $headers:expr, $trace:expr) => {
        match authenticate_admin(&$state, &$headers).await {
            Ok(caller) => caller,
            Err(e) => return failure_response(e, &$trace.request_id),
        }
    };
}

pub(crate) async fn admin_entries_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    admin_or_return!(state, headers, trace);
    match parse_status_filter(&query) {
        Ok(filter) => json_ok(StatusCode::OK, &state.review.entries(filter)),
        Err(e) => api_error_response(e.with_request_id(&trace.request_id)),
    }
}

pub(crate) async fn admin_stats_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    headers: HeaderMap,
) -> Response {
    admin_or_return!(state, headers, trace);
    json_ok(StatusCode::OK, &state.review.stats())
}

pub(crate) async fn verify_entry_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    admin_or_return!(state, headers, trace);
    let id = match parse_entry_id(&id) {
        Ok(id) => id,
        Err(e) => return api_error_response(e.with_request_id(&trace.request_id)),
    };
    match state.review.verify(id).await {
        Ok(entry) => json_ok(StatusCode::OK, &EntryDto::from(entry)),
        Err(e) => failure_response(e, &trace.request_id),
    }
}

/// The body is optional; an empty body rejects with the default reason.
pub(crate) async fn reject_entry_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    admin_or_return!(state, headers, trace);
    let id = match parse_entry_id(&id) {
        Ok(id) => id,
        Err(e) => return api_error_response(e.with_request_id(&trace.request_id)),
    };
    let req = match body {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => RejectRequestDto::default(),
        other => match decode_body::<RejectRequestDto>(other, &trace.request_id) {
            Ok(v) => v,
            Err(resp) => return resp,
        },
    };
    match state.review.reject(id, req.reason.as_deref()).await {
        Ok(entry) => json_ok(StatusCode::OK, &EntryDto::from(entry)),
        Err(e) => failure_response(e, &trace.request_id),
    }
}

pub(crate) async fn load_settings_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    headers: HeaderMap,
) -> Response {
    admin_or_return!(state, headers, trace);
    match state.review.load_settings().await {
        Ok(settings) => json_ok(StatusCode::OK, &settings),
        Err(e) => failure_response(e, &trace.request_id),
    }
}

pub(crate) async fn save_settings_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    admin_or_return!(state, headers, trace);
    let form: CountdownSettingsForm = match decode_body(body, &trace.request_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.review.save_settings(form).await {
        Ok(settings) => json_ok(StatusCode::OK, &settings),
        Err(e) => failure_response(e, &trace.request_id),
    }
}

pub(crate) async fn list_inquiries_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    headers: HeaderMap,
) -> Response {
    admin_or_return!(state, headers, trace);
    match state.partnerships.list().await {
        Ok(inquiries) => json_ok(StatusCode::OK, &InquiriesResponseDto { inquiries }),
        Err(e) => failure_response(e, &trace.request_id),
    }
}
