// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::Extension;
use soldium_api::convert::entries_response;
use soldium_api::{EntryDto, SubmitEntryRequestDto};

use super::authenticate;
use super::request_tracing::RequestTrace;
use super::response_contract::{decode_body, failure_response, json_ok};
use crate::AppState;

pub(crate) async fn submit_entry_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let caller = match authenticate(&state, &headers).await {
        Ok(c) => c,
        Err(e) => return failure_response(e, &trace.request_id),
    };
    let req: SubmitEntryRequestDto = match decode_body(body, &trace.request_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.submissions.submit(&caller, req.into_form()).await {
        Ok(entry) => json_ok(StatusCode::CREATED, &EntryDto::from(entry)),
        Err(e) => failure_response(e, &trace.request_id),
    }
}

pub(crate) async fn own_entries_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    headers: HeaderMap,
) -> Response {
    let caller = match authenticate(&state, &headers).await {
        Ok(c) => c,
        Err(e) => return failure_response(e, &trace.request_id),
    };
    match state.submissions.own_entries(&caller).await {
        Ok(entries) => json_ok(StatusCode::OK, &entries_response(entries)),
        Err(e) => failure_response(e, &trace.request_id),
    }
}
