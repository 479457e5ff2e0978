// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use soldium_api::params::bearer_token;
use soldium_api::{
    ApiError, MeResponseDto, ResetPasswordRequestDto, ResetPasswordResponseDto, SignInRequestDto,
    SignUpRequestDto,
};

use super::request_tracing::RequestTrace;
use super::response_contract::{api_error_response, decode_body, failure_response, json_ok};
use super::authenticate;
use crate::AppState;

const RESET_SENT_MESSAGE: &str = "Password reset email sent! Check your inbox.";

pub(crate) async fn sign_up_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let req: SignUpRequestDto = match decode_body(body, &trace.request_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.accounts.sign_up(&req.email, &req.password).await {
        Ok(session) => json_ok(StatusCode::CREATED, &session),
        Err(e) => failure_response(e, &trace.request_id),
    }
}

pub(crate) async fn sign_in_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let req: SignInRequestDto = match decode_body(body, &trace.request_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.accounts.sign_in(&req.email, &req.password).await {
        Ok(session) => json_ok(StatusCode::OK, &session),
        Err(e) => failure_response(e, &trace.request_id),
    }
}

pub(crate) async fn sign_out_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    headers: HeaderMap,
) -> Response {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    match state.accounts.sign_out(bearer_token(header)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => failure_response(e, &trace.request_id),
    }
}

pub(crate) async fn reset_password_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let req: ResetPasswordRequestDto = match decode_body(body, &trace.request_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.accounts.reset_password(&req.email).await {
        Ok(()) => json_ok(
            StatusCode::OK,
            &ResetPasswordResponseDto {
                message: RESET_SENT_MESSAGE.to_string(),
            },
        ),
        Err(e) => failure_response(e, &trace.request_id),
    }
}

pub(crate) async fn me_handler(
    State(state): State<AppState>,
    Extension(trace): Extension<RequestTrace>,
    headers: HeaderMap,
) -> Response {
    let caller = match authenticate(&state, &headers).await {
        Ok(c) => c,
        Err(e) => return failure_response(e, &trace.request_id),
    };
    match caller.account {
        Some(account) => json_ok(
            StatusCode::OK,
            &MeResponseDto {
                user_id: caller.session.user_id,
                account,
            },
        ),
        None => api_error_response(ApiError::not_found("Account").with_request_id(&trace.request_id)),
    }
}
