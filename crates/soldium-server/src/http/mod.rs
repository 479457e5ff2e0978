// SPDX-License-Identifier: Apache-2.0

pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod entries;
pub(crate) mod public;
pub mod request_tracing;
pub(crate) mod response_contract;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use soldium_api::params::bearer_token;

use crate::services::accounts::Caller;
use crate::services::ServiceError;
use crate::AppState;

pub(crate) async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Caller, ServiceError> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    state.accounts.authenticate(bearer_token(header)).await
}

/// Admin status is read from the store on every call.
pub(crate) async fn authenticate_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Caller, ServiceError> {
    let caller = authenticate(state, headers).await?;
    caller.require_admin()?;
    Ok(caller)
}
