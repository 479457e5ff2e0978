// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use soldium_core::EntryId;
use soldium_model::QuoteCurrency;
use soldium_query::StatusFilter;
use std::collections::BTreeMap;

pub const ALLOWED_ADMIN_ENTRY_PARAMS: [&str; 1] = ["status"];

/// Parses `GET /v1/admin/entries` query parameters. Unknown keys are rejected.
pub fn parse_status_filter(query: &BTreeMap<String, String>) -> Result<StatusFilter, ApiError> {
    if let Some(unknown) = query
        .keys()
        .find(|k| !ALLOWED_ADMIN_ENTRY_PARAMS.contains(&k.as_str()))
    {
        return Err(ApiError::invalid_param(unknown, ""));
    }
    match query.get("status") {
        None => Ok(StatusFilter::All),
        Some(raw) => raw
            .parse::<StatusFilter>()
            .map_err(|_| ApiError::invalid_param("status", raw)),
    }
}

pub const ALLOWED_QUOTE_PARAMS: [&str; 2] = ["sol", "usd"];

/// Parses `GET /v1/presale/quote`: exactly one of `sol` or `usd`. The amount
/// text is validated by the terms, not here.
pub fn parse_quote_params(
    query: &BTreeMap<String, String>,
) -> Result<(QuoteCurrency, String), ApiError> {
    if let Some(unknown) = query
        .keys()
        .find(|k| !ALLOWED_QUOTE_PARAMS.contains(&k.as_str()))
    {
        return Err(ApiError::invalid_param(unknown, ""));
    }
    match (query.get("sol"), query.get("usd")) {
        (Some(raw), None) => Ok((QuoteCurrency::Sol, raw.clone())),
        (None, Some(raw)) => Ok((QuoteCurrency::Usd, raw.clone())),
        (Some(_), Some(raw)) => Err(ApiError::invalid_param("usd", raw)),
        (None, None) => Err(ApiError::invalid_param("sol", "")),
    }
}

pub fn parse_entry_id(raw: &str) -> Result<EntryId, ApiError> {
    EntryId::new(raw).map_err(|_| ApiError::invalid_param("id", raw))
}

/// Token of an `Authorization: Bearer <token>` header value.
#[must_use]
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
