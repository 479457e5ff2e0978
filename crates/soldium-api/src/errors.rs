// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Message shown for every backend failure; detail stays in the logs.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ApiErrorCode {
    ValidationFailed,
    InvalidQueryParameter,
    PayloadTooLarge,
    Unauthenticated,
    InvalidCredential,
    EmailAlreadyInUse,
    WeakPassword,
    AuthFailed,
    Forbidden,
    NotFound,
    EntryNotPending,
    StoreUnavailable,
    NotReady,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::InvalidQueryParameter => "invalid_query_parameter",
            Self::PayloadTooLarge => "payload_too_large",
            Self::Unauthenticated => "unauthenticated",
            Self::InvalidCredential => "invalid_credential",
            Self::EmailAlreadyInUse => "email_already_in_use",
            Self::WeakPassword => "weak_password",
            Self::AuthFailed => "auth_failed",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::EntryNotPending => "entry_not_pending",
            Self::StoreUnavailable => "store_unavailable",
            Self::NotReady => "not_ready",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiErrorEnvelope {
    pub error: ApiError,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn into_envelope(self) -> ApiErrorEnvelope {
        ApiErrorEnvelope { error: self }
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "invalid", "value": value}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn validation_failed(field: &str, message: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            message,
            json!({"field": field}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::new(
            ApiErrorCode::Unauthenticated,
            "Please sign in to continue",
            json!({}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn forbidden(reason: &str) -> Self {
        Self::new(ApiErrorCode::Forbidden, reason, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn not_found(what: &str) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{what} not found"),
            json!({}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn store_unavailable() -> Self {
        Self::new(
            ApiErrorCode::StoreUnavailable,
            GENERIC_FAILURE_MESSAGE,
            json!({}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            ApiErrorCode::Internal,
            GENERIC_FAILURE_MESSAGE,
            json!({}),
            "req-unknown",
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
    assert_traits::<ApiErrorEnvelope>();
};
