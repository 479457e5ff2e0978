// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};

use axum::http::HeaderMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTrace {
    pub request_id: String,
    pub correlation_id: Option<String>,
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Reuses the caller's `x-request-id` or mints `req-<16 hex>` from the seed.
#[must_use]
pub(crate) fn extract_request_trace(headers: &HeaderMap, seed: &AtomicU64) -> RequestTrace {
    let request_id = header_text(headers, "x-request-id").unwrap_or_else(|| {
        let id = seed.fetch_add(1, Ordering::Relaxed);
        format!("req-{id:016x}")
    });
    RequestTrace {
        request_id,
        correlation_id: header_text(headers, "x-correlation-id"),
    }
}
