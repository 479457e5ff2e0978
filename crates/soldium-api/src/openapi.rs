// SPDX-License-Identifier: Apache-2.0

use serde_json::{json, Map, Value};

use crate::error_mapping::API_ERROR_SCHEMA_REF;

const ROUTES: &[(&str, &str, &str, &[u16])] = &[
    ("/healthz", "get", "liveness", &[]),
    ("/readyz", "get", "readiness", &[503]),
    ("/v1/version", "get", "service version", &[]),
    ("/v1/presale/terms", "get", "presale rate, price and wallet", &[]),
    ("/v1/presale/quote", "get", "SODM for a SOL or USD amount", &[400]),
    ("/v1/auth/sign-up", "post", "create account", &[400, 409, 503]),
    ("/v1/auth/sign-in", "post", "open session", &[400, 401, 503]),
    ("/v1/auth/sign-out", "post", "close session", &[401]),
    ("/v1/auth/reset-password", "post", "request password reset", &[400, 503]),
    ("/v1/me", "get", "current account", &[401, 404]),
    ("/v1/entries", "get", "own entries, newest first", &[401, 503]),
    ("/v1/entries", "post", "submit presale entry", &[400, 401, 403, 503]),
    ("/v1/admin/entries", "get", "all entries with aggregates", &[400, 401, 403, 503]),
    ("/v1/admin/stats", "get", "review aggregates", &[401, 403, 503]),
    ("/v1/admin/entries/{id}/verify", "post", "verify pending entry", &[401, 403, 404, 409, 503]),
    ("/v1/admin/entries/{id}/reject", "post", "reject pending entry", &[401, 403, 404, 409, 503]),
    ("/v1/admin/settings/countdown", "get", "countdown settings", &[401, 403, 503]),
    ("/v1/admin/settings/countdown", "put", "save countdown settings", &[400, 401, 403, 503]),
    ("/v1/countdown", "get", "time remaining to next burn", &[]),
    ("/v1/partnership-inquiries", "post", "submit partnership inquiry", &[400, 503]),
    ("/v1/admin/partnership-inquiries", "get", "partnership inquiries", &[401, 403, 503]),
];

#[must_use]
pub fn openapi_v1_spec() -> Value {
    let mut paths = Map::new();
    for (path, method, description, errors) in ROUTES {
        let mut responses = Map::new();
        responses.insert("200".to_string(), json!({"description": description}));
        for status in *errors {
            responses.insert(
                status.to_string(),
                json!({
                    "description": "error",
                    "content": {"application/json": {"schema": {"$ref": API_ERROR_SCHEMA_REF}}}
                }),
            );
        }
        let entry = paths
            .entry((*path).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = entry {
            methods.insert((*method).to_string(), json!({"responses": responses}));
        }
    }
    json!({
        "openapi": "3.0.3",
        "info": {"title": "soldium presale API", "version": "v1"},
        "paths": paths,
        "components": {
            "schemas": {
                "ApiError": {
                    "type": "object",
                    "required": ["code", "message", "details", "request_id"],
                    "properties": {
                        "code": {"type": "string"},
                        "message": {"type": "string"},
                        "details": {"type": "object"},
                        "request_id": {"type": "string"}
                    }
                }
            }
        }
    })
}
