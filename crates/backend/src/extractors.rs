// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Custom extractors for request bodies
//!
//! Axum's `Json` extractor rejects with its own status codes and plain-text
//! bodies. The extractor here maps every failure onto the backend's
//! `{"error": ...}` contract instead.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ServerError;

const MAX_JSON_PAYLOAD_SIZE: usize = 1024 * 1024; // 1MB limit

/// An untyped JSON object taken from the request body
///
/// Keys keep the order they were sent in. Missing, blank, malformed and
/// non-object bodies all reject with [`ServerError::NoData`]; failures to read
/// the body itself reject with [`ServerError::InvalidRequest`].
#[derive(Debug)]
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::InvalidRequest {
                message: format!("failed to read request body: {rejection}"),
            })?;

        if bytes.len() > MAX_JSON_PAYLOAD_SIZE {
            return Err(ServerError::InvalidRequest {
                message: format!(
                    "request body too large: {} bytes (max: {} bytes)",
                    bytes.len(),
                    MAX_JSON_PAYLOAD_SIZE
                ),
            });
        }

        Self::parse(&bytes)
    }
}

impl JsonObject {
    fn parse(bytes: &[u8]) -> Result<Self, ServerError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ServerError::NoData);
        }

        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => {
                debug!(kind = json_kind(&other), "request body is not a JSON object");
                Err(ServerError::NoData)
            }
            Err(err) => {
                debug!(error = %err, "request body is not valid JSON");
                Err(ServerError::NoData)
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
