// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Greeting echo returned by `POST /api/process_data`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name used when the request does not carry a `name` field
pub const DEFAULT_NAME: &str = "Guest";

/// Field of the request object holding the caller's name
const NAME_FIELD: &str = "name";

/// Build the greeting for the given display name
pub fn greeting(name: &str) -> String {
    format!("Hello, {name}! Your request was processed by Python.")
}

/// Reply echoing the submitted object alongside a greeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDataReply {
    /// Greeting addressed to the submitted `name`
    pub message: String,
    /// The submitted object, unchanged
    pub received_data: Value,
}

impl ProcessDataReply {
    /// Greet the object's `name` and echo the object back verbatim
    ///
    /// String names are used as-is; any other JSON value is rendered with its
    /// JSON text, so `{"name": 7}` greets `7` and `{"name": null}` greets
    /// `null`. This intentionally differs from the desktop shell's first
    /// backend, which greeted `None`/`True`/`False` for null and booleans.
    pub fn for_object(data: Map<String, Value>) -> Self {
        let message = match data.get(NAME_FIELD) {
            None => greeting(DEFAULT_NAME),
            Some(Value::String(name)) => greeting(name),
            Some(other) => greeting(&other.to_string()),
        };

        Self {
            message,
            received_data: Value::Object(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn missing_name_greets_guest() {
        let reply = ProcessDataReply::for_object(Map::new());

        assert_eq!(
            reply.message,
            "Hello, Guest! Your request was processed by Python."
        );
        assert_eq!(reply.received_data, json!({}));
    }

    #[test]
    fn string_name_is_used_verbatim() {
        let reply = ProcessDataReply::for_object(object(json!({"name": "Ann"})));

        assert_eq!(
            reply.message,
            "Hello, Ann! Your request was processed by Python."
        );
        assert_eq!(reply.received_data, json!({"name": "Ann"}));
    }

    #[test]
    fn non_string_name_uses_json_text() {
        let reply = ProcessDataReply::for_object(object(json!({"name": 42})));
        assert!(reply.message.starts_with("Hello, 42!"));
    }

    #[test]
    fn null_and_boolean_names_use_json_text() {
        let reply = ProcessDataReply::for_object(object(json!({"name": null})));
        assert!(reply.message.starts_with("Hello, null!"));

        let reply = ProcessDataReply::for_object(object(json!({"name": true})));
        assert!(reply.message.starts_with("Hello, true!"));
    }

    #[test]
    fn large_integers_are_echoed_exactly() {
        let raw = r#"{"id":123456789012345678901234567890,"ratio":0.1000000000000000055511151231257827}"#;
        let data: Map<String, Value> = serde_json::from_str(raw).expect("valid object");

        let reply = ProcessDataReply::for_object(data);
        let echoed = serde_json::to_string(&reply.received_data).expect("serializable");

        assert_eq!(echoed, raw);
    }

    #[test]
    fn echo_preserves_key_order() {
        let raw = r#"{"zeta":1,"alpha":{"b":[1,2.5,"x"],"a":null},"name":"Bo"}"#;
        let data: Map<String, Value> = serde_json::from_str(raw).expect("valid object");

        let reply = ProcessDataReply::for_object(data);
        let echoed = serde_json::to_string(&reply.received_data).expect("serializable");

        assert_eq!(echoed, raw);
    }

    #[test]
    fn reply_field_order() {
        let reply = ProcessDataReply::for_object(object(json!({"name": "Ann"})));
        let json = serde_json::to_string(&reply).expect("serializable");

        assert_eq!(
            json,
            r#"{"message":"Hello, Ann! Your request was processed by Python.","received_data":{"name":"Ann"}}"#
        );
    }
}
