//! Upload signing DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /sign-cloudinary`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    /// Upload parameters the client wants signed.
    #[schema(value_type = Object)]
    pub params_to_sign: BTreeMap<String, serde_json::Value>,
}

impl SignRequest {
    /// Flattens the JSON values into the strings that get signed.
    ///
    /// Arrays are joined with `,`; `null` becomes an empty (and therefore
    /// unsigned) value.
    #[must_use]
    pub fn string_params(&self) -> BTreeMap<String, String> {
        self.params_to_sign
            .iter()
            .map(|(key, value)| (key.clone(), param_value(value)))
            .collect()
    }
}

fn param_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(param_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Response body for `POST /sign-cloudinary`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SignResponse {
    /// Hex-encoded SHA-256 signature.
    pub signature: String,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn values_flatten_to_strings() {
        let Ok(req) = serde_json::from_value::<SignRequest>(serde_json::json!({
            "paramsToSign": {
                "timestamp": 1_700_000_000,
                "folder": "events",
                "tags": ["a", "b"],
                "eager": null
            }
        })) else {
            panic!("request did not deserialize");
        };
        let params = req.string_params();
        assert_eq!(params.get("timestamp").map(String::as_str), Some("1700000000"));
        assert_eq!(params.get("folder").map(String::as_str), Some("events"));
        assert_eq!(params.get("tags").map(String::as_str), Some("a,b"));
        assert_eq!(params.get("eager").map(String::as_str), Some(""));
    }
}
