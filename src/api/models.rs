// Wire types for the encryption service
//
// Field names match the service's JSON exactly. Optional request fields are
// omitted rather than sent as empty strings.

use serde::{Deserialize, Serialize};

/// Body for `POST /generate-key` (serializes as `{}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateKeyRequest {}

/// Body for `POST /encrypt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptRequest {
    pub message: String,
    /// When absent the service generates a fresh key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Body for `POST /decrypt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecryptRequest {
    pub encrypted_message: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyResponse {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EncryptResponse {
    pub encrypted_message: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecryptResponse {
    pub decrypted_message: String,
}

/// Error body carried by non-2xx responses
///
/// `detail` is only honoured when it is a plain string.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_key_body_is_empty_object() {
        let body = serde_json::to_value(GenerateKeyRequest {}).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_encrypt_without_key_omits_field() {
        let body = serde_json::to_value(EncryptRequest {
            message: "hello".to_string(),
            key: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "message": "hello" }));
    }

    #[test]
    fn test_encrypt_with_key_includes_field() {
        let body = serde_json::to_value(EncryptRequest {
            message: "hello".to_string(),
            key: Some("k".to_string()),
        })
        .unwrap();
        assert_eq!(body, json!({ "message": "hello", "key": "k" }));
    }

    #[test]
    fn test_error_body_rejects_structured_detail() {
        // Validation errors from the service carry a list, not a string
        let parsed: Result<ErrorBody, _> =
            serde_json::from_value(json!({ "detail": [{ "msg": "field required" }] }));
        assert!(parsed.is_err());
    }
}
