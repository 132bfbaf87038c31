use serde::Deserialize;
use serde_json::{Map, Value};

/// Request/response body of a logical call: a JSON object of fields.
pub type Data = Map<String, Value>;

/// Envelope Vault wraps around every logical response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Secret {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub lease_id: String,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub data: Option<Data>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

impl Secret {
    pub fn from_data(data: Data) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|data| data.get(key))
    }

    /// Non-empty string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_deserialization_ignores_unknown_fields() {
        let json = r#"{
            "request_id": "9a7e2b8c",
            "lease_id": "",
            "renewable": false,
            "lease_duration": 0,
            "data": {"id": "alias-123", "name": "bob"},
            "wrap_info": null,
            "warnings": null,
            "auth": null
        }"#;

        let secret: Secret = serde_json::from_str(json).unwrap();
        assert_eq!(secret.request_id, "9a7e2b8c");
        assert_eq!(secret.get_str("id"), Some("alias-123"));
        assert_eq!(secret.get_str("name"), Some("bob"));
        assert!(secret.warnings.is_none());
    }

    #[test]
    fn test_secret_null_data() {
        let secret: Secret = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(secret.data.is_none());
        assert!(secret.get("id").is_none());
    }

    #[test]
    fn test_get_str_skips_empty_and_non_string() {
        let secret = Secret::from_data(
            serde_json::json!({"id": "", "ttl": 300})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(secret.get_str("id"), None);
        assert_eq!(secret.get_str("ttl"), None);
        assert_eq!(secret.get("ttl"), Some(&serde_json::json!(300)));
    }

    #[test]
    fn test_error_response_deserialization() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"errors": ["permission denied"]}"#).unwrap();
        assert_eq!(body.errors, vec!["permission denied".to_string()]);
    }
}
