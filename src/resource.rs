use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative state of one resource instance: its identity (once known)
/// plus the attribute values last written or read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    attributes: Map<String, Value>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self {
            id: None,
            attributes,
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let mut data = Self::default();
        data.set_id(id);
        data
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// An empty id clears the identity.
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.id = if id.is_empty() { None } else { Some(id) };
    }

    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Raw value, present even when it is a zero value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// Value only when set to something other than its type's zero value.
    pub fn get_ok(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !is_zero(v))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get_ok(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_ok(key).and_then(Value::as_i64)
    }

    /// Setting `null` removes the attribute.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        match value.into() {
            Value::Null => {
                self.attributes.remove(key);
            }
            value => {
                self.attributes.insert(key.to_string(), value);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> ResourceData {
        ResourceData::from_attributes(value.as_object().cloned().unwrap())
    }

    #[test]
    fn test_get_ok_skips_zero_values() {
        let d = data(json!({
            "ttl": 0,
            "max_ttl": 600,
            "team_id": "",
            "organization": "acme",
            "custom_metadata": {}
        }));

        assert!(d.get_ok("ttl").is_none());
        assert_eq!(d.get_i64("max_ttl"), Some(600));
        assert!(d.get_str("team_id").is_none());
        assert_eq!(d.get_str("organization"), Some("acme"));
        assert!(d.get_ok("custom_metadata").is_none());
        assert!(d.get("custom_metadata").is_some());
        assert_eq!(d.get("ttl"), Some(&json!(0)));
    }

    #[test]
    fn test_set_null_removes_attribute() {
        let mut d = data(json!({"user_id": "user-1"}));
        d.set("user_id", Value::Null);
        assert!(d.get("user_id").is_none());
        assert!(d.attributes().is_empty());
    }

    #[test]
    fn test_empty_id_clears_identity() {
        let mut d = ResourceData::with_id("tfc/role/admin");
        assert_eq!(d.id(), Some("tfc/role/admin"));
        d.set_id("");
        assert!(d.id().is_none());
    }

    #[test]
    fn test_state_serialization_snake_case() {
        let mut d = data(json!({"name": "admin"}));
        d.set_id("tfc/role/admin");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["id"], "tfc/role/admin");
        assert_eq!(json["attributes"]["name"], "admin");
    }

    #[test]
    fn test_state_without_id_omits_field() {
        let d = data(json!({"name": "admin"}));
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("\"id\""));

        let parsed: ResourceData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }
}
