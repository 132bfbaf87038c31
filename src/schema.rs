use serde_json::Value;

use crate::resource::ResourceData;
use crate::resources::ResourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int,
    /// Map of string to string.
    Map,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldType,
    pub required: bool,
    pub force_new: bool,
    pub deprecated: Option<&'static str>,
    pub conflicts_with: &'static [&'static str],
    pub default: Option<Value>,
    pub description: &'static str,
    /// Canonical form used when comparing planned and prior values.
    pub normalize: Option<fn(&Value) -> Value>,
}

impl Field {
    fn new(name: &'static str, kind: FieldType) -> Self {
        Self {
            name,
            kind,
            required: false,
            force_new: false,
            deprecated: None,
            conflicts_with: &[],
            default: None,
            description: "",
            normalize: None,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn map(name: &'static str) -> Self {
        Self::new(name, FieldType::Map)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn deprecated(mut self, message: &'static str) -> Self {
        self.deprecated = Some(message);
        self
    }

    pub fn conflicts_with(mut self, fields: &'static [&'static str]) -> Self {
        self.conflicts_with = fields;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn normalize(mut self, f: fn(&Value) -> Value) -> Self {
        self.normalize = Some(f);
        self
    }

    fn canonical(&self, value: Option<&Value>) -> Option<Value> {
        match (value, self.normalize) {
            (Some(value), Some(f)) => Some(f(value)),
            (value, _) => value.cloned(),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self.kind {
            FieldType::String => value.is_string(),
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::Map => value
                .as_object()
                .is_some_and(|map| map.values().all(Value::is_string)),
        }
    }
}

/// Non-fatal finding from validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn apply_defaults(&self, d: &mut ResourceData) {
        for field in &self.fields {
            if let Some(default) = &field.default {
                if d.get(field.name).is_none() {
                    d.set(field.name, default.clone());
                }
            }
        }
    }

    /// Force-new fields whose planned value differs from the prior state.
    pub fn replacement_fields(&self, prior: &ResourceData, planned: &ResourceData) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| {
                f.force_new && f.canonical(prior.get(f.name)) != f.canonical(planned.get(f.name))
            })
            .map(|f| f.name)
            .collect()
    }

    /// Checks a description before any remote call. Deprecated fields come
    /// back as diagnostics; everything else is a configuration error.
    pub fn validate(&self, d: &ResourceData) -> Result<Vec<Diagnostic>, ResourceError> {
        if let Some(unknown) = d.attributes().keys().find(|k| self.field(k).is_none()) {
            return Err(ResourceError::Configuration(format!(
                "unsupported argument {:?}",
                unknown
            )));
        }

        let mut diagnostics = Vec::new();
        for field in &self.fields {
            let Some(value) = d.get(field.name) else {
                if field.required {
                    return Err(ResourceError::Configuration(format!(
                        "{:?}: required field is not set",
                        field.name
                    )));
                }
                continue;
            };

            if !field.accepts(value) {
                return Err(ResourceError::Configuration(format!(
                    "{:?}: expected {:?}, got {}",
                    field.name, field.kind, value
                )));
            }

            if field.required && d.get_ok(field.name).is_none() {
                return Err(ResourceError::Configuration(format!(
                    "{:?}: required field is empty",
                    field.name
                )));
            }

            if d.get_ok(field.name).is_none() {
                continue;
            }

            if let Some(other) = field
                .conflicts_with
                .iter()
                .find(|other| d.get_ok(other).is_some())
            {
                return Err(ResourceError::Configuration(format!(
                    "{:?}: conflicts with {}",
                    field.name, other
                )));
            }

            if let Some(message) = field.deprecated {
                diagnostics.push(Diagnostic {
                    field: field.name,
                    message: message.to_string(),
                });
            }
        }

        Ok(diagnostics)
    }
}
