use serde_json::Value;
use tabled::{Table, Tabled};

use crate::resource::ResourceData;
use crate::schema::{FieldType, Schema};

#[derive(Debug, Tabled)]
struct AttributeRow {
    attribute: String,
    value: String,
}

#[derive(Debug, Tabled)]
struct TypeRow {
    #[tabled(rename = "resource type")]
    resource_type: String,
}

#[derive(Debug, Tabled)]
struct FieldRow {
    field: String,
    #[tabled(rename = "type")]
    kind: String,
    flags: String,
    description: String,
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Attribute/value table of one instance's state, identity first.
pub fn state_table(d: &ResourceData) -> String {
    let mut rows = vec![AttributeRow {
        attribute: "id".to_string(),
        value: d.id().unwrap_or("-").to_string(),
    }];
    rows.extend(d.attributes().iter().map(|(key, value)| AttributeRow {
        attribute: key.clone(),
        value: render(value),
    }));
    Table::new(rows).to_string()
}

pub fn types_table(types: &[&str]) -> String {
    Table::new(types.iter().map(|t| TypeRow {
        resource_type: t.to_string(),
    }))
    .to_string()
}

/// One row per argument: type, flags and description.
pub fn schema_table(schema: &Schema) -> String {
    Table::new(schema.fields().iter().map(|field| {
        let mut flags = Vec::new();
        if field.required {
            flags.push("required".to_string());
        }
        if field.force_new {
            flags.push("forces replacement".to_string());
        }
        if let Some(default) = &field.default {
            flags.push(format!("default {}", render(default)));
        }
        if !field.conflicts_with.is_empty() {
            flags.push(format!("conflicts with {}", field.conflicts_with.join(", ")));
        }
        if field.deprecated.is_some() {
            flags.push("deprecated".to_string());
        }
        FieldRow {
            field: field.name.to_string(),
            kind: match field.kind {
                FieldType::String => "string",
                FieldType::Int => "int",
                FieldType::Map => "map(string)",
            }
            .to_string(),
            flags: flags.join(", "),
            description: field.description.to_string(),
        }
    }))
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_table_lists_id_and_attributes() {
        let mut d = ResourceData::from_attributes(
            json!({"name": "admin", "ttl": 300, "custom_metadata": {"team": "infra"}})
                .as_object()
                .cloned()
                .unwrap(),
        );
        d.set_id("tfc/role/admin");

        let table = state_table(&d);
        assert!(table.contains("tfc/role/admin"));
        assert!(table.contains("admin"));
        assert!(table.contains("300"));
        assert!(table.contains(r#"{"team":"infra"}"#));
        assert!(!table.contains("\"admin\""));
    }

    #[test]
    fn test_state_table_without_id() {
        let table = state_table(&ResourceData::new());
        assert!(table.contains("id"));
        assert!(table.contains("-"));
    }

    #[test]
    fn test_schema_table_renders_descriptions() {
        let table = schema_table(&crate::resources::terraform_cloud_role::role_schema());
        assert!(table.contains("description"));
        assert!(table.contains("Name of the Terraform Cloud or Enterprise organization"));
        assert!(table.contains("required, forces replacement"));
        assert!(table.contains("conflicts with backend, deprecated"));
        assert!(table.contains("default 0"));
    }

    #[test]
    fn test_types_table() {
        let table = types_table(&["vault_identity_entity_alias"]);
        assert!(table.contains("resource type"));
        assert!(table.contains("vault_identity_entity_alias"));
    }
}
