//! `vault_terraform_cloud_secret_role`: a role of the Terraform Cloud secrets
//! engine, stored at `{backend}/role/{name}`.

mod path;

pub use path::{BackendSelection, InvalidRolePath, RolePath};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{Resource, ResourceError, required_id, required_str};
use crate::resource::ResourceData;
use crate::schema::{Field, Schema};
use crate::vault::{Data, LogicalClient};

pub const TYPE_NAME: &str = "vault_terraform_cloud_secret_role";

const STRING_FIELDS: &[&str] = &["organization", "team_id", "user_id"];
const TTL_FIELDS: &[&str] = &["max_ttl", "ttl"];

pub struct TerraformCloudRole {
    client: Arc<dyn LogicalClient>,
    schema: Schema,
}

impl TerraformCloudRole {
    pub fn new(client: Arc<dyn LogicalClient>) -> Self {
        Self {
            client,
            schema: role_schema(),
        }
    }

    fn target(d: &ResourceData) -> Result<RolePath, ResourceError> {
        let name = required_str(d, "name")?;
        let backend = BackendSelection::resolve(d, name)?;
        Ok(RolePath::new(backend.mount(), name))
    }

    /// Zero TTLs are left out so the backend applies its system default.
    fn payload(d: &ResourceData) -> Data {
        let mut payload = Data::new();
        for &key in STRING_FIELDS {
            if let Some(value) = d.get_str(key) {
                payload.insert(key.to_string(), Value::from(value));
            }
        }
        for &key in TTL_FIELDS {
            if let Some(value) = d.get_i64(key) {
                payload.insert(key.to_string(), Value::from(value));
            }
        }
        payload
    }

    async fn write(&self, d: &mut ResourceData, path: RolePath) -> Result<(), ResourceError> {
        let path = path.to_string();

        tracing::debug!(path = %path, "configuring Terraform Cloud secrets backend role");
        self.client
            .write(&path, Self::payload(d))
            .await
            .map_err(ResourceError::remote(format!(
                "error writing role configuration for {:?}",
                path
            )))?;

        d.set_id(path);
        self.read(d).await
    }
}

fn trim_slashes(value: &Value) -> Value {
    match value.as_str() {
        Some(s) => Value::String(s.trim_matches('/').to_string()),
        None => value.clone(),
    }
}

pub fn role_schema() -> Schema {
    Schema::new(vec![
        Field::string("name")
            .required()
            .force_new()
            .describe("The name of an existing role against which to create this Terraform Cloud credential"),
        Field::string("path")
            .deprecated("use `backend` instead")
            .conflicts_with(&["backend"])
            .describe("The path of the Terraform Cloud Secret Backend the role belongs to."),
        Field::string("backend")
            .force_new()
            .conflicts_with(&["path"])
            .normalize(trim_slashes)
            .describe("The path of the Terraform Cloud Secret Backend the role belongs to."),
        Field::string("organization")
            .required()
            .describe("Name of the Terraform Cloud or Enterprise organization"),
        Field::string("team_id")
            .describe("ID of the Terraform Cloud or Enterprise team under organization"),
        Field::string("user_id").describe("ID of the Terraform Cloud or Enterprise user"),
        Field::int("max_ttl")
            .default_value(0)
            .describe("Maximum lease for generated credentials. 0 uses the system default."),
        Field::int("ttl")
            .default_value(0)
            .describe("Default lease for generated credentials. 0 uses the system default."),
    ])
}

#[async_trait]
impl Resource for TerraformCloudRole {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn create(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        let path = Self::target(d)?;
        self.write(d, path).await
    }

    async fn read(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        let id = d.id().unwrap_or_default().to_string();

        let path = match RolePath::parse(&id) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(id = %id, "removing Terraform Cloud role because its ID is invalid");
                d.clear_id();
                return Err(ResourceError::NotFound(err.to_string()));
            }
        };

        tracing::debug!(path = %id, "reading Terraform Cloud secrets backend role");
        let secret = self
            .client
            .read(&id)
            .await
            .map_err(ResourceError::remote(format!(
                "error reading role configuration for {:?}",
                id
            )))?;

        let Some(secret) = secret else {
            tracing::warn!(path = %id, "Terraform Cloud role not found, removing identity");
            d.clear_id();
            return Err(ResourceError::NotFound(format!(
                "Terraform Cloud role {:?}",
                id
            )));
        };

        // Imported state has neither attribute yet; it lands in `backend`.
        let field = BackendSelection::resolve(d, path.name())
            .map(|selection| selection.field())
            .unwrap_or("backend");
        d.set("name", path.name());
        d.set(field, path.backend());
        for &key in STRING_FIELDS {
            d.set(key, secret.get(key).cloned().unwrap_or(Value::Null));
        }
        for &key in TTL_FIELDS {
            d.set(key, secret.get(key).and_then(Value::as_i64).unwrap_or(0));
        }

        Ok(())
    }

    /// Moving to another backend or name is a replacement planned by the
    /// caller from the force-new fields, not an update.
    async fn update(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        let path = Self::target(d)?;
        self.write(d, path).await
    }

    async fn delete(&self, d: &ResourceData) -> Result<(), ResourceError> {
        let path = required_id(d)?;

        tracing::debug!(path = %path, "deleting Terraform Cloud backend role");
        self.client
            .delete(path)
            .await
            .map_err(ResourceError::remote(format!(
                "error deleting Terraform Cloud backend role at {:?}",
                path
            )))?;
        tracing::debug!(path = %path, "deleted Terraform Cloud backend role");

        Ok(())
    }

    async fn exists(&self, d: &ResourceData) -> Result<bool, ResourceError> {
        let path = required_id(d)?;

        tracing::debug!(path = %path, "checking Terraform Cloud secrets backend role");
        let secret = self
            .client
            .read(path)
            .await
            .map_err(ResourceError::remote(format!(
                "error reading role configuration for {:?}",
                path
            )))?;

        Ok(secret.is_some())
    }

    async fn import(&self, id: &str) -> Result<ResourceData, ResourceError> {
        let path = RolePath::parse(id).map_err(|e| ResourceError::NotFound(e.to_string()))?;
        Ok(ResourceData::with_id(path.to_string()))
    }
}
