//! `vault_identity_entity_alias`: an alias in the identity store, addressed by
//! the ID Vault assigns on creation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{Resource, ResourceError, required_id, required_str};
use crate::resource::ResourceData;
use crate::schema::{Field, Schema};
use crate::vault::{Data, LogicalClient};

pub const TYPE_NAME: &str = "vault_identity_entity_alias";

const ENTITY_ALIAS_PATH: &str = "identity/entity-alias";
const ENTITY_PATH: &str = "identity/entity";

const SYNCED_FIELDS: &[&str] = &["name", "mount_accessor", "canonical_id", "custom_metadata"];

pub fn alias_id_path(id: &str) -> String {
    format!("{}/id/{}", ENTITY_ALIAS_PATH, id)
}

pub fn alias_name_path(name: &str) -> String {
    format!("{}/name/{}", ENTITY_ALIAS_PATH, name)
}

pub fn entity_id_path(id: &str) -> String {
    format!("{}/id/{}", ENTITY_PATH, id)
}

/// Looks through the aliases of entity `canonical_id` for the one matching
/// `name` and `mount_accessor`.
pub async fn find_alias_id(
    client: &dyn LogicalClient,
    canonical_id: &str,
    name: &str,
    mount_accessor: &str,
) -> Result<String, ResourceError> {
    let path = entity_id_path(canonical_id);

    let entity = client
        .read(&path)
        .await
        .map_err(ResourceError::remote("error reading entity aliases"))?;

    let found = entity
        .as_ref()
        .and_then(|e| e.get("aliases"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .find(|alias| {
            alias.get("name").and_then(Value::as_str) == Some(name)
                && alias.get("mount_accessor").and_then(Value::as_str) == Some(mount_accessor)
        })
        .and_then(|alias| alias.get("id"))
        .and_then(Value::as_str);

    match found {
        Some(id) => Ok(id.to_string()),
        None => Err(ResourceError::NotFound(format!(
            "unable to determine alias ID. canonical ID: {:?} name: {:?} mount accessor: {:?}",
            canonical_id, name, mount_accessor
        ))),
    }
}

pub struct EntityAlias {
    client: Arc<dyn LogicalClient>,
    schema: Schema,
}

impl EntityAlias {
    pub fn new(client: Arc<dyn LogicalClient>) -> Self {
        Self {
            client,
            schema: alias_schema(),
        }
    }
}

pub fn alias_schema() -> Schema {
    Schema::new(vec![
        Field::string("name")
            .required()
            .describe("Name of the entity alias."),
        Field::string("mount_accessor")
            .required()
            .describe("Mount accessor to which this alias belongs."),
        Field::string("canonical_id")
            .required()
            .describe("ID of the entity to which this is an alias."),
        Field::map("custom_metadata")
            .describe("Custom metadata to be associated with this alias."),
    ])
}

fn empty_map() -> Value {
    Value::Object(Map::new())
}

#[async_trait]
impl Resource for EntityAlias {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn create(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        let name = required_str(d, "name")?.to_string();
        let mount_accessor = required_str(d, "mount_accessor")?.to_string();
        let canonical_id = required_str(d, "canonical_id")?.to_string();

        let mut data = Data::new();
        data.insert("name".to_string(), Value::from(name.as_str()));
        data.insert("mount_accessor".to_string(), Value::from(mount_accessor.as_str()));
        data.insert("canonical_id".to_string(), Value::from(canonical_id.as_str()));
        data.insert(
            "custom_metadata".to_string(),
            d.get("custom_metadata").cloned().unwrap_or_else(empty_map),
        );

        let response = self
            .client
            .write(ENTITY_ALIAS_PATH, data)
            .await
            .map_err(ResourceError::remote(format!(
                "error writing IdentityEntityAlias {:?}",
                name
            )))?;

        let Some(id) = response.as_ref().and_then(|r| r.get_str("id")) else {
            // Vault merged the alias into an existing entity and answered
            // without a body.
            let alias_id =
                match find_alias_id(self.client.as_ref(), &canonical_id, &name, &mount_accessor)
                    .await
                {
                    Ok(id) => Some(id),
                    Err(err) => {
                        tracing::debug!(error = %err, name = %name, "alias ID recovery failed");
                        None
                    }
                };
            return Err(ResourceError::AmbiguousMerge { name, alias_id });
        };

        tracing::debug!(name = %name, id = %id, "wrote IdentityEntityAlias");
        d.set_id(id);
        self.read(d).await
    }

    async fn read(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        let Some(id) = d.id().map(str::to_string) else {
            return Ok(());
        };
        let path = alias_id_path(&id);

        tracing::debug!(id = %id, path = %path, "reading IdentityEntityAlias");
        let secret = self
            .client
            .read(&path)
            .await
            .map_err(ResourceError::remote(format!(
                "error reading IdentityEntityAlias {:?}",
                id
            )))?;

        let Some(secret) = secret else {
            tracing::warn!(id = %id, "IdentityEntityAlias not found, removing from state");
            d.clear_id();
            return Ok(());
        };

        if let Some(remote_id) = secret.get_str("id") {
            d.set_id(remote_id);
        }
        for &key in SYNCED_FIELDS {
            d.set(key, secret.get(key).cloned().unwrap_or(Value::Null));
        }
        Ok(())
    }

    async fn update(&self, d: &mut ResourceData) -> Result<(), ResourceError> {
        let id = required_id(d)?.to_string();
        let path = alias_id_path(&id);

        tracing::debug!(id = %id, "updating IdentityEntityAlias");
        let current = self
            .client
            .read(&path)
            .await
            .map_err(ResourceError::remote(format!(
                "error updating IdentityEntityAlias {:?}",
                id
            )))?;

        let Some(current) = current else {
            tracing::warn!(id = %id, "IdentityEntityAlias vanished before update");
            d.clear_id();
            return Err(ResourceError::NotFound(format!(
                "IdentityEntityAlias {:?}",
                id
            )));
        };

        let mut data = Data::new();
        for key in ["name", "mount_accessor", "canonical_id"] {
            let value = d
                .get_ok(key)
                .or_else(|| current.get(key))
                .cloned()
                .unwrap_or(Value::Null);
            data.insert(key.to_string(), value);
        }
        // Metadata is replaced as a whole, never merged key by key.
        let metadata = d
            .get("custom_metadata")
            .or_else(|| current.get("custom_metadata"))
            .cloned()
            .unwrap_or_else(empty_map);
        data.insert("custom_metadata".to_string(), metadata);

        self.client
            .write(&path, data)
            .await
            .map_err(ResourceError::remote(format!(
                "error updating IdentityEntityAlias {:?}",
                id
            )))?;
        tracing::debug!(id = %id, "updated IdentityEntityAlias");

        self.read(d).await
    }

    async fn delete(&self, d: &ResourceData) -> Result<(), ResourceError> {
        let id = required_id(d)?;
        let path = alias_id_path(id);

        tracing::debug!(id = %id, "deleting IdentityEntityAlias");
        self.client
            .delete(&path)
            .await
            .map_err(ResourceError::remote(format!(
                "error deleting IdentityEntityAlias {:?}",
                id
            )))?;
        tracing::debug!(id = %id, "deleted IdentityEntityAlias");

        Ok(())
    }

    async fn exists(&self, d: &ResourceData) -> Result<bool, ResourceError> {
        let (key, path) = match d.id() {
            Some(id) => (id, alias_id_path(id)),
            None => {
                let name = required_str(d, "name")?;
                (name, alias_name_path(name))
            }
        };

        tracing::debug!(key = %key, "checking if IdentityEntityAlias exists");
        let secret = self
            .client
            .read(&path)
            .await
            .map_err(ResourceError::remote(format!(
                "error checking if IdentityEntityAlias {:?} exists",
                key
            )))?;

        Ok(secret.is_some())
    }

    /// Accepts the alias ID, or its name when no alias has that ID.
    async fn import(&self, id: &str) -> Result<ResourceData, ResourceError> {
        let mut d = ResourceData::with_id(id);
        if self.exists(&d).await? {
            return Ok(d);
        }

        let by_name = self
            .client
            .read(&alias_name_path(id))
            .await
            .map_err(ResourceError::remote(format!(
                "error looking up IdentityEntityAlias {:?} by name",
                id
            )))?;

        match by_name.as_ref().and_then(|s| s.get_str("id")) {
            Some(found) => {
                tracing::info!(name = %id, id = %found, "resolved IdentityEntityAlias by name");
                d.set_id(found);
                Ok(d)
            }
            None => Err(ResourceError::NotFound(format!(
                "IdentityEntityAlias {:?} not found by ID or name",
                id
            ))),
        }
    }
}
