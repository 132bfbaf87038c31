pub mod entity_alias;
pub mod terraform_cloud_role;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::resource::ResourceData;
use crate::schema::Schema;
use crate::vault::{LogicalClient, VaultError};

pub use entity_alias::EntityAlias;
pub use terraform_cloud_role::TerraformCloudRole;

pub const RESOURCE_TYPES: &[&str] = &[terraform_cloud_role::TYPE_NAME, entity_alias::TYPE_NAME];

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: VaultError,
    },

    #[error("IdentityEntityAlias {:?} already exists. {}", .name, merge_hint(.alias_id))]
    AmbiguousMerge {
        name: String,
        alias_id: Option<String>,
    },
}

fn merge_hint(alias_id: &Option<String>) -> String {
    match alias_id {
        Some(id) => format!("Alias resource ID {:?} may be imported.", id),
        None => "Unable to determine alias id.".to_string(),
    }
}

impl ResourceError {
    /// Wraps a client failure with the operation and path it happened on.
    pub fn remote(context: impl Into<String>) -> impl FnOnce(VaultError) -> Self {
        let context = context.into();
        move |source| ResourceError::Remote { context, source }
    }
}

/// CRUD binding between declarative state and one kind of remote object.
///
/// The host calls at most one operation at a time per instance.
#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> &Schema;

    async fn create(&self, d: &mut ResourceData) -> Result<(), ResourceError>;

    async fn read(&self, d: &mut ResourceData) -> Result<(), ResourceError>;

    async fn update(&self, d: &mut ResourceData) -> Result<(), ResourceError>;

    async fn delete(&self, d: &ResourceData) -> Result<(), ResourceError>;

    async fn exists(&self, d: &ResourceData) -> Result<bool, ResourceError>;

    /// Import passes the identity string through unchanged.
    async fn import(&self, id: &str) -> Result<ResourceData, ResourceError>;
}

pub fn get_resource(
    name: &str,
    client: Arc<dyn LogicalClient>,
) -> Result<Box<dyn Resource>, ResourceError> {
    match name {
        terraform_cloud_role::TYPE_NAME => Ok(Box::new(TerraformCloudRole::new(client))),
        entity_alias::TYPE_NAME => Ok(Box::new(EntityAlias::new(client))),
        other => Err(ResourceError::UnknownResourceType(other.to_string())),
    }
}

/// Argument schema of a resource type, without a client.
pub fn schema_for(name: &str) -> Result<Schema, ResourceError> {
    match name {
        terraform_cloud_role::TYPE_NAME => Ok(terraform_cloud_role::role_schema()),
        entity_alias::TYPE_NAME => Ok(entity_alias::alias_schema()),
        other => Err(ResourceError::UnknownResourceType(other.to_string())),
    }
}

fn required_str<'a>(d: &'a ResourceData, key: &str) -> Result<&'a str, ResourceError> {
    d.get_str(key)
        .ok_or_else(|| ResourceError::Configuration(format!("{:?}: required field is not set", key)))
}

fn required_id(d: &ResourceData) -> Result<&str, ResourceError> {
    d.id()
        .ok_or_else(|| ResourceError::NotFound("resource has no ID".to_string()))
}
