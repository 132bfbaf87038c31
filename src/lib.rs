//! tfvr - Terraform-style resource adapters for Vault
//!
//! CRUD bindings that reconcile declarative state with the Vault logical API:
//! Terraform Cloud secrets engine roles and identity entity aliases.

pub mod config;
pub mod output;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod terraform;
pub mod vault;

mod error;

pub use config::VaultConfig;
pub use error::TfvrError;
pub use resource::ResourceData;
pub use resources::{
    EntityAlias, RESOURCE_TYPES, Resource, ResourceError, TerraformCloudRole, get_resource,
    schema_for,
};
pub use terraform::{StateError, StateStore};
pub use vault::{LogicalClient, Secret, VaultClient, VaultError};
