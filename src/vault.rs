mod client;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod types;

pub use client::VaultClient;
pub use error::VaultError;
pub use types::{Data, Secret};

use async_trait::async_trait;

/// The narrow slice of the Vault logical API the resource adapters need.
///
/// `Ok(None)` means the path holds no object (or the call returned no body).
#[async_trait]
pub trait LogicalClient: Send + Sync {
    async fn read(&self, path: &str) -> Result<Option<Secret>, VaultError>;
    async fn write(&self, path: &str, data: Data) -> Result<Option<Secret>, VaultError>;
    async fn delete(&self, path: &str) -> Result<Option<Secret>, VaultError>;
}
