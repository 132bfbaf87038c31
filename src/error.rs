use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TfvrError {
    #[error(transparent)]
    Resource(#[from] crate::resources::ResourceError),

    #[error(transparent)]
    Vault(#[from] crate::vault::VaultError),

    #[error(transparent)]
    State(#[from] crate::terraform::StateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid description in '{path}': {message}")]
    Description { path: PathBuf, message: String },

    #[error("no state for {resource_type} '{name}'")]
    NoState { resource_type: String, name: String },
}
