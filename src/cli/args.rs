use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tfvr::config::{DEFAULT_ADDRESS, DEFAULT_TIMEOUT_SECS, VaultConfig};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub vault: VaultArgs,

    /// Directory holding local state (defaults to the user data directory)
    #[arg(long, env = "TFVR_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub struct VaultArgs {
    #[arg(long, env = "VAULT_ADDR", default_value = DEFAULT_ADDRESS, global = true)]
    pub address: String,

    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    #[arg(long, env = "VAULT_NAMESPACE", global = true)]
    pub namespace: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,
}

impl VaultArgs {
    pub fn to_config(&self) -> VaultConfig {
        VaultConfig::new(self.address.clone(), self.token.clone())
            .with_namespace(self.namespace.clone())
            .with_timeout(Duration::from_secs(self.timeout))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or update a resource from a JSON description
    Apply(ApplyArgs),
    /// Re-read a resource and update local state
    Refresh(TargetArgs),
    /// Delete a resource and its local state
    Destroy(TargetArgs),
    /// Adopt an existing remote object into local state
    Import(ImportArgs),
    /// Print local state
    Show(TargetArgs),
    /// List supported resource types
    Types,
    /// Describe the arguments of a resource type
    Schema(SchemaArgs),
}

#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    pub resource_type: String,
}

#[derive(clap::Args, Debug)]
pub struct TargetArgs {
    pub resource_type: String,
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// JSON object with the desired attributes
    #[arg(long, short)]
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Remote identity: role path, or alias ID or name
    pub id: String,
}
