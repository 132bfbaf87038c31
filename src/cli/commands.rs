use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tfvr::terraform::lifecycle;
use tfvr::{
    RESOURCE_TYPES, Resource, StateStore, TfvrError, VaultClient, get_resource, output, schema_for,
};

use super::args::{Cli, Command, TargetArgs, VaultArgs};

pub async fn run(cli: Cli) -> Result<(), TfvrError> {
    let store = match &cli.state_dir {
        Some(dir) => StateStore::at(dir),
        None => StateStore::open_default()?,
    };
    tracing::debug!(state_dir = %store.root().display(), "using state directory");

    match cli.command {
        Command::Types => {
            println!("{}", output::types_table(RESOURCE_TYPES));
        }
        Command::Schema(args) => {
            let schema = schema_for(&args.resource_type)?;
            println!("{}", output::schema_table(&schema));
        }
        Command::Show(target) => {
            let d = load_existing(&store, &target)?;
            println!("{}", output::state_table(&d));
        }
        Command::Apply(args) => {
            let target = args.target;
            let resource = connect(&cli.vault, &target.resource_type)?;
            let desired = load_description(&args.file)?;
            let prior = store.load(&target.resource_type, &target.name)?;

            let d = lifecycle::apply(resource.as_ref(), prior.as_ref(), desired).await?;
            store.save(&target.resource_type, &target.name, &d)?;
            tracing::info!(name = %target.name, id = ?d.id(), "apply complete");
            println!("{}", output::state_table(&d));
        }
        Command::Refresh(target) => {
            let resource = connect(&cli.vault, &target.resource_type)?;
            let prior = load_existing(&store, &target)?;

            match lifecycle::refresh(resource.as_ref(), prior).await? {
                Some(d) => {
                    store.save(&target.resource_type, &target.name, &d)?;
                    println!("{}", output::state_table(&d));
                }
                None => {
                    store.remove(&target.resource_type, &target.name)?;
                    tracing::warn!(name = %target.name, "remote object is gone, state removed");
                }
            }
        }
        Command::Destroy(target) => {
            let resource = connect(&cli.vault, &target.resource_type)?;
            let prior = load_existing(&store, &target)?;

            lifecycle::destroy(resource.as_ref(), &prior).await?;
            store.remove(&target.resource_type, &target.name)?;
            tracing::info!(name = %target.name, "destroy complete");
        }
        Command::Import(args) => {
            let target = args.target;
            let resource = connect(&cli.vault, &target.resource_type)?;

            let d = lifecycle::import(resource.as_ref(), &args.id).await?;
            store.save(&target.resource_type, &target.name, &d)?;
            tracing::info!(name = %target.name, id = ?d.id(), "import complete");
            println!("{}", output::state_table(&d));
        }
    }

    Ok(())
}

fn connect(args: &VaultArgs, resource_type: &str) -> Result<Box<dyn Resource>, TfvrError> {
    let client = VaultClient::new(&args.to_config())?;
    tracing::debug!(api = %client.api_base(), resource_type, "connecting");
    Ok(get_resource(resource_type, Arc::new(client))?)
}

fn load_existing(store: &StateStore, target: &TargetArgs) -> Result<tfvr::ResourceData, TfvrError> {
    store
        .load(&target.resource_type, &target.name)?
        .ok_or_else(|| TfvrError::NoState {
            resource_type: target.resource_type.clone(),
            name: target.name.clone(),
        })
}

fn load_description(path: &Path) -> Result<Map<String, Value>, TfvrError> {
    let raw = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(TfvrError::Description {
            path: path.to_path_buf(),
            message: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(TfvrError::Description {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}
