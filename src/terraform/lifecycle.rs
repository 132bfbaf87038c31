//! Drives a [`Resource`] through its operations the way the Terraform host
//! would: validate, check for drift, then create/update/read/delete.

use serde_json::{Map, Value};

use crate::resource::ResourceData;
use crate::resources::{Resource, ResourceError};

/// Converges the remote object on `desired`. When `prior` carries an
/// identity that still exists remotely the object is updated, or replaced
/// (deleted, then created) if a force-new field changed. Otherwise it is
/// created.
pub async fn apply(
    resource: &dyn Resource,
    prior: Option<&ResourceData>,
    desired: Map<String, Value>,
) -> Result<ResourceData, ResourceError> {
    let mut d = ResourceData::from_attributes(desired);
    let schema = resource.schema();
    schema.apply_defaults(&mut d);
    for diagnostic in schema.validate(&d)? {
        tracing::warn!(
            resource_type = resource.type_name(),
            field = diagnostic.field,
            "{}",
            diagnostic.message
        );
    }

    if let Some((prior, id)) = prior.and_then(|p| Some((p, p.id()?))) {
        if !resource.exists(prior).await? {
            tracing::warn!(
                resource_type = resource.type_name(),
                id = %id,
                "remote object is gone, creating it again"
            );
        } else {
            let changed = schema.replacement_fields(prior, &d);
            if changed.is_empty() {
                d.set_id(id);
                tracing::info!(resource_type = resource.type_name(), id = %id, "updating");
                resource.update(&mut d).await?;
                return Ok(d);
            }
            tracing::info!(
                resource_type = resource.type_name(),
                id = %id,
                fields = ?changed,
                "replacing"
            );
            resource.delete(prior).await?;
        }
    }

    tracing::info!(resource_type = resource.type_name(), "creating");
    resource.create(&mut d).await?;
    Ok(d)
}

/// Re-reads the remote object. `None` means it no longer exists and the
/// local state should be dropped.
pub async fn refresh(
    resource: &dyn Resource,
    mut d: ResourceData,
) -> Result<Option<ResourceData>, ResourceError> {
    match resource.read(&mut d).await {
        Ok(()) if d.id().is_some() => Ok(Some(d)),
        Ok(()) => Ok(None),
        Err(ResourceError::NotFound(reason)) if d.id().is_none() => {
            tracing::warn!(resource_type = resource.type_name(), %reason, "dropping state");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Deletes the remote object if it is still there.
pub async fn destroy(resource: &dyn Resource, d: &ResourceData) -> Result<(), ResourceError> {
    if d.id().is_none() || !resource.exists(d).await? {
        tracing::info!(resource_type = resource.type_name(), "already absent");
        return Ok(());
    }
    resource.delete(d).await
}

/// Adopts an existing remote object into local state.
pub async fn import(resource: &dyn Resource, id: &str) -> Result<ResourceData, ResourceError> {
    let mut d = resource.import(id).await?;
    resource.read(&mut d).await?;
    if d.id().is_none() {
        return Err(ResourceError::NotFound(format!(
            "cannot import non-existent remote object {:?}",
            id
        )));
    }
    Ok(d)
}
