use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::resource::ResourceData;
use crate::resources::ResourceError;

const ROLE_SEPARATOR: &str = "/role/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid role ID {id:?}: expected <backend>/role/<name>")]
pub struct InvalidRolePath {
    pub id: String,
}

/// Remote location of a role: `{backend}/role/{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePath {
    backend: String,
    name: String,
}

impl RolePath {
    pub fn new(backend: &str, name: &str) -> Self {
        Self {
            backend: backend.trim_matches('/').to_string(),
            name: name.to_string(),
        }
    }

    /// Splits at the right-most `/role/` that leaves a non-empty backend and
    /// a non-empty name.
    pub fn parse(id: &str) -> Result<Self, InvalidRolePath> {
        (0..id.len())
            .rev()
            .filter(|&at| id.is_char_boundary(at) && id[at..].starts_with(ROLE_SEPARATOR))
            .find_map(|at| {
                let backend = &id[..at];
                let name = &id[at + ROLE_SEPARATOR.len()..];
                (!backend.is_empty() && !name.is_empty()).then(|| Self {
                    backend: backend.to_string(),
                    name: name.to_string(),
                })
            })
            .ok_or_else(|| InvalidRolePath { id: id.to_string() })
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RolePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.backend, ROLE_SEPARATOR, self.name)
    }
}

impl FromStr for RolePath {
    type Err = InvalidRolePath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Which attribute names the backend mount. `path` is the deprecated
/// spelling of `backend`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSelection {
    Backend(String),
    DeprecatedPath(String),
}

impl BackendSelection {
    pub fn resolve(d: &ResourceData, role: &str) -> Result<Self, ResourceError> {
        match (d.get_str("backend"), d.get_str("path")) {
            (Some(_), Some(_)) => Err(ResourceError::Configuration(format!(
                "\"backend\" and \"path\" are both set for Terraform Cloud secret backend role {}",
                role
            ))),
            (Some(backend), None) => Ok(Self::Backend(backend.to_string())),
            (None, Some(path)) => {
                tracing::warn!(role = %role, "\"path\" is deprecated, use \"backend\" instead");
                Ok(Self::DeprecatedPath(path.to_string()))
            }
            (None, None) => Err(ResourceError::Configuration(format!(
                "No backend specified for Terraform Cloud secret backend role {}",
                role
            ))),
        }
    }

    pub fn mount(&self) -> &str {
        match self {
            Self::Backend(mount) | Self::DeprecatedPath(mount) => mount,
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::Backend(_) => "backend",
            Self::DeprecatedPath(_) => "path",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_trims_backend_slashes() {
        assert_eq!(RolePath::new("tfc/", "admin").to_string(), "tfc/role/admin");
        assert_eq!(RolePath::new("/tfc/", "admin").to_string(), "tfc/role/admin");
        assert_eq!(
            RolePath::new("nested/tfc", "admin").to_string(),
            "nested/tfc/role/admin"
        );
    }

    #[test]
    fn test_parse_simple() {
        let path = RolePath::parse("tfc/role/admin").unwrap();
        assert_eq!(path.backend(), "tfc");
        assert_eq!(path.name(), "admin");
    }

    #[test]
    fn test_round_trip() {
        let pairs = [
            ("tfc", "admin"),
            ("tfc/", "admin"),
            ("teams/terraform", "deploy-bot"),
            ("terraform", "role"),
            ("tfc", "name.with.dots"),
        ];
        for (backend, name) in pairs {
            let rendered = RolePath::new(backend, name).to_string();
            let parsed: RolePath = rendered.parse().unwrap();
            assert_eq!(parsed.backend(), backend.trim_matches('/'));
            assert_eq!(parsed.name(), name);
        }
    }

    #[test]
    fn test_parse_uses_right_most_separator() {
        let path = RolePath::parse("a/role/b/role/c").unwrap();
        assert_eq!(path.backend(), "a/role/b");
        assert_eq!(path.name(), "c");
    }

    #[test]
    fn test_parse_overlapping_separators() {
        let path = RolePath::parse("a/role/role/x").unwrap();
        assert_eq!(path.backend(), "a/role");
        assert_eq!(path.name(), "x");
    }

    #[test]
    fn test_parse_falls_back_when_trailing_name_empty() {
        let path = RolePath::parse("a/role/b/role/").unwrap();
        assert_eq!(path.backend(), "a");
        assert_eq!(path.name(), "b/role/");
    }

    #[test]
    fn test_parse_rejects_corrupt_ids() {
        for id in ["", "tfc", "tfc/admin", "/role/admin", "tfc/role/", "role/admin"] {
            let err = RolePath::parse(id).unwrap_err();
            assert_eq!(err.id, id);
        }
    }

    #[test]
    fn test_invalid_role_path_display() {
        let err = RolePath::parse("garbage").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid role ID \"garbage\": expected <backend>/role/<name>"
        );
    }

    fn data(value: serde_json::Value) -> ResourceData {
        ResourceData::from_attributes(value.as_object().cloned().unwrap())
    }

    #[test]
    fn test_backend_selection_prefers_backend() {
        let sel = BackendSelection::resolve(&data(json!({"backend": "tfc"})), "admin").unwrap();
        assert_eq!(sel, BackendSelection::Backend("tfc".to_string()));
        assert_eq!(sel.mount(), "tfc");
        assert_eq!(sel.field(), "backend");
    }

    #[test]
    fn test_backend_selection_deprecated_path() {
        let sel = BackendSelection::resolve(&data(json!({"path": "tfc"})), "admin").unwrap();
        assert_eq!(sel, BackendSelection::DeprecatedPath("tfc".to_string()));
        assert_eq!(sel.field(), "path");
    }

    #[test]
    fn test_backend_selection_both_set() {
        let err = BackendSelection::resolve(
            &data(json!({"backend": "tfc", "path": "tfc"})),
            "admin",
        )
        .unwrap_err();
        assert!(matches!(err, ResourceError::Configuration(_)));
    }

    #[test]
    fn test_backend_selection_neither_set_names_role() {
        let err = BackendSelection::resolve(&data(json!({"name": "admin"})), "admin").unwrap_err();
        assert!(matches!(err, ResourceError::Configuration(_)));
        assert!(
            err.to_string()
                .contains("No backend specified for Terraform Cloud secret backend role admin")
        );
    }
}
