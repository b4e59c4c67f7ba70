use std::path::Path;

use gatehouse_core::{AppError, AppResult};
use gatehouse_domain::PermissionCatalog;
use tracing::info;

const BUILTIN_CATALOG: &str = include_str!("static_permission_catalog/roles.json");

/// Loads the role to permission table once at start-up.
pub struct StaticPermissionCatalog;

impl StaticPermissionCatalog {
    /// Returns the catalog shipped with the console.
    pub fn builtin() -> AppResult<PermissionCatalog> {
        PermissionCatalog::from_json(BUILTIN_CATALOG)
    }

    /// Reads a JSON catalog of `{label, permissions}` entries from `path`.
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<PermissionCatalog> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read permission catalog '{}': {error}",
                path.display()
            ))
        })?;

        let catalog = PermissionCatalog::from_json(&raw)?;
        info!(
            path = %path.display(),
            roles = catalog.entries().len(),
            "permission catalog loaded"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use gatehouse_core::AppError;
    use gatehouse_domain::{Action, Permission, Resource, Scope};

    use super::StaticPermissionCatalog;

    #[test]
    fn builtin_catalog_carries_every_console_role() {
        let catalog = StaticPermissionCatalog::builtin().unwrap_or_else(|_| unreachable!());
        let labels: Vec<&str> = catalog.entries().iter().map(|entry| entry.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Desarrollador",
                "DevOps",
                "Calidad (QA)",
                "Diseñador UX/UI",
                "Administrador",
                "Líder Técnico",
                "Arquitecto de Software",
                "Product Owner",
                "Scrum Master",
            ]
        );
    }

    #[test]
    fn builtin_roles_grant_expected_scopes() {
        let catalog = StaticPermissionCatalog::builtin().unwrap_or_else(|_| unreachable!());

        let developer = catalog.permissions_for_role("Desarrollador");
        assert!(developer.contains(&Permission::new(Resource::Equipment, Action::View, Scope::Own)));
        assert!(!developer.contains(&Permission::new(Resource::Equipment, Action::View, Scope::Any)));

        let admin = catalog.permissions_for_role("Administrador");
        assert!(admin.contains(&Permission::new(Resource::Access, Action::Approve, Scope::Any)));
        assert!(catalog.permissions_for_role("administrador").is_empty());
    }

    #[tokio::test]
    async fn missing_catalog_files_are_internal_errors() {
        let result = StaticPermissionCatalog::from_path("/nonexistent/gatehouse/roles.json").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
