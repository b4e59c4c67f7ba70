use gatehouse_core::{AppError, AppResult, Subject};
use gatehouse_domain::{Action, Permission, PermissionCatalog, PermissionSet, Resource, Scope};

mod route_guard;

pub use route_guard::{
    PERMISSION_DENIED_NOTICE_ID, RouteGuard, RouteGuardConfig, RouteOutcome, RouteState,
};

/// Role-label to permission resolution.
#[derive(Debug, Clone, Default)]
pub struct PermissionModel {
    catalog: PermissionCatalog,
}

impl PermissionModel {
    /// Creates a model over a loaded catalog.
    #[must_use]
    pub fn new(catalog: PermissionCatalog) -> Self {
        Self { catalog }
    }

    /// Returns the backing catalog.
    #[must_use]
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// Returns permissions for `role_label`; unknown roles get an empty set.
    #[must_use]
    pub fn permissions_for_role(&self, role_label: &str) -> PermissionSet {
        self.catalog.permissions_for_role(role_label)
    }

    /// Returns whether `granted` holds any of `required`.
    ///
    /// An empty grant set allows everything.
    #[must_use]
    pub fn has_any(required: &[Permission], granted: &PermissionSet) -> bool {
        granted.is_empty() || required.iter().any(|permission| granted.contains(permission))
    }

    /// Builds the gate for a signed-in actor.
    #[must_use]
    pub fn gate_for(&self, subject: &Subject) -> AuthorizationGate {
        AuthorizationGate::new(
            self.permissions_for_role(subject.role_label()),
            Some(subject.id().to_owned()),
        )
    }
}

/// Scope-aware authorization checks for one actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationGate {
    granted: PermissionSet,
    actor_id: Option<String>,
}

impl AuthorizationGate {
    /// Creates a gate from resolved grants and the actor id.
    #[must_use]
    pub fn new(granted: PermissionSet, actor_id: Option<String>) -> Self {
        Self { granted, actor_id }
    }

    /// Returns the resolved grants.
    #[must_use]
    pub fn granted(&self) -> &PermissionSet {
        &self.granted
    }

    /// Returns the actor id used for `self` checks.
    #[must_use]
    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    /// Returns whether the actor holds any of `required`.
    #[must_use]
    pub fn has_any(&self, required: &[Permission]) -> bool {
        PermissionModel::has_any(required, &self.granted)
    }

    /// Returns whether the actor may perform `action` on a record owned by
    /// `record_owner`.
    #[must_use]
    pub fn can_perform_action(
        &self,
        resource: Resource,
        action: Action,
        record_owner: Option<&str>,
    ) -> bool {
        if self.holds(resource, action, Scope::Any) {
            return true;
        }

        self.holds(resource, action, Scope::Own) && self.owns(record_owner)
    }

    /// Like [`Self::can_perform_action`], failing with `Forbidden`.
    pub fn require_action(
        &self,
        resource: Resource,
        action: Action,
        record_owner: Option<&str>,
    ) -> AppResult<()> {
        if self.can_perform_action(resource, action, record_owner) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "actor is missing permission '{}:{}'",
            resource.as_str(),
            action.as_str()
        )))
    }

    /// Keeps the records the actor may `action`.
    ///
    /// `any` keeps everything, `self` keeps the actor's own records, and
    /// anything else keeps nothing.
    #[must_use]
    pub fn filter_by_permission<T, F>(
        &self,
        records: Vec<T>,
        resource: Resource,
        action: Action,
        owner_of: F,
    ) -> Vec<T>
    where
        F: Fn(&T) -> Option<&str>,
    {
        if self.holds(resource, action, Scope::Any) {
            return records;
        }

        if !self.holds(resource, action, Scope::Own) {
            return Vec::new();
        }

        records
            .into_iter()
            .filter(|record| self.owns(owner_of(record)))
            .collect()
    }

    fn holds(&self, resource: Resource, action: Action, scope: Scope) -> bool {
        self.has_any(&[Permission::new(resource, action, scope)])
    }

    fn owns(&self, record_owner: Option<&str>) -> bool {
        matches!(
            (self.actor_id.as_deref(), record_owner),
            (Some(actor), Some(owner)) if actor == owner
        )
    }
}

#[cfg(test)]
mod tests;
