use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use gatehouse_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Resources guarded by permission checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Console users.
    User,
    /// Devices and device requests.
    Equipment,
    /// Software access requests.
    Access,
    /// Software catalog.
    Software,
}

impl Resource {
    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Equipment => "equipment",
            Self::Access => "access",
            Self::Software => "software",
        }
    }
}

impl FromStr for Resource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "equipment" => Ok(Self::Equipment),
            "access" => Ok(Self::Access),
            "software" => Ok(Self::Software),
            _ => Err(AppError::Validation(format!("unknown resource '{value}'"))),
        }
    }
}

/// Actions a permission may grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create records.
    Create,
    /// Read records.
    View,
    /// Modify records.
    Update,
    /// Remove records.
    Delete,
    /// Approve or reject requests.
    Approve,
}

impl Action {
    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::View => "view",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Approve => "approve",
        }
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(Self::Create),
            "view" => Ok(Self::View),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "approve" => Ok(Self::Approve),
            _ => Err(AppError::Validation(format!("unknown action '{value}'"))),
        }
    }
}

/// Record scope a permission covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scope {
    /// Every record.
    #[serde(rename = "any")]
    Any,
    /// Only records owned by the actor.
    #[serde(rename = "self")]
    Own,
}

impl Scope {
    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Own => "self",
        }
    }
}

impl FromStr for Scope {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "any" => Ok(Self::Any),
            "self" => Ok(Self::Own),
            _ => Err(AppError::Validation(format!("unknown scope '{value}'"))),
        }
    }
}

/// One `resource:action:scope` grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    resource: Resource,
    action: Action,
    scope: Scope,
}

impl Permission {
    /// Creates a permission from its parts.
    #[must_use]
    pub fn new(resource: Resource, action: Action, scope: Scope) -> Self {
        Self {
            resource,
            action,
            scope,
        }
    }

    /// Returns the guarded resource.
    #[must_use]
    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Returns the granted action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the covered scope.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}:{}",
            self.resource.as_str(),
            self.action.as_str(),
            self.scope.as_str()
        )
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut segments = value.split(':');
        match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(resource), Some(action), Some(scope), None) => Ok(Self::new(
                resource.parse()?,
                action.parse()?,
                scope.parse()?,
            )),
            _ => Err(AppError::Validation(format!(
                "permission '{value}' must have the form resource:action:scope"
            ))),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.to_string()
    }
}

/// Set of permissions granted to an actor.
pub type PermissionSet = BTreeSet<Permission>;

/// Permissions granted to one role label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    label: NonEmptyString,
    permissions: PermissionSet,
}

impl PermissionEntry {
    /// Creates a role entry from wire permission strings.
    pub fn new<I, S>(label: impl Into<String>, permissions: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let permissions = permissions
            .into_iter()
            .map(|value| Permission::from_str(value.as_ref()))
            .collect::<AppResult<PermissionSet>>()?;

        Ok(Self {
            label: NonEmptyString::new(label)?,
            permissions,
        })
    }

    /// Returns the role label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the granted permissions.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}

/// Role-to-permission catalog with unique labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionCatalog {
    entries: Vec<PermissionEntry>,
}

impl PermissionCatalog {
    /// Creates a catalog, rejecting duplicate role labels.
    pub fn new(entries: Vec<PermissionEntry>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.label()) {
                return Err(AppError::Validation(format!(
                    "duplicate role label '{}' in permission catalog",
                    entry.label()
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Parses a catalog from its JSON wire form.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let entries: Vec<PermissionEntry> = serde_json::from_str(raw).map_err(|error| {
            AppError::Validation(format!("invalid permission catalog: {error}"))
        })?;

        Self::new(entries)
    }

    /// Returns permissions for a role label; unknown labels get an empty set.
    #[must_use]
    pub fn permissions_for_role(&self, label: &str) -> PermissionSet {
        self.entries
            .iter()
            .find(|entry| entry.label() == label)
            .map(|entry| entry.permissions().clone())
            .unwrap_or_default()
    }

    /// Returns catalog entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[PermissionEntry] {
        &self.entries
    }
}
