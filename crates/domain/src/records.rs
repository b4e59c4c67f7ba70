use serde::{Deserialize, Serialize};

/// Record that can be addressed and attributed to an owning user.
pub trait ConsoleRecord {
    /// Returns the backend id, when persisted.
    fn record_id(&self) -> Option<&str>;

    /// Returns the id of the user who owns the record.
    fn owner_id(&self) -> Option<&str>;
}

/// Role catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Human-readable role label.
    pub label: String,
    /// Backend id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Request state catalog entry such as `Pendiente` or `Aprobada`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRequest {
    /// Human-readable state label.
    pub label: String,
    /// Backend id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Console user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Business area.
    pub area: String,
    /// Team name.
    pub team: String,
    /// Role id.
    pub role_id: String,
    /// Whether the account is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Last login timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Embedded role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Devices owned by the user, once linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<Device>>,
    /// Access requests owned by the user, once linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Vec<AccessRequest>>,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Returns the embedded role label, if any.
    #[must_use]
    pub fn role_label(&self) -> Option<&str> {
        self.role.as_ref().map(|role| role.label.as_str())
    }
}

/// Device request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Backend id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Hardware model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Operating system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_operating: Option<String>,
    /// Owning user id.
    pub user_id: String,
    /// Request state id.
    pub state_request_id: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Owning user, once linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,
    /// Embedded request state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_request: Option<StateRequest>,
}

/// Software access request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Backend id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning user id.
    pub user_id: String,
    /// Requested software id.
    pub software_id: String,
    /// Request state id.
    pub state_request_id: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Owning user, once linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,
    /// Embedded software.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software: Option<Software>,
    /// Embedded request state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_request: Option<StateRequest>,
}

/// Software catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    /// Backend id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Software name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Landing URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Whether the software can be requested.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Role ids allowed to request access.
    #[serde(default)]
    pub roles_required: Vec<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ConsoleRecord for User {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn owner_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl ConsoleRecord for Device {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn owner_id(&self) -> Option<&str> {
        Some(self.user_id.as_str())
    }
}

impl ConsoleRecord for AccessRequest {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn owner_id(&self) -> Option<&str> {
        Some(self.user_id.as_str())
    }
}

impl ConsoleRecord for Software {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn owner_id(&self) -> Option<&str> {
        None
    }
}

impl ConsoleRecord for Role {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn owner_id(&self) -> Option<&str> {
        None
    }
}

impl ConsoleRecord for StateRequest {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn owner_id(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{ConsoleRecord, Device, User};

    #[test]
    fn device_wire_shape_accepts_missing_optionals() {
        let raw = r#"{"user_id": "u1", "state_request_id": "s1", "system_operating": "Linux"}"#;
        let device: Device = serde_json::from_str(raw).unwrap_or_else(|_| unreachable!());

        assert_eq!(device.owner_id(), Some("u1"));
        assert_eq!(device.record_id(), None);
        assert_eq!(device.system_operating.as_deref(), Some("Linux"));
    }

    #[test]
    fn user_owns_itself_and_defaults_to_active() {
        let raw = r#"{
            "id": "u7", "name": "Amy", "email": "amy@example.com",
            "area": "IT", "team": "Core", "role_id": "r1",
            "role": {"label": "DevOps", "id": "r1"}
        }"#;
        let user: User = serde_json::from_str(raw).unwrap_or_else(|_| unreachable!());

        assert!(user.is_active);
        assert_eq!(user.owner_id(), Some("u7"));
        assert_eq!(user.role_label(), Some("DevOps"));
    }

    #[test]
    fn unlinked_relations_are_not_serialized() {
        let raw = r#"{"user_id": "u1", "state_request_id": "s1"}"#;
        let device: Device = serde_json::from_str(raw).unwrap_or_else(|_| unreachable!());
        let value = serde_json::to_value(&device).unwrap_or_else(|_| unreachable!());

        assert!(value.get("user").is_none());
        assert!(value.get("created_at").is_none());
    }
}
