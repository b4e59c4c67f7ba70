use std::collections::HashMap;
use std::sync::Arc;

use gatehouse_core::{AppError, AppResult};
use gatehouse_domain::{
    AccessRequest, Action, Device, FieldValue, Resource, StateRequest, User,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::authorization_service::AuthorizationGate;
use crate::console_ports::{Draft, Notice, Notifier, UpdateRecord};
use crate::lookup_cache::LookupCache;

/// Labels and role names the directory interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// State label of requests awaiting a decision.
    pub pending_label: String,
    /// State label applied on approval.
    pub approved_label: String,
    /// State label applied on rejection.
    pub rejected_label: String,
    /// Role labels counted as technical.
    pub technical_roles: Vec<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            pending_label: "Pendiente".to_owned(),
            approved_label: "Aprobada".to_owned(),
            rejected_label: "Rechazada".to_owned(),
            technical_roles: ["Desarrollador", "Líder Técnico", "DevOps", "Arquitecto de Software"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Decision taken on a pending access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Grant the request.
    Approve,
    /// Deny the request.
    Reject,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectorySummary {
    /// Users known to the backend.
    pub total_users: usize,
    /// Device requests in the pending state.
    pub pending_device_requests: usize,
    /// Access requests in the pending state.
    pub pending_access_requests: usize,
    /// Users whose role is technical.
    pub technical_role_users: usize,
}

/// Users, devices and access requests with their ownership links resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    /// Users, each carrying their devices and access requests.
    pub users: Vec<User>,
    /// Devices, each carrying its owner.
    pub devices: Vec<Device>,
    /// Access requests, each carrying its owner.
    pub access: Vec<AccessRequest>,
}

impl Directory {
    /// Links records by owner id and fills missing request states from `states`.
    #[must_use]
    pub fn link(
        mut users: Vec<User>,
        mut devices: Vec<Device>,
        mut access: Vec<AccessRequest>,
        states: &[StateRequest],
    ) -> Self {
        let states_by_id: HashMap<&str, &StateRequest> = states
            .iter()
            .filter_map(|state| state.id.as_deref().map(|id| (id, state)))
            .collect();

        for device in &mut devices {
            if device.state_request.is_none() {
                device.state_request = states_by_id
                    .get(device.state_request_id.as_str())
                    .map(|state| (*state).clone());
            }
        }
        for request in &mut access {
            if request.state_request.is_none() {
                request.state_request = states_by_id
                    .get(request.state_request_id.as_str())
                    .map(|state| (*state).clone());
            }
        }

        for user in &mut users {
            let id = user.id.as_deref();
            user.devices = Some(
                devices
                    .iter()
                    .filter(|device| id == Some(device.user_id.as_str()))
                    .cloned()
                    .collect(),
            );
            user.access = Some(
                access
                    .iter()
                    .filter(|request| id == Some(request.user_id.as_str()))
                    .cloned()
                    .collect(),
            );
        }

        let users_by_id: HashMap<&str, &User> = users
            .iter()
            .filter_map(|user| user.id.as_deref().map(|id| (id, user)))
            .collect();
        for device in &mut devices {
            device.user = users_by_id
                .get(device.user_id.as_str())
                .map(|user| Box::new(owner_stub(user)));
        }
        for request in &mut access {
            request.user = users_by_id
                .get(request.user_id.as_str())
                .map(|user| Box::new(owner_stub(user)));
        }

        Self {
            users,
            devices,
            access,
        }
    }

    /// Returns devices whose state carries `label`.
    #[must_use]
    pub fn pending_devices(&self, label: &str) -> Vec<&Device> {
        self.devices
            .iter()
            .filter(|device| state_label(device.state_request.as_ref()) == Some(label))
            .collect()
    }

    /// Returns access requests whose state carries `label`.
    #[must_use]
    pub fn pending_access(&self, label: &str) -> Vec<&AccessRequest> {
        self.access
            .iter()
            .filter(|request| state_label(request.state_request.as_ref()) == Some(label))
            .collect()
    }

    /// Computes dashboard counters.
    #[must_use]
    pub fn summary(&self, config: &DirectoryConfig) -> DirectorySummary {
        DirectorySummary {
            total_users: self.users.len(),
            pending_device_requests: self.pending_devices(&config.pending_label).len(),
            pending_access_requests: self.pending_access(&config.pending_label).len(),
            technical_role_users: self
                .users
                .iter()
                .filter(|user| {
                    user.role_label().is_some_and(|label| {
                        config.technical_roles.iter().any(|role| role == label)
                    })
                })
                .count(),
        }
    }
}

// Owners are embedded without their own request lists to keep links one level deep.
fn owner_stub(user: &User) -> User {
    User {
        devices: None,
        access: None,
        ..user.clone()
    }
}

fn state_label(state: Option<&StateRequest>) -> Option<&str> {
    state.map(|state| state.label.as_str())
}

/// Directory over the backend collections.
pub struct DirectoryService {
    config: DirectoryConfig,
    users: Arc<LookupCache<User>>,
    devices: Arc<LookupCache<Device>>,
    access: Arc<LookupCache<AccessRequest>>,
    states: Arc<LookupCache<StateRequest>>,
    access_updates: Arc<dyn UpdateRecord<AccessRequest>>,
    notifier: Arc<dyn Notifier>,
}

impl DirectoryService {
    /// Creates a directory service.
    #[must_use]
    pub fn new(
        config: DirectoryConfig,
        users: Arc<LookupCache<User>>,
        devices: Arc<LookupCache<Device>>,
        access: Arc<LookupCache<AccessRequest>>,
        states: Arc<LookupCache<StateRequest>>,
        access_updates: Arc<dyn UpdateRecord<AccessRequest>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            users,
            devices,
            access,
            states,
            access_updates,
            notifier,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Loads and links every collection.
    pub async fn load(&self) -> Directory {
        let users = self.users.get().await;
        let devices = self.devices.get().await;
        let access = self.access.get().await;
        let states = self.states.get().await;
        Directory::link(users, devices, access, &states)
    }

    /// Returns devices awaiting a decision.
    pub async fn pending_devices(&self) -> Vec<Device> {
        self.load()
            .await
            .pending_devices(&self.config.pending_label)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Returns access requests awaiting a decision.
    pub async fn pending_access(&self) -> Vec<AccessRequest> {
        self.load()
            .await
            .pending_access(&self.config.pending_label)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Returns dashboard counters.
    pub async fn summary(&self) -> DirectorySummary {
        self.load().await.summary(&self.config)
    }

    /// Approves or rejects one access request.
    pub async fn decide_access(
        &self,
        gate: &AuthorizationGate,
        access_id: &str,
        decision: AccessDecision,
    ) -> AppResult<AccessRequest> {
        let requests = self.access.get().await;
        let Some(original) = requests
            .into_iter()
            .find(|request| request.id.as_deref() == Some(access_id))
        else {
            return Err(self
                .fail(AppError::NotFound(format!("access request '{access_id}' not found")))
                .await);
        };

        if let Err(error) = gate.require_action(
            Resource::Access,
            Action::Approve,
            Some(original.user_id.as_str()),
        ) {
            warn!(access_id, error = %error, "access decision denied");
            return Err(self.fail(error).await);
        }

        let label = match decision {
            AccessDecision::Approve => &self.config.approved_label,
            AccessDecision::Reject => &self.config.rejected_label,
        };
        let Some(state_id) = self
            .states
            .get()
            .await
            .into_iter()
            .find(|state| &state.label == label)
            .and_then(|state| state.id)
        else {
            return Err(self
                .fail(AppError::NotFound(format!("request state '{label}' not found")))
                .await);
        };

        let draft = Draft::from([("state_request_id".to_owned(), FieldValue::from(state_id))]);
        let stored = match self.access_updates.update(&draft, &original).await {
            Ok(stored) => stored,
            Err(error) => {
                warn!(access_id, error = %error, "access decision failed");
                return Err(self.fail(error).await);
            }
        };

        self.access.invalidate().await;
        info!(access_id, state = %label, "access request decided");
        self.notifier
            .notify(Notice::success(format!("access request {}", label.to_lowercase())))
            .await;
        Ok(stored)
    }

    async fn fail(&self, error: AppError) -> AppError {
        self.notifier.notify(Notice::error(error.to_string())).await;
        error
    }
}
