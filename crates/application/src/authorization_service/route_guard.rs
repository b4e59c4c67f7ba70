use std::sync::Arc;

use gatehouse_domain::Permission;
use tracing::{debug, warn};

use crate::console_ports::{Notice, Notifier};

use super::AuthorizationGate;

/// Stable notice id for route denials.
pub const PERMISSION_DENIED_NOTICE_ID: &str = "permission-denied";

/// Redirect targets of the route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuardConfig {
    /// Unauthenticated entry page.
    pub entry_path: String,
    /// Default authenticated landing page.
    pub landing_path: String,
    /// Prefix of per-user detail routes an actor may always view for itself.
    pub own_detail_prefix: String,
}

impl Default for RouteGuardConfig {
    fn default() -> Self {
        Self {
            entry_path: "/".to_owned(),
            landing_path: "/dashboard".to_owned(),
            own_detail_prefix: "/user/".to_owned(),
        }
    }
}

/// Route guard states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    /// No session.
    Unauthenticated,
    /// Session present and requirement met.
    Authorized,
    /// Session present but requirement unmet.
    Unauthorized,
}

/// Result of evaluating one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    /// Resulting state.
    pub state: RouteState,
    /// Redirect target; `None` renders the route.
    pub redirect_to: Option<String>,
}

/// Navigation guard that notifies once per denied route.
pub struct RouteGuard {
    config: RouteGuardConfig,
    notifier: Arc<dyn Notifier>,
    denied_route: Option<String>,
}

impl RouteGuard {
    /// Creates a guard.
    #[must_use]
    pub fn new(config: RouteGuardConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            notifier,
            denied_route: None,
        }
    }

    /// Returns the redirect configuration.
    #[must_use]
    pub fn config(&self) -> &RouteGuardConfig {
        &self.config
    }

    /// Evaluates navigation to `route`.
    ///
    /// `gate` is `None` when no session exists. An empty `required` list is
    /// always satisfied.
    pub async fn evaluate(
        &mut self,
        route: &str,
        required: &[Permission],
        gate: Option<&AuthorizationGate>,
    ) -> RouteOutcome {
        let Some(gate) = gate else {
            self.denied_route = None;
            debug!(route, "route requires a session");
            return RouteOutcome {
                state: RouteState::Unauthenticated,
                redirect_to: Some(self.config.entry_path.clone()),
            };
        };

        if required.is_empty() || self.is_own_detail(route, gate) || gate.has_any(required) {
            self.denied_route = None;
            return RouteOutcome {
                state: RouteState::Authorized,
                redirect_to: None,
            };
        }

        if self.denied_route.as_deref() != Some(route) {
            warn!(route, "route denied for current actor");
            self.notifier
                .notify(
                    Notice::error("you do not have permission to access this page")
                        .with_id(PERMISSION_DENIED_NOTICE_ID),
                )
                .await;
            self.denied_route = Some(route.to_owned());
        }

        RouteOutcome {
            state: RouteState::Unauthorized,
            redirect_to: Some(self.config.landing_path.clone()),
        }
    }

    fn is_own_detail(&self, route: &str, gate: &AuthorizationGate) -> bool {
        let Some(actor_id) = gate.actor_id() else {
            return false;
        };

        route
            .strip_prefix(self.config.own_detail_prefix.as_str())
            .is_some_and(|user_id| user_id == actor_id)
    }
}
