//! Gatehouse console runtime.

#![forbid(unsafe_code)]

mod console_config;
mod console_services;
mod devices_grid;

use chrono::Utc;
use gatehouse_application::RouteState;
use gatehouse_core::AppError;
use gatehouse_domain::{Action, Permission, Resource, Scope};
use tracing::{info, warn};

use crate::console_config::{ConsoleConfig, init_tracing};
use crate::console_services::ConsoleServices;
use crate::devices_grid::{DeviceGridOptions, build_devices_grid, render_grid};

const DEVICES_ROUTE: &str = "/devices";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let services = ConsoleServices::build(&config).await?;
    info!(api_base_url = %config.api_base_url, "gatehouse-console started");

    let now = Utc::now();
    let subject = match &config.session_token {
        Some(token) => services.session.sign_in(token, now).await,
        None => services.session.current(now).await,
    };
    let gate = match subject {
        Ok(subject) => {
            info!(subject = subject.id(), role = subject.role_label(), "session verified");
            Some(services.permissions.gate_for(&subject))
        }
        Err(error) => {
            warn!(error = %error, "no valid session");
            None
        }
    };

    let mut route_guard = services.route_guard;
    let required = [
        Permission::new(Resource::Equipment, Action::View, Scope::Any),
        Permission::new(Resource::Equipment, Action::View, Scope::Own),
    ];
    let outcome = route_guard
        .evaluate(DEVICES_ROUTE, &required, gate.as_ref())
        .await;
    let Some(gate) = gate.filter(|_| outcome.state == RouteState::Authorized) else {
        info!(
            route = DEVICES_ROUTE,
            redirect_to = outcome.redirect_to.as_deref().unwrap_or_default(),
            "route not rendered"
        );
        return Ok(());
    };

    let summary = services.directory.summary().await;
    let summary = serde_json::to_string_pretty(&summary)
        .map_err(|error| AppError::Internal(format!("failed to encode summary: {error}")))?;
    println!("{summary}");

    let directory = services.directory.load().await;
    let devices = gate.filter_by_permission(
        directory.devices,
        Resource::Equipment,
        Action::View,
        |device| Some(device.user_id.as_str()),
    );

    let options = DeviceGridOptions {
        users: services
            .users
            .options(
                |user| user.id.clone().unwrap_or_default(),
                |user| user.name.clone(),
            )
            .await,
        states: services
            .states
            .options(
                |state| state.id.clone().unwrap_or_default(),
                |state| state.label.clone(),
            )
            .await,
        pending_label: config.pending_state_label.clone(),
    };
    let roles = services.roles.get().await;
    let software = services.software.get().await;
    info!(roles = roles.len(), software = software.len(), "catalogs loaded");

    let grid = build_devices_grid(
        devices,
        &gate,
        &services.devices,
        services.notifier.clone(),
        &options,
    )?;
    print!("{}", render_grid(&grid.view()));

    Ok(())
}
