use std::fmt::Write as _;
use std::sync::Arc;

use gatehouse_application::{AuthorizationGate, GridEngine, GridView, Notifier, RestResource, RowAction};
use gatehouse_core::AppResult;
use gatehouse_domain::{
    Action, ColumnDescriptor, Device, FieldOption, FieldValue, InputKind, Permission, Resource,
    Scope, SortDirection,
};

const OPERATING_SYSTEMS: [&str; 3] = ["Windows", "Linux", "macOS"];

pub struct DeviceGridOptions {
    pub users: Vec<FieldOption>,
    pub states: Vec<FieldOption>,
    pub pending_label: String,
}

fn text(value: Option<&String>) -> FieldValue {
    FieldValue::from(value.cloned().unwrap_or_default())
}

fn device_columns(options: &DeviceGridOptions) -> Vec<ColumnDescriptor<Device>> {
    let operating_systems = OPERATING_SYSTEMS
        .into_iter()
        .map(|name| FieldOption::new(name, name))
        .collect();

    vec![
        ColumnDescriptor::<Device>::field("Serial", "serial_number")
            .with_extractor(|device| text(device.serial_number.as_ref())),
        ColumnDescriptor::<Device>::field("Modelo", "model")
            .with_extractor(|device| text(device.model.as_ref())),
        ColumnDescriptor::<Device>::field("Sistema operativo", "system_operating")
            .with_input_kind(InputKind::Select)
            .with_options(operating_systems)
            .with_extractor(|device| text(device.system_operating.as_ref())),
        ColumnDescriptor::<Device>::field("Usuario", "user.name")
            .with_key("user_id")
            .with_input_kind(InputKind::Select)
            .with_options(options.users.clone())
            .with_extractor(|device| FieldValue::from(device.user_id.clone()))
            .with_editable(false),
        ColumnDescriptor::<Device>::field("Estado", "state_request.label")
            .with_key("state_request_id")
            .with_input_kind(InputKind::Select)
            .with_options(options.states.clone())
            .with_extractor(|device| FieldValue::from(device.state_request_id.clone())),
    ]
}

pub fn build_devices_grid(
    devices: Vec<Device>,
    gate: &AuthorizationGate,
    resource: &RestResource<Device>,
    notifier: Arc<dyn Notifier>,
    options: &DeviceGridOptions,
) -> AppResult<GridEngine<Device>> {
    let mut grid = GridEngine::new(device_columns(options), devices, "model")?
        .with_filter_bar()
        .with_notifier(notifier);

    if gate.can_perform_action(Resource::Equipment, Action::Create, gate.actor_id()) {
        grid = grid.with_create(Arc::new(resource.clone()));
    }

    let may_update = gate.has_any(&[
        Permission::new(Resource::Equipment, Action::Update, Scope::Any),
        Permission::new(Resource::Equipment, Action::Update, Scope::Own),
    ]);
    if may_update {
        let editor = gate.clone();
        grid = grid
            .with_update(Arc::new(resource.clone()))
            .with_can_edit_row(move |device| {
                editor.can_perform_action(
                    Resource::Equipment,
                    Action::Update,
                    Some(device.user_id.as_str()),
                )
            });
    }

    let approver = gate.clone();
    let pending_label = options.pending_label.clone();
    grid = grid.with_row_actions(move |device| {
        let pending = device
            .state_request
            .as_ref()
            .is_some_and(|state| state.label == pending_label);
        let allowed = approver.can_perform_action(
            Resource::Equipment,
            Action::Approve,
            Some(device.user_id.as_str()),
        );
        if pending && allowed {
            vec![
                RowAction::custom("approve", "Aprobar"),
                RowAction::custom("reject", "Rechazar"),
            ]
        } else {
            Vec::new()
        }
    });

    Ok(grid)
}

pub fn render_grid(view: &GridView) -> String {
    let mut output = String::new();

    if let Some(bar) = &view.filter_bar {
        let _ = writeln!(
            output,
            "sort: {} ({}) filter: '{}'",
            bar.sort_by,
            bar.order.as_str(),
            bar.filter_text
        );
    }
    if view.show_add_new {
        output.push_str("[+ nuevo]\n");
    }

    let headers: Vec<String> = view
        .headers
        .iter()
        .map(|header| match header.direction {
            Some(SortDirection::Asc) => format!("{} ^", header.label),
            Some(SortDirection::Desc) => format!("{} v", header.label),
            Some(SortDirection::None) | None => header.label.clone(),
        })
        .collect();
    let _ = writeln!(output, "{}", headers.join(" | "));

    for row in &view.rows {
        let actions: Vec<&str> = row
            .actions
            .iter()
            .map(|action| match action {
                RowAction::Edit => "Editar",
                RowAction::Custom { label, .. } => label.as_str(),
            })
            .collect();

        let _ = write!(output, "{}", row.cells.join(" | "));
        if !actions.is_empty() {
            let _ = write!(output, " [{}]", actions.join(", "));
        }
        output.push('\n');
    }

    output
}
