use std::sync::Arc;

use async_trait::async_trait;
use gatehouse_core::{AppError, AppResult};
use gatehouse_domain::{ColumnDescriptor, FieldOption, FieldValue, InputKind, SortDirection};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::console_ports::{CreateRecord, Draft, Notice, Notifier, UpdateRecord};

use super::{DraftMode, DraftState, FilterChange, GridEngine, RowAction};

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Device {
    id: String,
    owner: String,
    model: String,
    tags: Vec<String>,
}

fn device(id: &str, owner: &str, model: &str) -> Device {
    Device {
        id: id.to_owned(),
        owner: owner.to_owned(),
        model: model.to_owned(),
        tags: Vec::new(),
    }
}

fn columns() -> Vec<ColumnDescriptor<Device>> {
    vec![
        ColumnDescriptor::field("Model", "model")
            .with_extractor(|device: &Device| FieldValue::from(device.model.as_str())),
        ColumnDescriptor::field("Tags", "tags")
            .with_input_kind(InputKind::MultiSelect)
            .with_options(vec![FieldOption::new("laptop", "Laptop")])
            .with_extractor(|device: &Device| FieldValue::List(device.tags.clone())),
        ColumnDescriptor::field("Owner", "owner")
            .with_key("owner")
            .with_included_on_create(false),
        ColumnDescriptor::computed("Label", |device: &Device| {
            format!("{} ({})", device.model, device.id)
        }),
    ]
}

fn records() -> Vec<Device> {
    vec![
        device("d1", "u1", "ThinkPad"),
        device("d2", "u2", "MacBook"),
        device("d3", "u1", "Dell"),
    ]
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: Notice) {
        self.notices.lock().await.push(notice);
    }
}

#[derive(Default)]
struct FakeDeviceStore {
    fail: bool,
    created: Mutex<Vec<Draft>>,
    updated: Mutex<Vec<(Draft, Device)>>,
}

#[async_trait]
impl CreateRecord<Device> for FakeDeviceStore {
    async fn create(&self, draft: &Draft) -> AppResult<Device> {
        if self.fail {
            return Err(AppError::RemoteOperationFailed(
                "POST devices/ returned 500".to_owned(),
            ));
        }

        self.created.lock().await.push(draft.clone());
        let model = draft
            .get("model")
            .and_then(FieldValue::as_text)
            .unwrap_or_default();
        Ok(device("d9", "u1", model))
    }
}

#[async_trait]
impl UpdateRecord<Device> for FakeDeviceStore {
    async fn update(&self, draft: &Draft, original: &Device) -> AppResult<Device> {
        if self.fail {
            return Err(AppError::RemoteOperationFailed(
                "PUT devices/d1 returned 500".to_owned(),
            ));
        }

        self.updated
            .lock()
            .await
            .push((draft.clone(), original.clone()));
        let mut stored = original.clone();
        if let Some(model) = draft.get("model").and_then(FieldValue::as_text) {
            stored.model = model.to_owned();
        }
        Ok(stored)
    }
}

fn grid(store: Arc<FakeDeviceStore>) -> GridEngine<Device> {
    GridEngine::new(columns(), records(), "model")
        .unwrap_or_else(|_| unreachable!())
        .with_filter_bar()
        .with_create(store.clone())
        .with_update(store)
}

fn models(grid: &GridEngine<Device>) -> Vec<String> {
    grid.view()
        .rows
        .into_iter()
        .filter_map(|row| row.cells.first().cloned())
        .collect()
}

#[test]
fn editable_column_without_extractor_is_rejected() {
    let columns = vec![ColumnDescriptor::<Device>::field("Model", "model").with_editable(true)];
    assert!(GridEngine::new(columns, records(), "model").is_err());
}

#[test]
fn header_clicks_cycle_and_reset_on_other_columns() {
    let mut grid = grid(Arc::new(FakeDeviceStore::default()));
    assert_eq!(models(&grid), vec!["Dell", "MacBook", "ThinkPad"]);

    assert!(grid.click_header(0).is_ok());
    assert_eq!(grid.sort().direction(), SortDirection::Desc);
    assert_eq!(models(&grid), vec!["ThinkPad", "MacBook", "Dell"]);

    assert!(grid.click_header(0).is_ok());
    assert_eq!(grid.sort().direction(), SortDirection::None);
    assert_eq!(models(&grid), vec!["ThinkPad", "MacBook", "Dell"]);

    assert!(grid.click_header(0).is_ok());
    assert_eq!(grid.sort().direction(), SortDirection::Asc);

    assert!(grid.click_header(0).is_ok());
    assert!(grid.click_header(2).is_ok());
    assert_eq!(grid.sort().path(), "owner");
    assert_eq!(grid.sort().direction(), SortDirection::Asc);
}

#[test]
fn computed_headers_ignore_clicks() {
    let mut grid = grid(Arc::new(FakeDeviceStore::default()));
    assert!(grid.click_header(3).is_ok());
    assert_eq!(grid.sort().path(), "model");
    assert_eq!(grid.sort().direction(), SortDirection::Asc);

    let headers = grid.view().headers;
    assert!(!headers[3].sortable);
    assert_eq!(headers[0].direction, Some(SortDirection::Asc));
    assert!(grid.click_header(9).is_err());
}

#[test]
fn filter_bar_changes_apply_to_the_view() {
    let mut grid = grid(Arc::new(FakeDeviceStore::default()));
    let change = FilterChange::parse("filterText", "book").unwrap_or_else(|_| unreachable!());
    assert!(grid.apply_filter_change(change).is_ok());
    assert_eq!(models(&grid), vec!["MacBook"]);

    let change = FilterChange::parse("sortBy", "owner").unwrap_or_else(|_| unreachable!());
    assert!(grid.apply_filter_change(change).is_ok());
    assert_eq!(models(&grid), Vec::<String>::new());

    assert!(FilterChange::parse("order", "none").is_err());
    assert!(FilterChange::parse("pageSize", "10").is_err());

    let bar = grid.view().filter_bar.unwrap_or_else(|| unreachable!());
    assert_eq!(bar.sort_by, "owner");
    assert_eq!(bar.sort_options.len(), 3);
}

#[test]
fn create_draft_seeds_empty_values_per_keyed_column() {
    let mut grid = grid(Arc::new(FakeDeviceStore::default()));
    assert!(grid.view().show_add_new);
    assert!(grid.begin_create().is_ok());

    let draft = grid.draft_state().draft().cloned().unwrap_or_default();
    let json = serde_json::to_value(&draft).unwrap_or_else(|_| unreachable!());
    assert_eq!(
        json,
        serde_json::json!({"model": "", "tags": [], "owner": ""})
    );

    let view = grid.view();
    assert!(!view.show_add_new);
    let editor = view.draft_editor.unwrap_or_else(|| unreachable!());
    assert_eq!(editor.mode, DraftMode::Create);
    let owner = editor.inputs.iter().find(|input| input.key == "owner");
    assert_eq!(owner.map(|input| input.enabled), Some(false));
}

#[test]
fn display_only_columns_stay_out_of_create_drafts() {
    let columns = vec![
        ColumnDescriptor::field("Model", "model")
            .with_extractor(|device: &Device| FieldValue::from(device.model.as_str())),
        ColumnDescriptor::field("Owner name", "owner_profile.name"),
    ];
    let mut grid = GridEngine::new(columns, records(), "model")
        .unwrap_or_else(|_| unreachable!())
        .with_create(Arc::new(FakeDeviceStore::default()));
    assert!(grid.begin_create().is_ok());

    let draft = grid.draft_state().draft().cloned().unwrap_or_default();
    let json = serde_json::to_value(&draft).unwrap_or_else(|_| unreachable!());
    assert_eq!(json, serde_json::json!({"model": ""}));
    assert!(grid.view().headers[1].sortable);
}

#[test]
fn second_create_while_open_is_a_conflict() {
    let mut grid = grid(Arc::new(FakeDeviceStore::default()));
    assert!(grid.begin_create().is_ok());
    assert!(matches!(grid.begin_create(), Err(AppError::Conflict(_))));
}

#[test]
fn disabled_and_unknown_inputs_reject_values() {
    let mut grid = grid(Arc::new(FakeDeviceStore::default()));
    assert!(matches!(
        grid.set_draft_value("model", FieldValue::from("X")),
        Err(AppError::Conflict(_))
    ));

    assert!(grid.begin_create().is_ok());
    assert!(grid.set_draft_value("owner", FieldValue::from("u2")).is_err());
    assert!(grid.set_draft_value("serial", FieldValue::from("1")).is_err());
    assert!(grid.set_draft_value("model", FieldValue::from("X1")).is_ok());
}

#[test]
fn edit_seeds_from_extractors_and_respects_can_edit_row() {
    let mut grid = grid(Arc::new(FakeDeviceStore::default()))
        .with_can_edit_row(|device: &Device| device.owner == "u1");

    assert!(matches!(grid.begin_edit(1), Err(AppError::Forbidden(_))));
    assert!(grid.begin_edit(0).is_ok());

    let draft = grid.draft_state().draft().cloned().unwrap_or_default();
    assert_eq!(draft.get("model"), Some(&FieldValue::from("ThinkPad")));
    assert_eq!(draft.get("tags"), Some(&FieldValue::List(Vec::new())));
    assert!(!draft.contains_key("owner"));
    assert!(grid.set_draft_value("owner", FieldValue::from("u2")).is_err());
}

#[test]
fn edit_replaces_an_open_create_draft() {
    let mut grid = grid(Arc::new(FakeDeviceStore::default()));
    assert!(grid.begin_create().is_ok());
    assert!(grid.begin_edit(2).is_ok());
    assert_eq!(grid.draft_state().mode(), Some(DraftMode::Edit));
    assert_eq!(
        grid.draft_state().original().map(|device| device.id.as_str()),
        Some("d3")
    );
}

#[test]
fn rows_carry_caller_actions_and_edit_when_allowed() {
    let grid = grid(Arc::new(FakeDeviceStore::default()))
        .with_can_edit_row(|device: &Device| device.owner == "u1")
        .with_row_actions(|_| vec![RowAction::custom("approve", "Aprobar")]);

    let rows = grid.view().rows;
    let macbook = rows.iter().find(|row| row.record_index == 1);
    assert_eq!(
        macbook.map(|row| row.actions.clone()),
        Some(vec![RowAction::custom("approve", "Aprobar")])
    );

    let dell = rows.iter().find(|row| row.record_index == 2);
    assert_eq!(
        dell.map(|row| row.actions.clone()),
        Some(vec![RowAction::custom("approve", "Aprobar"), RowAction::Edit])
    );
    assert_eq!(
        dell.and_then(|row| row.cells.get(3).cloned()),
        Some("Dell (d3)".to_owned())
    );
}

#[test]
fn cancel_discards_the_draft() {
    let mut grid = grid(Arc::new(FakeDeviceStore::default()));
    assert!(grid.begin_edit(0).is_ok());
    grid.cancel();
    assert_eq!(grid.draft_state(), &DraftState::None);
    assert!(grid.view().draft_editor.is_none());
}

#[tokio::test]
async fn successful_create_appends_and_closes_the_draft() {
    let store = Arc::new(FakeDeviceStore::default());
    let mut grid = grid(store.clone());
    assert!(grid.begin_create().is_ok());
    assert!(grid.set_draft_value("model", FieldValue::from("Zenbook")).is_ok());

    assert!(grid.save().await.is_ok());
    assert_eq!(grid.draft_state().mode(), None);
    assert_eq!(grid.records().len(), 4);
    assert_eq!(store.created.lock().await.len(), 1);
    assert_eq!(
        models(&grid),
        vec!["Dell", "MacBook", "ThinkPad", "Zenbook"]
    );
}

#[tokio::test]
async fn successful_edit_passes_original_and_replaces_the_record() {
    let store = Arc::new(FakeDeviceStore::default());
    let mut grid = grid(store.clone());
    assert!(grid.begin_edit(0).is_ok());
    assert!(grid.set_draft_value("model", FieldValue::from("Yoga")).is_ok());

    assert!(grid.save().await.is_ok());
    let updated = store.updated.lock().await;
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].1.model, "ThinkPad");
    assert_eq!(grid.records()[0].model, "Yoga");
}

#[tokio::test]
async fn failed_save_keeps_the_draft_and_notifies_once() {
    let store = Arc::new(FakeDeviceStore {
        fail: true,
        ..FakeDeviceStore::default()
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let mut grid = grid(store).with_notifier(notifier.clone());
    assert!(grid.begin_create().is_ok());

    let result = grid.save().await;
    assert!(matches!(result, Err(AppError::RemoteOperationFailed(_))));
    assert_eq!(grid.draft_state().mode(), Some(DraftMode::Create));
    assert_eq!(grid.records().len(), 3);
    assert_eq!(notifier.notices.lock().await.len(), 1);
}

#[tokio::test]
async fn save_without_a_draft_is_a_conflict() {
    let mut grid = grid(Arc::new(FakeDeviceStore::default()));
    assert!(matches!(grid.save().await, Err(AppError::Conflict(_))));
}
