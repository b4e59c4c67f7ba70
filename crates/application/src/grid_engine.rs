use std::fmt;
use std::sync::Arc;

use gatehouse_core::{AppError, AppResult};
use gatehouse_domain::{ColumnDescriptor, FieldOption, FieldValue, SortSpec};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::console_ports::{CreateRecord, Notice, Notifier, UpdateRecord};
use crate::filter_sort::filter_and_sort_indices;

mod draft;
mod view;

pub use draft::{DraftMode, DraftState, FilterChange};
pub use view::{
    DraftEditorView, DraftInputView, FilterBarView, GridView, HeaderView, RowAction, RowView,
};

type RowPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type RowActions<T> = Arc<dyn Fn(&T) -> Vec<RowAction> + Send + Sync>;

/// Column-driven grid with filtering, sorting and inline create/edit.
pub struct GridEngine<T> {
    columns: Vec<ColumnDescriptor<T>>,
    records: Vec<T>,
    sort: SortSpec,
    filter_text: String,
    draft: DraftState<T>,
    filter_bar: bool,
    allow_add_new: bool,
    allow_edit: bool,
    can_edit_row: RowPredicate<T>,
    row_actions: Option<RowActions<T>>,
    create: Option<Arc<dyn CreateRecord<T>>>,
    update: Option<Arc<dyn UpdateRecord<T>>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<T> GridEngine<T>
where
    T: Serialize + Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates a grid over `records`, sorted ascending on `default_sort_path`.
    pub fn new(
        columns: Vec<ColumnDescriptor<T>>,
        records: Vec<T>,
        default_sort_path: &str,
    ) -> AppResult<Self> {
        for column in &columns {
            column.validate()?;
        }

        Ok(Self {
            columns,
            records,
            sort: SortSpec::new(default_sort_path)?,
            filter_text: String::new(),
            draft: DraftState::None,
            filter_bar: false,
            allow_add_new: false,
            allow_edit: false,
            can_edit_row: Arc::new(|_| true),
            row_actions: None,
            create: None,
            update: None,
            notifier: None,
        })
    }

    /// Shows the filter/sort bar.
    #[must_use]
    pub fn with_filter_bar(mut self) -> Self {
        self.filter_bar = true;
        self
    }

    /// Enables inline creation through `create`.
    #[must_use]
    pub fn with_create(mut self, create: Arc<dyn CreateRecord<T>>) -> Self {
        self.allow_add_new = true;
        self.create = Some(create);
        self
    }

    /// Enables inline editing through `update`.
    #[must_use]
    pub fn with_update(mut self, update: Arc<dyn UpdateRecord<T>>) -> Self {
        self.allow_edit = true;
        self.update = Some(update);
        self
    }

    /// Restricts which rows may be edited.
    #[must_use]
    pub fn with_can_edit_row<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.can_edit_row = Arc::new(predicate);
        self
    }

    /// Adds caller-defined actions to every row.
    #[must_use]
    pub fn with_row_actions<F>(mut self, actions: F) -> Self
    where
        F: Fn(&T) -> Vec<RowAction> + Send + Sync + 'static,
    {
        self.row_actions = Some(Arc::new(actions));
        self
    }

    /// Reports save failures through `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Returns the underlying collection.
    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Replaces the underlying collection; an open draft is kept.
    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
    }

    /// Returns the active sort.
    #[must_use]
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Returns the filter text.
    #[must_use]
    pub fn filter_text(&self) -> &str {
        self.filter_text.as_str()
    }

    /// Returns the draft lifecycle state.
    #[must_use]
    pub fn draft_state(&self) -> &DraftState<T> {
        &self.draft
    }

    /// Returns the columns.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor<T>] {
        &self.columns
    }

    /// Applies a header click; computed columns ignore clicks.
    pub fn click_header(&mut self, column_index: usize) -> AppResult<()> {
        let column = self.columns.get(column_index).ok_or_else(|| {
            AppError::Validation(format!("unknown column index {column_index}"))
        })?;

        let Some(path) = column.accessor().sort_path().map(str::to_owned) else {
            return Ok(());
        };

        self.sort.toggle(&path)?;
        debug!(
            path = self.sort.path(),
            direction = self.sort.direction().as_str(),
            "grid sort toggled"
        );
        Ok(())
    }

    /// Applies a filter/sort bar change.
    pub fn apply_filter_change(&mut self, change: FilterChange) -> AppResult<()> {
        match change {
            FilterChange::SortBy(path) => self.sort.set_path(&path)?,
            FilterChange::FilterText(text) => self.filter_text = text,
            FilterChange::Order(direction) => self.sort.set_direction(direction),
        }

        Ok(())
    }

    /// Opens a create draft seeded with one empty value per keyed column.
    pub fn begin_create(&mut self) -> AppResult<()> {
        if !self.allow_add_new {
            return Err(AppError::Forbidden(
                "this grid does not allow creating records".to_owned(),
            ));
        }
        if self.draft.mode().is_some() {
            return Err(AppError::Conflict(
                "a draft is already open; save or cancel it first".to_owned(),
            ));
        }

        let draft = self
            .columns
            .iter()
            .filter_map(|column| {
                column
                    .key()
                    .map(|key| (key.to_owned(), column.input_kind().empty_value()))
            })
            .collect();

        self.draft = DraftState::Creating { draft };
        debug!("grid create draft opened");
        Ok(())
    }

    /// Opens an edit draft for the record at `record_index`.
    ///
    /// Any open draft is replaced.
    pub fn begin_edit(&mut self, record_index: usize) -> AppResult<()> {
        if !self.allow_edit {
            return Err(AppError::Forbidden(
                "this grid does not allow editing records".to_owned(),
            ));
        }

        let record = self.records.get(record_index).ok_or_else(|| {
            AppError::NotFound(format!("no record at index {record_index}"))
        })?;

        if !(self.can_edit_row)(record) {
            return Err(AppError::Forbidden(
                "this record cannot be edited by the current actor".to_owned(),
            ));
        }

        let draft = self
            .columns
            .iter()
            .filter_map(|column| {
                let key = column.key()?;
                column.extract(record).map(|value| (key.to_owned(), value))
            })
            .collect();

        self.draft = DraftState::Editing {
            draft,
            original: record.clone(),
        };
        debug!(record_index, "grid edit draft opened");
        Ok(())
    }

    /// Sets one draft value through an enabled input.
    pub fn set_draft_value(&mut self, key: &str, value: FieldValue) -> AppResult<()> {
        let Some(mode) = self.draft.mode() else {
            return Err(AppError::Conflict("no draft is open".to_owned()));
        };

        let enabled = self
            .columns
            .iter()
            .find(|column| column.key() == Some(key))
            .is_some_and(|column| self.input_enabled(column, mode, key));
        if !enabled {
            return Err(AppError::Validation(format!(
                "draft input '{key}' is not editable"
            )));
        }

        if let Some(draft) = self.draft.draft_mut() {
            draft.insert(key.to_owned(), value);
        }

        Ok(())
    }

    /// Discards the open draft without side effects.
    pub fn cancel(&mut self) {
        if self.draft.mode().is_some() {
            debug!("grid draft cancelled");
        }
        self.draft = DraftState::None;
    }

    /// Saves the open draft through the create or update operation.
    ///
    /// On success the stored record is folded into the collection and the
    /// draft closes. On failure the draft stays open, one notice is emitted and
    /// `RemoteOperationFailed` is returned.
    pub async fn save(&mut self) -> AppResult<()> {
        let outcome = match &self.draft {
            DraftState::None => {
                return Err(AppError::Conflict("no draft is open".to_owned()));
            }
            DraftState::Creating { draft } => match &self.create {
                Some(create) => create.create(draft).await.map(Some),
                None => Ok(None),
            },
            DraftState::Editing { draft, original } => match &self.update {
                Some(update) => update.update(draft, original).await.map(Some),
                None => Ok(None),
            },
        };

        match outcome {
            Ok(stored) => {
                let closed = std::mem::replace(&mut self.draft, DraftState::None);
                if let Some(stored) = stored {
                    self.fold(closed, stored);
                }
                Ok(())
            }
            Err(error) => {
                let message = match error {
                    AppError::RemoteOperationFailed(message) => message,
                    other => other.to_string(),
                };
                warn!(error = %message, "grid save failed");
                if let Some(notifier) = &self.notifier {
                    notifier
                        .notify(Notice::error(format!("could not save record: {message}")))
                        .await;
                }
                Err(AppError::RemoteOperationFailed(message))
            }
        }
    }

    /// Renders the grid in display order.
    #[must_use]
    pub fn view(&self) -> GridView {
        GridView {
            filter_bar: self.filter_bar.then(|| self.filter_bar_view()),
            show_add_new: self.allow_add_new && self.draft.mode().is_none(),
            draft_editor: self.draft_editor_view(),
            headers: self.header_views(),
            rows: self.row_views(),
        }
    }

    fn fold(&mut self, closed: DraftState<T>, stored: T) {
        match closed {
            DraftState::Creating { .. } => {
                self.records.push(stored);
                info!("grid record created");
            }
            DraftState::Editing { original, .. } => {
                if let Some(slot) = self.records.iter_mut().find(|record| **record == original) {
                    *slot = stored;
                }
                info!("grid record updated");
            }
            DraftState::None => {}
        }
    }

    fn input_enabled(&self, column: &ColumnDescriptor<T>, mode: DraftMode, key: &str) -> bool {
        match mode {
            DraftMode::Create => column.is_included_on_create(),
            DraftMode::Edit => {
                column.is_editable()
                    && self
                        .draft
                        .draft()
                        .is_some_and(|draft| draft.contains_key(key))
            }
        }
    }

    fn filter_bar_view(&self) -> FilterBarView {
        FilterBarView {
            sort_options: self
                .columns
                .iter()
                .filter_map(|column| {
                    column
                        .accessor()
                        .sort_path()
                        .map(|path| FieldOption::new(path, column.header()))
                })
                .collect(),
            sort_by: self.sort.path().to_owned(),
            filter_text: self.filter_text.clone(),
            order: self.sort.direction(),
        }
    }

    fn draft_editor_view(&self) -> Option<DraftEditorView> {
        let mode = self.draft.mode()?;
        let draft = self.draft.draft()?;

        let inputs = self
            .columns
            .iter()
            .filter_map(|column| {
                let key = column.key()?;
                Some(DraftInputView {
                    key: key.to_owned(),
                    label: column.header().to_owned(),
                    input_kind: column.input_kind(),
                    options: column.options().to_vec(),
                    value: draft
                        .get(key)
                        .cloned()
                        .unwrap_or_else(|| column.input_kind().empty_value()),
                    enabled: self.input_enabled(column, mode, key),
                })
            })
            .collect();

        Some(DraftEditorView { mode, inputs })
    }

    fn header_views(&self) -> Vec<HeaderView> {
        self.columns
            .iter()
            .map(|column| {
                let path = column.accessor().sort_path();
                HeaderView {
                    label: column.header().to_owned(),
                    sortable: path.is_some(),
                    direction: path
                        .filter(|path| *path == self.sort.path())
                        .map(|_| self.sort.direction()),
                }
            })
            .collect()
    }

    fn row_views(&self) -> Vec<RowView> {
        filter_and_sort_indices(
            &self.records,
            self.sort.path(),
            self.sort.direction(),
            &self.filter_text,
        )
        .into_iter()
        .filter_map(|record_index| {
            let record = self.records.get(record_index)?;
            let projected = serde_json::to_value(record).unwrap_or(Value::Null);
            let cells = self
                .columns
                .iter()
                .map(|column| column.accessor().display(record, &projected))
                .collect();

            Some(RowView {
                record_index,
                cells,
                actions: self.row_actions_for(record),
            })
        })
        .collect()
    }

    fn row_actions_for(&self, record: &T) -> Vec<RowAction> {
        let mut actions = self
            .row_actions
            .as_ref()
            .map(|actions| actions(record))
            .unwrap_or_default();
        if self.allow_edit && (self.can_edit_row)(record) {
            actions.push(RowAction::Edit);
        }
        actions
    }
}

impl<T> fmt::Debug for GridEngine<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("GridEngine")
            .field("columns", &self.columns)
            .field("records", &self.records.len())
            .field("sort", &self.sort)
            .field("filter_text", &self.filter_text)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
