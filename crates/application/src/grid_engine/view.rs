use gatehouse_domain::{FieldOption, FieldValue, InputKind, SortDirection};

use super::draft::DraftMode;

/// Action rendered in a row's trailing cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Opens the row in the inline editor.
    Edit,
    /// Caller-defined action.
    Custom {
        /// Stable action id.
        id: String,
        /// Button label.
        label: String,
    },
}

impl RowAction {
    /// Creates a caller-defined action.
    #[must_use]
    pub fn custom(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Custom {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Filter/sort bar state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBarView {
    /// Sortable `(header, path)` choices.
    pub sort_options: Vec<FieldOption>,
    /// Active sort path.
    pub sort_by: String,
    /// Current filter text.
    pub filter_text: String,
    /// Current direction.
    pub order: SortDirection,
}

/// One input of the draft editor row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftInputView {
    /// Draft key.
    pub key: String,
    /// Column header used as label.
    pub label: String,
    /// Input kind.
    pub input_kind: InputKind,
    /// Options for select-like kinds.
    pub options: Vec<FieldOption>,
    /// Current value.
    pub value: FieldValue,
    /// Disabled inputs still render for layout.
    pub enabled: bool,
}

/// Draft editor row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEditorView {
    /// Create or edit.
    pub mode: DraftMode,
    /// One input per keyed column.
    pub inputs: Vec<DraftInputView>,
}

/// Column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    /// Header label.
    pub label: String,
    /// Whether a click sorts on this column.
    pub sortable: bool,
    /// Direction when this column is the active sort.
    pub direction: Option<SortDirection>,
}

/// One rendered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Position of the record in the engine's collection.
    pub record_index: usize,
    /// Cell text per column.
    pub cells: Vec<String>,
    /// Trailing action cell.
    pub actions: Vec<RowAction>,
}

/// Headless rendering of a grid, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    /// Filter/sort bar, when enabled.
    pub filter_bar: Option<FilterBarView>,
    /// Whether the "add new" affordance is shown.
    pub show_add_new: bool,
    /// Draft editor row, when a draft is open.
    pub draft_editor: Option<DraftEditorView>,
    /// Column headers.
    pub headers: Vec<HeaderView>,
    /// Filtered and sorted rows.
    pub rows: Vec<RowView>,
}
