use std::fmt;
use std::sync::Arc;

use gatehouse_core::{AppError, AppResult};
use serde_json::Value;

use crate::field::{FieldOption, FieldValue, InputKind};
use crate::path::{display_value, resolve_path};

/// Pure display function over a record.
pub type ComputedCell<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Pure function producing the raw editable value of a record.
pub type Extractor<T> = Arc<dyn Fn(&T) -> FieldValue + Send + Sync>;

/// How a column produces its cell text.
pub enum Accessor<T> {
    /// Dotted path into the record's JSON projection; sortable.
    Field(String),
    /// Computed display text; not sortable.
    Computed(ComputedCell<T>),
}

impl<T> Accessor<T> {
    /// Returns the sort path for field accessors.
    #[must_use]
    pub fn sort_path(&self) -> Option<&str> {
        match self {
            Self::Field(path) => Some(path.as_str()),
            Self::Computed(_) => None,
        }
    }

    /// Renders the cell text for one record.
    ///
    /// `projected` is the record's JSON projection; missing paths render empty.
    #[must_use]
    pub fn display(&self, record: &T, projected: &Value) -> String {
        match self {
            Self::Field(path) => resolve_path(projected, path)
                .map(display_value)
                .unwrap_or_default(),
            Self::Computed(cell) => cell(record),
        }
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Field(path) => Self::Field(path.clone()),
            Self::Computed(cell) => Self::Computed(Arc::clone(cell)),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(path) => formatter.debug_tuple("Field").field(path).finish(),
            Self::Computed(_) => formatter.write_str("Computed(..)"),
        }
    }
}

/// Grid column: display accessor plus optional inline input.
pub struct ColumnDescriptor<T> {
    header: String,
    accessor: Accessor<T>,
    key: Option<String>,
    input_kind: InputKind,
    options: Vec<FieldOption>,
    extractor: Option<Extractor<T>>,
    editable: bool,
    included_on_create: bool,
}

impl<T> ColumnDescriptor<T> {
    /// Creates a sortable, display-only column reading `path`.
    ///
    /// The column gets a draft key through [`Self::with_key`] or
    /// [`Self::with_extractor`].
    #[must_use]
    pub fn field(header: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            key: None,
            accessor: Accessor::Field(path.into()),
            input_kind: InputKind::Text,
            options: Vec::new(),
            extractor: None,
            editable: false,
            included_on_create: true,
        }
    }

    /// Creates a computed, unkeyed column.
    #[must_use]
    pub fn computed<F>(header: impl Into<String>, cell: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            header: header.into(),
            accessor: Accessor::Computed(Arc::new(cell)),
            key: None,
            input_kind: InputKind::Text,
            options: Vec::new(),
            extractor: None,
            editable: false,
            included_on_create: true,
        }
    }

    /// Sets the draft key this column edits.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the inline input kind.
    #[must_use]
    pub fn with_input_kind(mut self, input_kind: InputKind) -> Self {
        self.input_kind = input_kind;
        self
    }

    /// Sets the option list for select-like inputs.
    #[must_use]
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    /// Sets the edit-seeding extractor and enables inline editing.
    ///
    /// Unkeyed field columns are keyed by their path.
    #[must_use]
    pub fn with_extractor<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&T) -> FieldValue + Send + Sync + 'static,
    {
        if self.key.is_none() {
            self.key = self.accessor.sort_path().map(str::to_owned);
        }
        self.extractor = Some(Arc::new(extractor));
        self.editable = true;
        self
    }

    /// Overrides whether the input is enabled while editing.
    #[must_use]
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Overrides whether the input is enabled while creating.
    #[must_use]
    pub fn with_included_on_create(mut self, included: bool) -> Self {
        self.included_on_create = included;
        self
    }

    /// Checks the column invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.editable && (self.extractor.is_none() || self.key.is_none()) {
            return Err(AppError::Validation(format!(
                "editable column '{}' requires a key and an extractor",
                self.header
            )));
        }

        Ok(())
    }

    /// Returns the header label.
    #[must_use]
    pub fn header(&self) -> &str {
        self.header.as_str()
    }

    /// Returns the accessor.
    #[must_use]
    pub fn accessor(&self) -> &Accessor<T> {
        &self.accessor
    }

    /// Returns the draft key.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the input kind.
    #[must_use]
    pub fn input_kind(&self) -> InputKind {
        self.input_kind
    }

    /// Returns select options.
    #[must_use]
    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// Returns whether the input is enabled while editing.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Returns whether the input is enabled while creating.
    #[must_use]
    pub fn is_included_on_create(&self) -> bool {
        self.included_on_create
    }

    /// Extracts the editable value from a record, when an extractor exists.
    #[must_use]
    pub fn extract(&self, record: &T) -> Option<FieldValue> {
        self.extractor.as_ref().map(|extractor| extractor(record))
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            key: self.key.clone(),
            input_kind: self.input_kind,
            options: self.options.clone(),
            extractor: self.extractor.clone(),
            editable: self.editable,
            included_on_create: self.included_on_create,
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ColumnDescriptor")
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("key", &self.key)
            .field("input_kind", &self.input_kind)
            .field("has_extractor", &self.extractor.is_some())
            .field("editable", &self.editable)
            .field("included_on_create", &self.included_on_create)
            .finish()
    }
}
