use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use gatehouse_core::{AppError, AppResult, NonEmptyString};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Supported input kinds for form fields and grid columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    /// Free text input.
    Text,
    /// Email input.
    Email,
    /// Telephone input.
    Tel,
    /// Masked password input.
    Password,
    /// Date input.
    Date,
    /// Single choice over an option list.
    Select,
    /// Multiple choice over an option list.
    MultiSelect,
    /// Boolean toggle.
    Checkbox,
}

impl InputKind {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Password => "password",
            Self::Date => "date",
            Self::Select => "select",
            Self::MultiSelect => "multiSelect",
            Self::Checkbox => "checkbox",
        }
    }

    /// Returns whether the kind needs an option list.
    #[must_use]
    pub fn requires_options(&self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }

    /// Returns the empty value a fresh input of this kind holds.
    #[must_use]
    pub fn empty_value(&self) -> FieldValue {
        match self {
            Self::MultiSelect => FieldValue::List(Vec::new()),
            Self::Checkbox => FieldValue::Flag(false),
            _ => FieldValue::Text(String::new()),
        }
    }
}

impl FromStr for InputKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "email" => Ok(Self::Email),
            "tel" => Ok(Self::Tel),
            "password" => Ok(Self::Password),
            "date" => Ok(Self::Date),
            "select" => Ok(Self::Select),
            "multiSelect" | "multi-select" => Ok(Self::MultiSelect),
            "checkbox" => Ok(Self::Checkbox),
            _ => Err(AppError::Validation(format!(
                "unknown input kind '{value}'"
            ))),
        }
    }
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Submitted value.
    pub value: String,
    /// Human-readable label.
    pub label: String,
}

impl FieldOption {
    /// Creates an option from a value and label.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Raw value held by an input, a form field or a grid draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text-like value.
    Text(String),
    /// Multi-select value.
    List(Vec<String>),
    /// Checkbox value.
    Flag(bool),
}

impl FieldValue {
    /// Returns whether the value counts as empty for required checks.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Flag(flag) => !flag,
        }
    }

    /// Returns the text value, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Compiled validation pattern with its user-facing message.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
    message: Option<String>,
}

impl FieldPattern {
    /// Compiles a pattern; invalid expressions are validation errors.
    pub fn new(pattern: &str, message: Option<String>) -> AppResult<Self> {
        let regex = Regex::new(pattern).map_err(|error| {
            AppError::Validation(format!("invalid field pattern '{pattern}': {error}"))
        })?;

        Ok(Self {
            regex,
            message: message.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Returns whether the text matches anywhere.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Returns the source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns the configured failure message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str() && self.message == other.message
    }
}

/// Declarative description of one form input.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    key: NonEmptyString,
    label: String,
    input_kind: InputKind,
    required: bool,
    pattern: Option<FieldPattern>,
    options: Vec<FieldOption>,
    editable: bool,
    included_on_create: bool,
    default_value: Option<String>,
}

impl FieldDescriptor {
    /// Creates a validated field descriptor.
    ///
    /// Select-like kinds must carry at least one option.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        input_kind: InputKind,
        options: Vec<FieldOption>,
    ) -> AppResult<Self> {
        let key = NonEmptyString::new(key)?;
        if input_kind.requires_options() && options.is_empty() {
            return Err(AppError::Validation(format!(
                "field '{}' of kind '{}' requires options",
                key.as_str(),
                input_kind.as_str()
            )));
        }

        Ok(Self {
            key,
            label: label.into(),
            input_kind,
            required: false,
            pattern: None,
            options,
            editable: true,
            included_on_create: true,
            default_value: None,
        })
    }

    /// Creates a text field.
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> AppResult<Self> {
        Self::new(key, label, InputKind::Text, Vec::new())
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches a regex rule and its failure message.
    pub fn with_pattern(mut self, pattern: &str, message: Option<String>) -> AppResult<Self> {
        self.pattern = Some(FieldPattern::new(pattern, message)?);
        Ok(self)
    }

    /// Sets the initial text value.
    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets whether the input is enabled when editing.
    #[must_use]
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Sets whether the input is enabled when creating.
    #[must_use]
    pub fn with_included_on_create(mut self, included: bool) -> Self {
        self.included_on_create = included;
        self
    }

    /// Returns the field key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the input kind.
    #[must_use]
    pub fn input_kind(&self) -> InputKind {
        self.input_kind
    }

    /// Returns whether the field is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the optional regex rule.
    #[must_use]
    pub fn pattern(&self) -> Option<&FieldPattern> {
        self.pattern.as_ref()
    }

    /// Returns option list for select-like kinds.
    #[must_use]
    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// Returns whether the input is enabled when editing.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Returns whether the input is enabled when creating.
    #[must_use]
    pub fn is_included_on_create(&self) -> bool {
        self.included_on_create
    }

    /// Returns the value a freshly mounted input holds.
    #[must_use]
    pub fn initial_value(&self) -> FieldValue {
        match (&self.default_value, self.input_kind) {
            (Some(value), InputKind::Checkbox) => FieldValue::Flag(value == "true"),
            (Some(value), InputKind::MultiSelect) => FieldValue::List(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_owned)
                    .collect(),
            ),
            (Some(value), _) => FieldValue::Text(value.clone()),
            (None, kind) => kind.empty_value(),
        }
    }
}

/// Rows of field descriptors; rows group layout only.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatrix {
    rows: Vec<Vec<FieldDescriptor>>,
}

impl FieldMatrix {
    /// Creates a matrix, rejecting duplicate keys across all rows.
    pub fn new(rows: Vec<Vec<FieldDescriptor>>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for field in rows.iter().flatten() {
            if !seen.insert(field.key().to_owned()) {
                return Err(AppError::Validation(format!(
                    "duplicate field key '{}'",
                    field.key()
                )));
            }
        }

        Ok(Self { rows })
    }

    /// Returns layout rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<FieldDescriptor>] {
        &self.rows
    }

    /// Iterates fields in layout order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.rows.iter().flatten()
    }

    /// Finds a field by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|field| field.key() == key)
    }
}

/// Flattened `{key: value}` map handed to submit handlers.
pub type FieldValues = BTreeMap<String, FieldValue>;
