use std::str::FromStr;

use gatehouse_core::{AppError, AppResult};
use gatehouse_domain::SortDirection;

use crate::console_ports::Draft;

/// Kind of draft currently open in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    /// Creating a new record.
    Create,
    /// Editing an existing record.
    Edit,
}

/// Draft lifecycle of a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftState<T> {
    /// No draft is open.
    None,
    /// A new record is being drafted.
    Creating {
        /// Values keyed by column key.
        draft: Draft,
    },
    /// An existing record is being edited.
    Editing {
        /// Values keyed by column key.
        draft: Draft,
        /// Record the draft will replace.
        original: T,
    },
}

impl<T> DraftState<T> {
    /// Returns the open draft mode, if any.
    #[must_use]
    pub fn mode(&self) -> Option<DraftMode> {
        match self {
            Self::None => None,
            Self::Creating { .. } => Some(DraftMode::Create),
            Self::Editing { .. } => Some(DraftMode::Edit),
        }
    }

    /// Returns the open draft values, if any.
    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Self::None => None,
            Self::Creating { draft } | Self::Editing { draft, .. } => Some(draft),
        }
    }

    /// Returns the record being edited, if any.
    #[must_use]
    pub fn original(&self) -> Option<&T> {
        match self {
            Self::Editing { original, .. } => Some(original),
            _ => None,
        }
    }

    pub(super) fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            Self::None => None,
            Self::Creating { draft } | Self::Editing { draft, .. } => Some(draft),
        }
    }
}

/// Change emitted by the filter/sort bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// Sort on another path, keeping the direction.
    SortBy(String),
    /// Replace the filter text.
    FilterText(String),
    /// Set the direction on the current path.
    Order(SortDirection),
}

impl FilterChange {
    /// Parses a `(name, value)` pair emitted by a filter bar control.
    pub fn parse(name: &str, value: &str) -> AppResult<Self> {
        match name {
            "sortBy" => Ok(Self::SortBy(value.to_owned())),
            "filterText" => Ok(Self::FilterText(value.to_owned())),
            "order" => match SortDirection::from_str(value)? {
                SortDirection::None => Err(AppError::Validation(
                    "order must be 'asc' or 'desc'".to_owned(),
                )),
                direction => Ok(Self::Order(direction)),
            },
            _ => Err(AppError::Validation(format!(
                "unknown filter control '{name}'"
            ))),
        }
    }
}
