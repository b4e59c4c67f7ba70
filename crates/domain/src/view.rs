use std::str::FromStr;

use gatehouse_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Sort direction for a grid view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
    /// Original collection order.
    None,
}

impl SortDirection {
    /// Returns stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::None => "none",
        }
    }

    /// Returns the direction reached by clicking the same header again.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::None,
            Self::None => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            "none" => Ok(Self::None),
            _ => Err(AppError::Validation(format!(
                "unknown sort direction '{value}'"
            ))),
        }
    }
}

/// Active sort of a grid view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    path: NonEmptyString,
    direction: SortDirection,
}

impl SortSpec {
    /// Creates an ascending sort on `path`.
    pub fn new(path: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            path: NonEmptyString::new(path)?,
            direction: SortDirection::Asc,
        })
    }

    /// Returns the sorted path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Returns the direction.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Applies a header click.
    ///
    /// The same column cycles `asc -> desc -> none -> asc`; another column
    /// starts again at `asc`.
    pub fn toggle(&mut self, path: &str) -> AppResult<()> {
        if self.path.as_str() == path {
            self.direction = self.direction.next();
        } else {
            *self = Self::new(path)?;
        }

        Ok(())
    }

    /// Moves the sort to `path` while keeping the direction.
    pub fn set_path(&mut self, path: &str) -> AppResult<()> {
        self.path = NonEmptyString::new(path)?;
        Ok(())
    }

    /// Sets the direction on the current path.
    pub fn set_direction(&mut self, direction: SortDirection) {
        self.direction = direction;
    }
}
