use serde::{Deserialize, Serialize};

use crate::NonEmptyString;

/// Signed-in actor established from verified session claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    id: NonEmptyString,
    display_name: String,
    email: String,
    role_label: String,
}

impl Subject {
    /// Creates a subject from verified claim values.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        role_label: impl Into<String>,
    ) -> crate::AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            display_name: display_name.into(),
            email: email.into(),
            role_label: role_label.into(),
        })
    }

    /// Returns the stable subject id used as the actor id in scope checks.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display name for the current actor.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email claim.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the role label used to resolve permissions.
    #[must_use]
    pub fn role_label(&self) -> &str {
        self.role_label.as_str()
    }
}
