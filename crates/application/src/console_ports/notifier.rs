use async_trait::async_trait;

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmation of a completed operation.
    Success,
    /// Recoverable failure or denial.
    Error,
}

/// User-visible notice, the headless analog of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Stable id used to de-duplicate repeated notices.
    pub id: Option<String>,
    /// Severity.
    pub level: NoticeLevel,
    /// Message shown to the actor.
    pub message: String,
}

impl Notice {
    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            id: None,
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            id: None,
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Attaches a stable de-duplication id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Port delivering notices to the actor.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notice.
    async fn notify(&self, notice: Notice);
}
