use async_trait::async_trait;
use gatehouse_application::{Notice, NoticeLevel, Notifier};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Notifier writing notices to the log.
///
/// A notice repeating the id of the one delivered just before it is dropped,
/// so a guard re-evaluating the same denied route logs once.
#[derive(Default)]
pub struct TracingNotifier {
    last_id: Mutex<Option<String>>,
}

impl TracingNotifier {
    /// Creates a notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn admit(&self, notice: &Notice) -> bool {
        let mut last_id = self.last_id.lock().await;
        if notice.id.is_some() && *last_id == notice.id {
            return false;
        }

        last_id.clone_from(&notice.id);
        true
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notice: Notice) {
        if !self.admit(&notice).await {
            debug!(id = ?notice.id, "duplicate notice suppressed");
            return;
        }

        match notice.level {
            NoticeLevel::Success => info!(id = ?notice.id, "{}", notice.message),
            NoticeLevel::Error => warn!(id = ?notice.id, "{}", notice.message),
        }
    }
}
