use std::sync::Arc;

use chrono::{DateTime, Utc};
use gatehouse_core::{AppError, AppResult, Subject};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::console_ports::{Notice, Notifier, PersistenceStore, SessionTokenDecoder};

/// Persistence key of the stored session.
pub const SESSION_STORAGE_KEY: &str = "session-storage";

/// Stable notice id for invalid sessions.
pub const SESSION_CHECKER_NOTICE_ID: &str = "session-checker";

const TOKEN_FIELD: &str = "session_token";

/// Verifies, stores and clears the actor's session token.
#[derive(Clone)]
pub struct SessionService {
    decoder: Arc<dyn SessionTokenDecoder>,
    store: Arc<dyn PersistenceStore>,
    notifier: Arc<dyn Notifier>,
}

impl SessionService {
    /// Creates a session service.
    #[must_use]
    pub fn new(
        decoder: Arc<dyn SessionTokenDecoder>,
        store: Arc<dyn PersistenceStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            decoder,
            store,
            notifier,
        }
    }

    /// Verifies `token` at `now`, all-or-nothing.
    ///
    /// A blank token is `Unauthorized` without side effects. Any other failure
    /// clears the stored session and emits one notice.
    pub async fn verify(&self, token: &str, now: DateTime<Utc>) -> AppResult<Subject> {
        if token.trim().is_empty() {
            return Err(AppError::Unauthorized("no session token".to_owned()));
        }

        let verified = match self.decoder.decode(token).await {
            Ok(claims) if claims.is_expired(now.timestamp()) => None,
            Ok(claims) => claims.into_subject().ok(),
            Err(_) => None,
        };

        match verified {
            Some(subject) => Ok(subject),
            None => {
                self.invalidate().await;
                Err(AppError::Unauthorized("invalid session token".to_owned()))
            }
        }
    }

    /// Verifies and stores `token` as the current session.
    pub async fn sign_in(&self, token: &str, now: DateTime<Utc>) -> AppResult<Subject> {
        let subject = self.verify(token, now).await?;
        self.store
            .save(SESSION_STORAGE_KEY, json!({ "session_token": token }))
            .await?;

        info!(subject = subject.id(), "session signed in");
        Ok(subject)
    }

    /// Clears the stored session.
    pub async fn sign_out(&self) -> AppResult<()> {
        self.store.remove(SESSION_STORAGE_KEY).await?;
        info!("session signed out");
        Ok(())
    }

    /// Returns the stored token, if any.
    pub async fn stored_token(&self) -> AppResult<Option<String>> {
        let stored = self.store.load(SESSION_STORAGE_KEY).await?;
        Ok(stored
            .as_ref()
            .and_then(|value| value.get(TOKEN_FIELD))
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    /// Verifies the stored session.
    pub async fn current(&self, now: DateTime<Utc>) -> AppResult<Subject> {
        let token = self.stored_token().await?.unwrap_or_default();
        self.verify(&token, now).await
    }

    async fn invalidate(&self) {
        warn!("session token rejected; clearing stored session");
        if let Err(error) = self.store.remove(SESSION_STORAGE_KEY).await {
            warn!(error = %error, "failed to clear stored session");
        }

        self.notifier
            .notify(
                Notice::error("the session could not be verified; please sign in again")
                    .with_id(SESSION_CHECKER_NOTICE_ID),
            )
            .await;
    }
}
