use gatehouse_core::{AppError, AppResult, Subject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Actor id.
    pub id: String,
    /// Actor display name.
    pub name: String,
    /// Actor email.
    pub email: String,
    /// Role label resolved through the permission catalog.
    pub role: String,
    /// Issued-at, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Audience; a string or a list of strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Value>,
}

impl SessionClaims {
    /// Returns whether the token expired before `now_secs`.
    ///
    /// Tokens without `exp` never expire.
    #[must_use]
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.exp.is_some_and(|exp| exp < now_secs)
    }

    /// Converts validated claims into the actor identity.
    pub fn into_subject(self) -> AppResult<Subject> {
        Subject::new(self.id, self.name, self.email, self.role).map_err(|error| {
            AppError::Unauthorized(format!("session claims are incomplete: {error}"))
        })
    }
}
