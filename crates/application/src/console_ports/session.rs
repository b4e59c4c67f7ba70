use async_trait::async_trait;
use gatehouse_core::AppResult;
use gatehouse_domain::SessionClaims;

/// Port decoding an opaque session token into its claims.
#[async_trait]
pub trait SessionTokenDecoder: Send + Sync {
    /// Decodes `token`; malformed tokens are `Unauthorized`.
    async fn decode(&self, token: &str) -> AppResult<SessionClaims>;
}
