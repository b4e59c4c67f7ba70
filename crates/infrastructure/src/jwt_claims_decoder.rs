use std::collections::HashSet;

use async_trait::async_trait;
use gatehouse_application::SessionTokenDecoder;
use gatehouse_core::{AppError, AppResult};
use gatehouse_domain::SessionClaims;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

/// Reads the claims of a JWT with `jsonwebtoken`.
///
/// Signatures are not verified; the backend remains the authority and
/// rejects forged tokens on every request. Expiry is checked by the session
/// service against its own clock.
#[derive(Debug, Clone)]
pub struct JwtClaimsDecoder {
    validation: Validation,
}

impl Default for JwtClaimsDecoder {
    fn default() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        Self { validation }
    }
}

impl JwtClaimsDecoder {
    /// Creates a decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn decode_claims(&self, token: &str) -> AppResult<SessionClaims> {
        decode::<SessionClaims>(token.trim(), &DecodingKey::from_secret(&[]), &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|error| match error.kind() {
                jsonwebtoken::errors::ErrorKind::Json(_) => {
                    AppError::Unauthorized(format!("session token claims are malformed: {error}"))
                }
                _ => AppError::Unauthorized(format!("session token is not a valid JWT: {error}")),
            })
    }
}

#[async_trait]
impl SessionTokenDecoder for JwtClaimsDecoder {
    async fn decode(&self, token: &str) -> AppResult<SessionClaims> {
        self.decode_claims(token)
    }
}

#[cfg(test)]
mod tests {
    use gatehouse_application::SessionTokenDecoder;
    use gatehouse_core::AppError;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    use super::JwtClaimsDecoder;

    fn token(claims: &serde_json::Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(b"console-secret"),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn decodes_claims_from_a_signed_token() {
        let token = token(&json!({
            "id": "u1",
            "name": "Ana Pérez",
            "email": "ana@corp.test",
            "role": "Líder Técnico",
            "exp": 1_900_000_000,
            "aud": ["console"]
        }));

        let claims = JwtClaimsDecoder::new()
            .decode(&token)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(claims.id, "u1");
        assert_eq!(claims.role, "Líder Técnico");
        assert_eq!(claims.exp, Some(1_900_000_000));
        assert_eq!(claims.aud, Some(json!(["console"])));
    }

    #[tokio::test]
    async fn expired_tokens_still_decode() {
        let token = token(&json!({
            "id": "u1",
            "name": "Ana",
            "email": "a@b.c",
            "role": "Administrador",
            "exp": 1
        }));

        let claims = JwtClaimsDecoder::new()
            .decode(&token)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(claims.exp, Some(1));
    }

    #[tokio::test]
    async fn malformed_tokens_are_unauthorized() {
        let decoder = JwtClaimsDecoder::new();
        for token in ["", "one.two", "a.!!!.c", "a.b.c.d"] {
            let result = decoder.decode(token).await;
            assert!(matches!(result, Err(AppError::Unauthorized(_))), "{token}");
        }

        let missing_role = token(&json!({"id": "u1", "name": "Ana", "email": "a@b.c"}));
        let result = decoder.decode(&missing_role).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
