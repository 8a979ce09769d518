use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{DomainError, User};

/// Claims carried by both access and refresh tokens. The two differ only in
/// signing secret and lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub username: String,
    pub is_verified: bool,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// Mint an HS256 token for the user with the given lifetime.
pub fn mint_token(user: &User, secret: &str, ttl_seconds: i64) -> Result<String, DomainError> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        is_verified: user.is_verified,
        iat,
        exp: iat + ttl_seconds,
    };
    mint_from_claims(&claims, secret, ttl_seconds)
}

/// Re-mint a token from previously verified claims, refreshing `iat`/`exp`.
pub fn mint_from_claims(
    claims: &Claims,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, DomainError> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        iat,
        exp: iat + ttl_seconds,
        ..claims.clone()
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| DomainError::internal(format!("failed to encode JWT: {e}")))
}

/// Verify a token's signature and expiry and return its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    // Default Validation already checks exp and pins HS256.
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new("candidate@example.com", "hash", 30, "ABC123")
    }

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let user = test_user();
        let token = mint_token(&user, "test-secret", 3600).unwrap();
        let claims = verify_token(&token, "test-secret").unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, user.username);
        assert!(!claims.is_verified);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_expired_token() {
        let user = test_user();
        let token = mint_token(&user, "test-secret", -120).unwrap();
        assert_eq!(
            verify_token(&token, "test-secret").unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_bad_signature() {
        let user = test_user();
        let token = mint_token(&user, "secret-a", 3600).unwrap();
        assert_eq!(
            verify_token(&token, "secret-b").unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_refresh_reissues_with_new_expiry() {
        let user = test_user();
        let token = mint_token(&user, "refresh-secret", 3600).unwrap();
        let claims = verify_token(&token, "refresh-secret").unwrap();

        let access = mint_from_claims(&claims, "access-secret", 60).unwrap();
        let access_claims = verify_token(&access, "access-secret").unwrap();
        assert_eq!(access_claims.sub, user.id);
        assert_eq!(access_claims.exp, access_claims.iat + 60);
    }
}
