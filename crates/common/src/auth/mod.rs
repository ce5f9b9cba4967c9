//! Authentication utilities
//!
//! Bearer-token identity for chat requests. Identity is optional on the
//! chat endpoint (anonymous callers are served, just not persisted) and
//! required on the history endpoints.

use crate::errors::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: expiration_secs as i64,
        }
    }

    /// Generate a new JWT token for a user
    pub fn generate_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration_secs);

        let claims = JwtClaims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| AppError::Internal {
            message: format!("Failed to generate token: {}", e),
        })
    }

    /// Validate a token and return the user id it identifies
    pub fn validate_token(&self, token: &str) -> Result<Uuid> {
        let claims = decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::InvalidToken,
            })?;

        Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)
    }
}

/// Extract the bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test_secret", 3600);
        let user_id = Uuid::new_v4();

        let token = manager.generate_token(user_id).unwrap();
        let decoded = manager.validate_token(&token).unwrap();

        assert_eq!(decoded, user_id);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let manager = JwtManager::new("test_secret", 3600);
        assert!(matches!(
            manager.validate_token("not-a-token"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = JwtManager::new("secret_a", 3600);
        let verifier = JwtManager::new("secret_b", 3600);

        let token = signer.generate_token(Uuid::new_v4()).unwrap();
        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("abc.def.ghi"), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
