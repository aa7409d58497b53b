//! Bearer token service
//!
//! Issues and verifies the HS256 tokens the admin console and storefront
//! present. Verification is two-stage: signature and expiry first, then the
//! revocation state of the issuing identity (disabled flag, and the
//! `tokens_valid_after` watermark a superadmin can bump to kill outstanding
//! sessions). Role claims are baked into the token at issue time.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db;
use crate::models::UserRow;

const ISSUER: &str = "storefront-admin";

/// Claims carried by an issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject uid
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Admin claim; absent on customer tokens
    #[serde(default)]
    pub admin: bool,
    /// Superadmin claim; implies admin-level access
    #[serde(default)]
    pub superadmin: bool,
    /// Expiration timestamp (seconds)
    pub exp: i64,
    /// Issued at timestamp (seconds)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

/// Token verification errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token revoked")]
    Revoked,

    #[error("account disabled")]
    Disabled,

    #[error("unknown subject")]
    UnknownSubject,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    #[error("identity lookup failed: {0}")]
    Lookup(String),
}

/// Token service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    /// Issue a token for a user, role claims included
    pub fn issue(&self, user: &UserRow) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.uid.clone(),
            email: Some(user.email.clone()),
            admin: user.is_admin,
            superadmin: user.is_superadmin,
            exp: (now + Duration::minutes(self.ttl_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: ISSUER.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::GenerationFailed(e.to_string()))
    }

    /// Validate signature, expiry and issuer. No revocation check.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Full verification: signature, expiry, then revocation state. The
    /// subject must still exist, must not be disabled, and the token must
    /// not predate the subject's revocation watermark.
    pub async fn verify(&self, pool: &SqlitePool, token: &str) -> Result<Claims, AuthError> {
        let claims = self.decode_claims(token)?;

        let user = db::users::find_by_uid(pool, &claims.sub)
            .await
            .map_err(|e| AuthError::Lookup(e.to_string()))?
            .ok_or(AuthError::UnknownSubject)?;

        if user.disabled {
            return Err(AuthError::Disabled);
        }
        // iat is seconds, the watermark is millis
        if claims.iat * 1000 < user.tokens_valid_after {
            return Err(AuthError::Revoked);
        }

        Ok(claims)
    }

    /// Extract token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret-key-at-least-32-chars", 60)
    }

    fn user(admin: bool, superadmin: bool) -> UserRow {
        UserRow {
            uid: "user-1".to_string(),
            email: "staff@example.com".to_string(),
            password_hash: String::new(),
            display_name: None,
            is_admin: admin,
            is_superadmin: superadmin,
            disabled: false,
            tokens_valid_after: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_issue_and_decode_roundtrip() {
        let service = service();
        let token = service.issue(&user(true, false)).unwrap();
        let claims = service.decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email.as_deref(), Some("staff@example.com"));
        assert!(claims.admin);
        assert!(!claims.superadmin);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let token = service().issue(&user(true, true)).unwrap();
        let other = TokenService::new("a-completely-different-secret-keyyyy", 60);
        assert!(matches!(
            other.decode_claims(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // negative ttl puts exp well past the default leeway
        let service = TokenService::new("unit-test-secret-key-at-least-32-chars", -5);
        let token = service.issue(&user(false, false)).unwrap();
        assert!(matches!(
            service.decode_claims(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(service().decode_claims("not.a.jwt").is_err());
    }

    #[test]
    fn test_missing_role_claims_default_false() {
        #[derive(Serialize)]
        struct Bare {
            sub: String,
            exp: i64,
            iat: i64,
            iss: String,
        }
        let now = Utc::now().timestamp();
        let bare = Bare {
            sub: "customer-1".to_string(),
            exp: now + 3600,
            iat: now,
            iss: ISSUER.to_string(),
        };
        let token = encode(
            &Header::default(),
            &bare,
            &EncodingKey::from_secret("unit-test-secret-key-at-least-32-chars".as_bytes()),
        )
        .unwrap();

        let claims = service().decode_claims(&token).unwrap();
        assert!(!claims.admin);
        assert!(!claims.superadmin);
        assert_eq!(claims.email, None);
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(
            TokenService::extract_from_header("Bearer abc.def.ghi"),
            Some("abc.def.ghi")
        );
        assert_eq!(TokenService::extract_from_header("bearer abc"), None);
        assert_eq!(TokenService::extract_from_header("Basic abc"), None);
    }
}
