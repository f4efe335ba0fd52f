use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{SecurityConfig, MAX_JWT_EXPIRY_HOURS};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("JWT generation error: {0}")]
    Generation(String),
}

/// Issues and validates bearer tokens with a process-wide signing secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            &security.jwt_secret,
            // validate() rejects larger values; the clamp keeps unvalidated configs from overflowing
            Duration::hours(security.jwt_expiry_hours.min(MAX_JWT_EXPIRY_HOURS) as i64),
        )
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn expires_in(&self) -> i64 {
        self.lifetime.num_seconds()
    }

    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        self.encode_claims(&Claims::new(user_id, self.lifetime))
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Validate signature and expiry, returning the embedded user id.
    pub fn validate(&self, token: &str) -> Result<i64, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Invalid("subject is not a user id".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", Duration::hours(1))
    }

    #[test]
    fn issued_token_resolves_to_user() {
        let tokens = service();
        let token = tokens.issue(42).unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), 42);
    }

    #[test]
    fn expired_token_fails() {
        let tokens = service();
        // Past the default 60s validation leeway
        let claims = Claims::new(7, Duration::minutes(-5));
        let token = tokens.encode_claims(&claims).unwrap();
        assert!(matches!(tokens.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn tampered_token_fails() {
        let tokens = service();
        let token = tokens.issue(1).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let forged = service().encode_claims(&Claims::new(2, Duration::hours(1))).unwrap();
        // Swap in another payload while keeping the original signature
        parts[1] = forged.split('.').nth(1).unwrap().to_string();
        let tampered = parts.join(".");
        assert!(matches!(tokens.validate(&tampered), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn token_from_other_secret_fails() {
        let other = TokenService::new("another-secret", Duration::hours(1));
        let token = other.issue(1).unwrap();
        assert!(matches!(service().validate(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn configured_lifetime_is_capped() {
        let mut security = crate::config::AppConfig::testing().security;
        security.jwt_expiry_hours = u64::MAX;
        let tokens = TokenService::from_config(&security);
        assert_eq!(tokens.expires_in(), MAX_JWT_EXPIRY_HOURS as i64 * 3600);
    }

    #[test]
    fn garbage_fails() {
        assert!(matches!(service().validate("not.a.jwt"), Err(TokenError::Invalid(_))));
        assert!(matches!(service().validate(""), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn non_numeric_subject_fails() {
        let tokens = service();
        let claims = Claims {
            sub: "alice".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = tokens.encode_claims(&claims).unwrap();
        assert!(matches!(tokens.validate(&token), Err(TokenError::Invalid(_))));
    }
}
