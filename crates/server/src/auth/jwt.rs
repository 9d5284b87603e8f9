use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared_types::Identity;

use crate::config::IdentityConfig;

/// Claims carried by the identity provider's session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Provider user id.
    pub sub: String,
    #[serde(default)]
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity::new(self.sub.clone(), self.email.clone())
    }
}

/// Verify a session token against the configured secret and issuer.
pub fn validate_session_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let config = IdentityConfig::from_env();
    let Some(secret) = config.jwt_secret.as_deref() else {
        tracing::error!("IDENTITY_JWT_SECRET is not set; rejecting session token");
        return Err(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into());
    };
    validate_with(token, secret, config.issuer.as_deref())
}

/// Verify an HS256 session token with an explicit secret. `exp` is always
/// enforced; `iss` only when `issuer` is given.
pub fn validate_with(
    token: &str,
    secret: &str,
    issuer: Option<&str>,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    if let Some(issuer) = issuer {
        validation.set_issuer(&[issuer]);
    }
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    if data.claims.sub.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }
    Ok(data.claims)
}

/// Sign a session token the way the provider does. Used by local tooling
/// and tests; production tokens come from the provider.
pub fn create_session_token(
    identity: &Identity,
    secret: &str,
    issuer: Option<&str>,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: identity.id.clone(),
        email: identity.email.clone(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        iss: issuer.map(str::to_string),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-for-session-tokens";

    fn ana() -> Identity {
        Identity::new("user_ana", "ana@example.com")
    }

    #[test]
    fn create_and_validate_round_trip() {
        let token = create_session_token(&ana(), SECRET, None, Duration::minutes(5)).unwrap();
        let claims = validate_with(&token, SECRET, None).unwrap();
        assert_eq!(claims.sub, "user_ana");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.identity(), ana());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = create_session_token(&ana(), SECRET, None, Duration::minutes(5)).unwrap();
        assert!(validate_with(&token, "another-secret", None).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let token = create_session_token(&ana(), SECRET, None, Duration::hours(-2)).unwrap();
        assert!(validate_with(&token, SECRET, None).is_err());
    }

    #[test]
    fn issuer_enforced_when_configured() {
        let token = create_session_token(
            &ana(),
            SECRET,
            Some("https://clerk.example.com"),
            Duration::minutes(5),
        )
        .unwrap();
        assert!(validate_with(&token, SECRET, Some("https://clerk.example.com")).is_ok());
        assert!(validate_with(&token, SECRET, Some("https://evil.example.com")).is_err());
        assert!(validate_with(&token, SECRET, None).is_ok());
    }

    #[test]
    fn empty_subject_rejected() {
        let token = create_session_token(
            &Identity::new("", "ghost@example.com"),
            SECRET,
            None,
            Duration::minutes(5),
        )
        .unwrap();
        assert!(validate_with(&token, SECRET, None).is_err());
    }

    #[test]
    fn garbage_rejected() {
        assert!(validate_with("not.a.jwt", SECRET, None).is_err());
        assert!(validate_with("", SECRET, None).is_err());
    }
}
