//! HS256 session tokens.
//!
//! A token is a compact JWS carrying `{id, name, iat, exp}`; `exp` is always
//! `iat + lifetime`. Verification checks the signature and expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::domain::Identity;

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub name: String,
    /// Issued-at (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration (UTC Unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn new(identity: &Identity, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            id: identity.id().to_string(),
            name: identity.name().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.id.clone(), self.name.clone())
    }
}

pub fn sign(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
}

/// Decode `token`, rejecting it as soon as `exp` has passed.
pub fn verify(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> Identity { Identity::new("100", "demo") }

    #[test]
    fn sign_and_verify_round_trip_keeps_identity() {
        let claims = Claims::new(&demo(), Utc::now(), Duration::hours(2));
        let token = sign(&claims, "test").unwrap();
        assert_eq!(token.split('.').count(), 3);
        let back = verify(&token, "test").unwrap();
        assert_eq!(back.identity(), demo());
        assert_eq!(back.exp - back.iat, 2 * 3600);
    }

    #[test]
    fn other_secret_fails() {
        let claims = Claims::new(&demo(), Utc::now(), Duration::hours(1));
        let token = sign(&claims, "secret-alpha").unwrap();
        assert!(verify(&token, "secret-bravo").is_err());
    }

    #[test]
    fn expired_token_fails() {
        let issued = Utc::now() - Duration::hours(3);
        let claims = Claims::new(&demo(), issued, Duration::hours(1));
        let token = sign(&claims, "test").unwrap();
        assert!(verify(&token, "test").is_err());
    }

    #[test]
    fn token_expired_seconds_ago_fails() {
        // exp = now - 30s
        let claims = Claims::new(&demo(), Utc::now() - Duration::seconds(90), Duration::seconds(60));
        let token = sign(&claims, "test").unwrap();
        assert!(verify(&token, "test").is_err());
    }

    #[test]
    fn tampered_token_fails() {
        let claims = Claims::new(&demo(), Utc::now(), Duration::hours(1));
        let mut token = sign(&claims, "test").unwrap();
        token.push('x');
        assert!(verify(&token, "test").is_err());
    }
}
