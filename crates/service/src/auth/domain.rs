use serde::{Deserialize, Serialize};
use validator::Validate;

/// Minimal `{id, name}` view of a user, used for token issuance and
/// authorization checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: String,
    name: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }

    pub fn id(&self) -> &str { &self.id }

    pub fn name(&self) -> &str { &self.name }
}

/// Stored user record. Carries the password hash, so it is never
/// serialized outward; use [`AuthUser`] for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub identity: Identity,
    pub email: String,
    pub password_hash: String,
}

impl User {
    pub fn id(&self) -> &str { self.identity.id() }

    pub fn name(&self) -> &str { self.identity.name() }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for AuthUser {
    fn from(u: &User) -> Self {
        Self { id: u.id().to_string(), name: u.name().to_string(), email: u.email.clone() }
    }
}

/// Registration input
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterInput {
    #[serde(default, alias = "username")]
    #[validate(length(min = 1, max = 20))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(alias = "username")]
    pub name: String,
    pub password: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub identity: Identity,
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}
