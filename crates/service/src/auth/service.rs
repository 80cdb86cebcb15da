use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, Identity, LoginInput, RegisterInput, User};
use super::errors::AuthError;
use super::password::{self, HashCost};
use super::repository::UserStore;
use super::token::{self, Claims};
use crate::errors::StoreError;
use crate::validation;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_lifetime: Duration,
    pub hash_cost: HashCost,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_hours: i64) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_lifetime: Duration::hours(token_hours), hash_cost: HashCost::default() }
    }
}

impl From<&configs::AuthSettings> for AuthConfig {
    fn from(s: &configs::AuthSettings) -> Self {
        Self {
            jwt_secret: s.jwt_signing_key.clone(),
            token_lifetime: Duration::hours(s.jwt_expiration_hours),
            hash_cost: HashCost {
                memory_kib: s.hash_memory_kib,
                iterations: s.hash_iterations,
                parallelism: s.hash_parallelism,
            },
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: UserStore + ?Sized> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: UserStore + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthService, repository::mock::MockUserStore};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserStore::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret", 72));
    /// let input = RegisterInput { name: "demo".into(), email: "demo@example.com".into(), password: "pass".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.name, "demo");
    /// ```
    #[instrument(skip_all, fields(user = %input.name))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        validation::check(&input)?;

        let id = Uuid::new_v4().to_string();
        let password_hash = password::hash_password(&input.password, self.cfg.hash_cost).map_err(AuthError::HashError)?;
        let user = User { identity: Identity::new(id.clone(), input.name), email: input.email, password_hash };

        match self.repo.insert(user).await {
            Ok(()) => {}
            Err(StoreError::Conflict(detail)) => {
                debug!(%detail, "user exists");
                return Err(AuthError::Conflict);
            }
            Err(e) => return Err(e.into()),
        }

        let user = self.get_user(&id).await?;
        info!(user_id = %user.id, "user_registered");
        Ok(user)
    }

    /// Resolve credentials to an identity.
    ///
    /// `None` for an unknown name and for a wrong password alike; the reason
    /// is only logged. Store failures other than "not found" are returned.
    #[instrument(skip_all, fields(user = %name))]
    pub async fn authenticate(&self, name: &str, password: &str) -> Result<Option<Identity>, AuthError> {
        let Some(user) = self.repo.get_by_name(name).await? else {
            info!("user not found");
            return Ok(None);
        };
        match password::verify_password(password, &user.password_hash) {
            Ok(true) => {
                info!("authentication successful");
                Ok(Some(user.identity))
            }
            Ok(false) => {
                info!("authentication failed");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "stored password hash unreadable");
                Ok(None)
            }
        }
    }

    /// Authenticate a user and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthService, repository::mock::MockUserStore};
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserStore::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret", 72));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "demo".into(), email: "d@e.com".into(), password: "pass".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { name: "demo".into(), password: "pass".into() })).unwrap();
    /// assert_eq!(session.identity.name(), "demo");
    /// assert!(!session.token.is_empty());
    /// ```
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let identity = self
            .authenticate(&input.name, &input.password)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        self.issue_token(identity)
    }

    /// Sign a token for `identity`, valid for the configured lifetime from now.
    pub fn issue_token(&self, identity: Identity) -> Result<AuthSession, AuthError> {
        let issued_at = Utc::now();
        let claims = Claims::new(&identity, issued_at, self.cfg.token_lifetime);
        let token = token::sign(&claims, &self.cfg.jwt_secret).map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(AuthSession { identity, token, expires_at: issued_at + self.cfg.token_lifetime })
    }

    /// Check signature and expiry of a token issued by this service.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        token::verify(token, &self.cfg.jwt_secret).map_err(|e| {
            debug!(error = %e, "token rejected");
            AuthError::Unauthorized
        })
    }

    /// Public view of the user with `id`; `NotFound` when absent.
    pub async fn get_user(&self, id: &str) -> Result<AuthUser, AuthError> {
        let user = self.repo.get_by_id(id).await?.ok_or(AuthError::NotFound)?;
        Ok(AuthUser::from(&user))
    }
}
