use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::{debug, warn};

use service::auth::domain::{AuthUser, Identity, LoginInput, RegisterInput};
use service::auth::repository::UserStore;
use service::auth::{AuthConfig, AuthService};
use service::flight::repository::FlightStore;
use service::flight::FlightService;

use crate::errors::JsonApiError;

pub const AUTH_COOKIE: &str = "auth_token";

/// Shared handler state. Stores sit behind trait objects so the same router
/// runs over SQL in production and in-memory stores in tests.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn UserStore>>,
    pub flights: Arc<FlightService<dyn FlightStore>>,
}

impl ServerState {
    pub fn new(users: Arc<dyn UserStore>, flights: Arc<dyn FlightStore>, auth: AuthConfig) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users, auth)),
            flights: Arc::new(FlightService::new(flights)),
        }
    }
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub token: String,
}

#[utoipa::path(post, path = "/v1/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered", body = crate::openapi::UserResponse), (status = 400, description = "Validation Error"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthUser>), JsonApiError> {
    let Json(input) = payload?;
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(post, path = "/v1/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In", body = crate::openapi::TokenResponse), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let Json(input) = payload?;
    let session = state.auth.login(input).await?;

    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(LoginOutput { token: session.token })))
}

#[utoipa::path(get, path = "/v1/me", tag = "auth", security(("bearerAuth" = [])), responses((status = 200, description = "Current user", body = crate::openapi::UserResponse), (status = 401, description = "Unauthorized")))]
pub async fn me(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<AuthUser>, JsonApiError> {
    Ok(Json(state.auth.get_user(identity.id()).await?))
}

/// Pull the token from `Authorization: Bearer <token>`, falling back to the
/// `auth_token` cookie.
fn extract_token(req: &Request) -> Option<String> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION) {
        let value = h.to_str().ok()?;
        return value.strip_prefix("Bearer ").map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    }
    let jar = CookieJar::from_headers(req.headers());
    jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty())
}

/// Reject requests without a valid token; on success the caller's
/// [`Identity`] is available to handlers as an extension.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let Some(token) = extract_token(&req) else {
        warn!(path = %path, "missing or malformed credentials");
        return Err(JsonApiError::unauthorized());
    };
    let claims = state.auth.verify_token(&token).map_err(|e| {
        warn!(path = %path, error = %e, "token validation failed");
        JsonApiError::unauthorized()
    })?;
    let identity = claims.identity();
    debug!(path = %path, user_id = %identity.id(), "request authenticated");
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
