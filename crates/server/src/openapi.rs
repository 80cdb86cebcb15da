use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub username: String, pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct TokenResponse { pub token: String }

#[derive(ToSchema)]
pub struct UserResponse { pub id: String, pub name: String, pub email: String }

/// Body for create and update. Times are RFC 3339.
#[derive(ToSchema)]
pub struct FlightRequest {
    pub name: String,
    pub number: String,
    pub departure: String,
    pub departure_time: String,
    pub destination: String,
    pub arrival_time: String,
    pub fare: String,
}

#[derive(ToSchema)]
pub struct FlightResponse {
    pub id: String,
    pub name: String,
    pub number: String,
    pub departure: String,
    pub departure_time: String,
    pub destination: String,
    pub arrival_time: String,
    pub fare: String,
    pub duration: String,
    pub created_at: String,
    pub updated_at: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::flights::list,
        crate::routes::flights::get,
        crate::routes::flights::create,
        crate::routes::flights::update,
        crate::routes::flights::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            FlightRequest,
            FlightResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "flights")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_flight_routes_and_bearer_scheme() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc.pointer("/paths/~1v1~1flights~1{id}").is_some());
        assert!(doc.pointer("/paths/~1v1~1login").is_some());
        assert!(doc.pointer("/components/securitySchemes/bearerAuth").is_some());
    }
}
