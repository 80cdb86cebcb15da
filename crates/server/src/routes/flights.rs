use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use service::flight::domain::{Flight, FlightInput, SearchFilter};
use service::pagination::{Page, Pagination};

use crate::{errors::JsonApiError, routes::auth::ServerState};

/// Query string for `GET /v1/flights`. Values that do not parse are
/// ignored rather than rejected.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub name: Option<String>,
    pub departure: Option<String>,
    pub destination: Option<String>,
    /// Departure day, `YYYY-MM-DD`.
    pub departure_time: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListQuery {
    pub fn filter(&self) -> SearchFilter {
        SearchFilter {
            name: self.name.clone(),
            departure: self.departure.clone(),
            destination: self.destination.clone(),
            departure_date: self
                .departure_time
                .as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()),
        }
    }

    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        let num = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<u32>().ok());
        Pagination {
            page: num(&self.page).unwrap_or(defaults.page),
            per_page: num(&self.per_page).unwrap_or(defaults.per_page),
        }
    }
}

#[utoipa::path(
    get, path = "/v1/flights", tag = "flights",
    params(ListQuery),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Page of flights"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Query Failed")
    )
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<ListQuery>) -> Result<Json<Page<Flight>>, JsonApiError> {
    let pagination = q.pagination();
    let (offset, limit) = pagination.offset_limit();
    let total = state.flights.count().await?;
    let items = state.flights.query(q.filter(), offset, limit).await?;
    info!(count = items.len(), total, "list flights");
    Ok(Json(Page::new(pagination, total, items)))
}

#[utoipa::path(
    get, path = "/v1/flights/{id}", tag = "flights",
    params(("id" = String, Path, description = "Flight id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Flight", body = crate::openapi::FlightResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Flight>, JsonApiError> {
    Ok(Json(state.flights.get(&id).await?))
}

#[utoipa::path(
    post, path = "/v1/flights", tag = "flights",
    request_body = crate::openapi::FlightRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Created", body = crate::openapi::FlightResponse),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<FlightInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Flight>), JsonApiError> {
    let Json(input) = payload?;
    let flight = state.flights.create(input).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

#[utoipa::path(
    put, path = "/v1/flights/{id}", tag = "flights",
    params(("id" = String, Path, description = "Flight id")),
    request_body = crate::openapi::FlightRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::FlightResponse),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<FlightInput>, JsonRejection>,
) -> Result<Json<Flight>, JsonApiError> {
    let Json(input) = payload?;
    Ok(Json(state.flights.update(&id, input).await?))
}

#[utoipa::path(
    delete, path = "/v1/flights/{id}", tag = "flights",
    params(("id" = String, Path, description = "Flight id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::FlightResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Flight>, JsonApiError> {
    Ok(Json(state.flights.delete(&id).await?))
}
