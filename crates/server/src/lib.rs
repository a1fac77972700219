//! Mock REST backend for the hero registry.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::{Hero, HeroId, NewHero},
    error::{ApiError, ErrorCode},
    protocol::{HeroQuery, HEALTH_ROUTE, HEROES_ROUTE, HERO_BY_ID_ROUTE, RESET_ROUTE},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::warn;

pub mod api;
pub mod app_state;
pub mod config;

pub use api::ApiContext;
pub use app_state::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

type HttpError = (StatusCode, Json<ApiError>);

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .route(
            HEROES_ROUTE,
            get(http_list_heroes)
                .post(http_create_hero)
                .put(http_update_hero),
        )
        .route(
            HERO_BY_ID_ROUTE,
            get(http_get_hero).delete(http_delete_hero),
        )
        .route(RESET_ROUTE, post(http_reset))
        .fallback(http_unknown_route)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    state
        .api
        .store
        .health_check()
        .await
        .map_err(|e| to_http(ApiError::internal(e.to_string())))?;
    Ok("ok")
}

async fn http_list_heroes(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HeroQuery>, QueryRejection>,
) -> Result<Json<Vec<Hero>>, HttpError> {
    let Query(q) = query.map_err(|r| rejected(r.status(), r.body_text()))?;
    let heroes = api::list_heroes(&state.api, q.name.as_deref())
        .await
        .map_err(to_http)?;
    Ok(Json(heroes))
}

async fn http_get_hero(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Hero>, HttpError> {
    let id = hero_id(id)?;
    let hero = api::get_hero(&state.api, id)
        .await
        .map_err(to_http)?;
    Ok(Json(hero))
}

async fn http_create_hero(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewHero>, JsonRejection>,
) -> Result<(StatusCode, Json<Hero>), HttpError> {
    let Json(new_hero) = json_body(body)?;
    let hero = api::create_hero(&state.api, new_hero)
        .await
        .map_err(to_http)?;
    Ok((StatusCode::CREATED, Json(hero)))
}

async fn http_update_hero(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Hero>, JsonRejection>,
) -> Result<StatusCode, HttpError> {
    let Json(hero) = json_body(body)?;
    api::update_hero(&state.api, hero).await.map_err(to_http)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn http_delete_hero(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, HttpError> {
    api::delete_hero(&state.api, hero_id(id)?)
        .await
        .map_err(to_http)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn http_reset(State(state): State<Arc<AppState>>) -> Result<StatusCode, HttpError> {
    api::reset_heroes(&state.api).await.map_err(to_http)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn http_unknown_route(uri: Uri) -> HttpError {
    to_http(ApiError::not_found(format!("no route for {}", uri.path())))
}

fn hero_id(id: Result<Path<i64>, PathRejection>) -> Result<HeroId, HttpError> {
    let Path(id) = id.map_err(|r| rejected(r.status(), r.body_text()))?;
    Ok(HeroId(id))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<Json<T>, HttpError> {
    body.map_err(|r| rejected(r.status(), r.body_text()))
}

/// Extractor failures keep their status but carry an [`ApiError`] body.
fn rejected(status: StatusCode, message: String) -> HttpError {
    (status, Json(ApiError::validation(message)))
}

fn to_http(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(error = %err.message, "hero request failed");
    }
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
