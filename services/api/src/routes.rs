//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, require_admin, require_user},
    models::{
        CreateActorRequest, CreateFilmRequest, FilmSearchQuery, ListFilmsQuery, ListResponse,
        UpdateActorRequest, UpdateFilmRequest,
    },
    validation,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/actors", get(list_actors))
        .route("/films", get(list_films))
        .route("/films/search", get(search_films))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let admin_routes = Router::new()
        .route("/actors", post(create_actor))
        .route("/actors/:id", patch(update_actor).delete(delete_actor))
        .route("/films", post(create_film))
        .route("/films/:id", patch(update_film).delete(delete_film))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health_check))
        .merge(user_routes)
        .merge(admin_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// List actors with their films
pub async fn list_actors(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let actors = state.actors.list().await?;
    Ok(Json(ListResponse::from(actors)))
}

/// Create a new actor
pub async fn create_actor(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateActorRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let actor =
        validation::new_actor(payload, Utc::now().date_naive()).map_err(ApiError::BadRequest)?;
    let actor = state.actors.create(&actor).await?;

    info!("User {} created actor {}", user.user_id, actor.actor_id);
    Ok((StatusCode::CREATED, Json(actor)))
}

/// Partially update an actor
pub async fn update_actor(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateActorRequest>, ApiError>,
) -> ApiResult<StatusCode> {
    let changes =
        validation::actor_changes(payload, Utc::now().date_naive()).map_err(ApiError::BadRequest)?;

    if !state.actors.update(id, &changes).await? {
        return Err(ApiError::NotFound("Actor not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an actor
pub async fn delete_actor(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<StatusCode> {
    if !state.actors.delete(id).await? {
        return Err(ApiError::NotFound("Actor not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// List films with their actors
pub async fn list_films(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ListFilmsQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let films = state.films.list(query.sort_by, query.order).await?;
    Ok(Json(ListResponse::from(films)))
}

/// Create a new film
pub async fn create_film(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateFilmRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let film = validation::new_film(payload).map_err(ApiError::BadRequest)?;
    let film = state.films.create(&film).await?;

    info!("User {} created film {}", user.user_id, film.film_id);
    Ok((StatusCode::CREATED, Json(film)))
}

/// Partially update a film
pub async fn update_film(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateFilmRequest>, ApiError>,
) -> ApiResult<StatusCode> {
    let changes = validation::film_changes(payload).map_err(ApiError::BadRequest)?;

    if !state.films.update(id, &changes).await? {
        return Err(ApiError::NotFound("Film not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a film
pub async fn delete_film(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<StatusCode> {
    if !state.films.delete(id).await? {
        return Err(ApiError::NotFound("Film not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Search films by name or actor name fragment
pub async fn search_films(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<FilmSearchQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let search = validation::film_search(query).map_err(ApiError::BadRequest)?;
    let films = state.films.search(&search).await?;
    Ok(Json(ListResponse::from(films)))
}
