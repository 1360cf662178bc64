use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::dto::{CreateRouteRequest, DeleteResponse, UpdateRouteRequest};
use crate::middleware::{authorize_write, SessionCookies};
use crate::models::Route;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::{JsonBody, PathParam};

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes).post(create_route))
        .route("/:id", get(get_route).put(update_route).delete(delete_route))
}

async fn list_routes(State(state): State<AppState>) -> Json<Vec<Route>> {
    let controller = RouteController::new(state.routes.clone());
    Json(controller.list().await)
}

async fn get_route(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<Route>> {
    let controller = RouteController::new(state.routes.clone());
    Ok(Json(controller.get(id).await?))
}

async fn create_route(
    State(state): State<AppState>,
    cookies: SessionCookies,
    JsonBody(request): JsonBody<CreateRouteRequest>,
) -> AppResult<Json<Route>> {
    authorize_write(&state, &cookies, "manage_routes").await?;
    let controller = RouteController::new(state.routes.clone());
    Ok(Json(controller.create(request).await?))
}

async fn update_route(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    cookies: SessionCookies,
    JsonBody(request): JsonBody<UpdateRouteRequest>,
) -> AppResult<Json<Route>> {
    authorize_write(&state, &cookies, "manage_routes").await?;
    let controller = RouteController::new(state.routes.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_route(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    cookies: SessionCookies,
) -> AppResult<Json<DeleteResponse>> {
    authorize_write(&state, &cookies, "manage_routes").await?;
    let controller = RouteController::new(state.routes.clone());
    Ok(Json(controller.delete(id).await?))
}
