use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::controllers::schedule_controller::ScheduleController;
use crate::dto::{CreateScheduleRequest, DeleteResponse, UpdateScheduleRequest};
use crate::middleware::{authorize_write, SessionCookies};
use crate::models::{Schedule, ScheduleFilters};
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::{JsonBody, PathParam, QueryParams};

pub fn create_schedule_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules).post(create_schedule))
        .route(
            "/:id",
            get(get_schedule).put(update_schedule).delete(delete_schedule),
        )
}

async fn list_schedules(
    State(state): State<AppState>,
    QueryParams(filters): QueryParams<ScheduleFilters>,
) -> AppResult<Json<Vec<Schedule>>> {
    let controller = ScheduleController::new(state.schedules.clone());
    Ok(Json(controller.list(&filters).await?))
}

async fn get_schedule(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<Schedule>> {
    let controller = ScheduleController::new(state.schedules.clone());
    Ok(Json(controller.get(id).await?))
}

async fn create_schedule(
    State(state): State<AppState>,
    cookies: SessionCookies,
    JsonBody(request): JsonBody<CreateScheduleRequest>,
) -> AppResult<Json<Schedule>> {
    authorize_write(&state, &cookies, "manage_schedules").await?;
    let controller = ScheduleController::new(state.schedules.clone());
    Ok(Json(controller.create(request).await?))
}

async fn update_schedule(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    cookies: SessionCookies,
    JsonBody(request): JsonBody<UpdateScheduleRequest>,
) -> AppResult<Json<Schedule>> {
    authorize_write(&state, &cookies, "manage_schedules").await?;
    let controller = ScheduleController::new(state.schedules.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_schedule(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    cookies: SessionCookies,
) -> AppResult<Json<DeleteResponse>> {
    authorize_write(&state, &cookies, "manage_schedules").await?;
    let controller = ScheduleController::new(state.schedules.clone());
    Ok(Json(controller.delete(id).await?))
}
