use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::controllers::alert_controller::AlertController;
use crate::dto::{CreateAlertRequest, DeleteResponse, UpdateAlertRequest};
use crate::middleware::{authorize_write, SessionCookies};
use crate::models::{Alert, AlertFilters};
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::{JsonBody, PathParam, QueryParams};

pub fn create_alert_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts).post(create_alert))
        .route("/:id", get(get_alert).put(update_alert).delete(delete_alert))
}

async fn list_alerts(
    State(state): State<AppState>,
    QueryParams(filters): QueryParams<AlertFilters>,
) -> AppResult<Json<Vec<Alert>>> {
    let controller = AlertController::new(state.alerts.clone());
    Ok(Json(controller.list(&filters).await?))
}

async fn get_alert(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<Alert>> {
    let controller = AlertController::new(state.alerts.clone());
    Ok(Json(controller.get(id).await?))
}

async fn create_alert(
    State(state): State<AppState>,
    cookies: SessionCookies,
    JsonBody(request): JsonBody<CreateAlertRequest>,
) -> AppResult<Json<Alert>> {
    authorize_write(&state, &cookies, "manage_alerts").await?;
    let controller = AlertController::new(state.alerts.clone());
    Ok(Json(controller.create(request).await?))
}

async fn update_alert(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    cookies: SessionCookies,
    JsonBody(request): JsonBody<UpdateAlertRequest>,
) -> AppResult<Json<Alert>> {
    authorize_write(&state, &cookies, "manage_alerts").await?;
    let controller = AlertController::new(state.alerts.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_alert(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    cookies: SessionCookies,
) -> AppResult<Json<DeleteResponse>> {
    authorize_write(&state, &cookies, "manage_alerts").await?;
    let controller = AlertController::new(state.alerts.clone());
    Ok(Json(controller.delete(id).await?))
}
