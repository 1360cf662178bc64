use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::middleware::auth::{cleared_cookies, session_cookies};
use crate::middleware::{CurrentUser, SessionCookies};
use crate::models::auth::{LoginRequest, LoginResponse, PermissionCheckResponse, PermissionsResponse};
use crate::models::User;
use crate::services::auth_service::INVALID_CREDENTIALS;
use crate::services::authorization_service::{has_permission, permissions_for};
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::JsonBody;

/// Sign in. Sets the session cookies on success.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> AppResult<Response> {
    let Some((user, session)) = state.auth.login(&request.username, &request.password).await?
    else {
        let body = LoginResponse {
            success: false,
            user: None,
            expires_at: None,
            error: Some(INVALID_CREDENTIALS.to_string()),
        };
        return Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response());
    };

    let [token_cookie, user_cookie] = session_cookies(
        &session.token,
        &user.id,
        state.auth.session_ttl(),
        state.config.cookie_secure,
    )?;

    let body = LoginResponse {
        success: true,
        user: Some(user),
        expires_at: Some(session.expires_at),
        error: None,
    };
    Ok((
        AppendHeaders([(SET_COOKIE, token_cookie), (SET_COOKIE, user_cookie)]),
        Json(body),
    )
        .into_response())
}

/// Sign out. Always succeeds and always clears the cookies.
pub async fn logout(State(state): State<AppState>, cookies: SessionCookies) -> AppResult<Response> {
    if let Some(token) = &cookies.auth_token {
        state.auth.logout(token).await;
    }
    let [token_cookie, user_cookie] = cleared_cookies(state.config.cookie_secure)?;
    Ok((
        AppendHeaders([(SET_COOKIE, token_cookie), (SET_COOKIE, user_cookie)]),
        Json(json!({ "success": true })),
    )
        .into_response())
}

/// The signed-in user
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

pub async fn permissions(CurrentUser(user): CurrentUser) -> Json<PermissionsResponse> {
    Json(PermissionsResponse {
        role: user.role,
        permissions: permissions_for(user.role)
            .iter()
            .map(|p| p.to_string())
            .collect(),
    })
}

pub async fn check_permission(
    CurrentUser(user): CurrentUser,
    Path(permission): Path<String>,
) -> Json<PermissionCheckResponse> {
    let allowed = has_permission(user.role, &permission);
    Json(PermissionCheckResponse { permission, allowed })
}

/// Children of a parent
pub async fn list_children(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(parent_id): Path<String>,
) -> AppResult<Json<Vec<User>>> {
    let children = state.auth.children_of(&user, &parent_id).await?;
    Ok(Json(children))
}
