use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::auth_controller::{check_permission, login, logout, me, permissions};
use crate::state::AppState;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/permissions", get(permissions))
        .route("/permissions/:permission", get(check_permission))
}
