use axum::{routing::get, Router};

use crate::controllers::auth_controller::list_children;
use crate::state::AppState;

pub fn create_user_router() -> Router<AppState> {
    Router::new().route("/:id/children", get(list_children))
}
