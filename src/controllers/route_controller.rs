use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::database::seed::demo_routes;
use crate::dto::{CreateRouteRequest, DeleteResponse, UpdateRouteRequest};
use crate::models::Route;
use crate::repositories::RouteRepository;
use crate::utils::errors::{AppError, AppResult, StoreResultExt};

pub struct RouteController {
    repository: Arc<dyn RouteRepository>,
}

impl RouteController {
    pub fn new(repository: Arc<dyn RouteRepository>) -> Self {
        Self { repository }
    }

    /// All routes. The only read that never fails: if the store cannot be
    /// read the fixed demo routes are served instead.
    pub async fn list(&self) -> Vec<Route> {
        match self.repository.list().await {
            Ok(routes) => routes,
            Err(e) => {
                warn!("⚠️ Could not load routes, serving demo data: {}", e);
                demo_routes()
            }
        }
    }

    pub async fn get(&self, id: i32) -> AppResult<Route> {
        self.repository
            .find_by_id(id)
            .await
            .or_fail("Failed to load route")?
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))
    }

    pub async fn create(&self, request: CreateRouteRequest) -> AppResult<Route> {
        let route = request.into_new_route()?;
        let created = self
            .repository
            .create(route)
            .await
            .or_fail("Failed to create route")?;
        info!("🚌 Route {} created with id {}", created.number, created.id);
        Ok(created)
    }

    pub async fn update(&self, id: i32, request: UpdateRouteRequest) -> AppResult<Route> {
        request.validate()?;
        self.repository
            .update(id, request)
            .await
            .or_fail("Failed to update route")?
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))
    }

    pub async fn delete(&self, id: i32) -> AppResult<DeleteResponse> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .or_fail("Failed to delete route")?;
        if !deleted {
            return Err(AppError::NotFound("Route not found".to_string()));
        }
        info!("🗑️ Route {} deleted", id);
        Ok(DeleteResponse::deleted(id))
    }
}
