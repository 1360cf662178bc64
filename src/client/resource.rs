//! Resource data hooks
//!
//! A [`ResourceClient`] holds one list of records and its load state. Writes
//! go to the server first and, once it answers, the returned record is
//! spliced into the local list without a re-fetch. Concurrent editors are
//! not reconciled: whatever the server returned last is what is shown.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tracing::warn;

use super::api_client::ApiClient;
use super::error::ClientError;
use crate::dto::{
    CreateAlertRequest, CreateRouteRequest, CreateScheduleRequest, DeleteResponse,
};
use crate::models::{Alert, AlertChanges, Route, RouteChanges, Schedule, ScheduleChanges};

/// A record type served under a collection path
pub trait Resource: Clone + DeserializeOwned + Send + Sync + 'static {
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;

    /// Collection path, e.g. `/api/routes`
    const PATH: &'static str;

    fn id(&self) -> i32;
}

impl Resource for Route {
    type Create = CreateRouteRequest;
    type Update = RouteChanges;
    const PATH: &'static str = "/api/routes";

    fn id(&self) -> i32 {
        self.id
    }
}

impl Resource for Alert {
    type Create = CreateAlertRequest;
    type Update = AlertChanges;
    const PATH: &'static str = "/api/alerts";

    fn id(&self) -> i32 {
        self.id
    }
}

impl Resource for Schedule {
    type Create = CreateScheduleRequest;
    type Update = ScheduleChanges;
    const PATH: &'static str = "/api/schedules";

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<R> {
    Idle,
    Loading,
    Ready(Vec<R>),
    Error(String),
}

impl<R> LoadState<R> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Local view of one resource collection
#[derive(Clone)]
pub struct ResourceClient<R: Resource> {
    api: ApiClient,
    state: Arc<watch::Sender<LoadState<R>>>,
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            api,
            state: Arc::new(state),
        }
    }

    /// Current state
    pub fn state(&self) -> LoadState<R> {
        self.state.borrow().clone()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<LoadState<R>> {
        self.state.subscribe()
    }

    /// The loaded records; empty until a load succeeds
    pub fn items(&self) -> Vec<R> {
        match &*self.state.borrow() {
            LoadState::Ready(items) => items.clone(),
            _ => Vec::new(),
        }
    }

    pub fn error(&self) -> Option<String> {
        match &*self.state.borrow() {
            LoadState::Error(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Fetch the whole collection once
    pub async fn load(&self) -> Result<Vec<R>, ClientError> {
        self.state.send_replace(LoadState::Loading);
        match self.api.get::<Vec<R>>(R::PATH).await {
            Ok(items) => {
                self.state.send_replace(LoadState::Ready(items.clone()));
                Ok(items)
            }
            Err(e) => {
                warn!("⚠️ Loading {} failed: {}", R::PATH, e);
                self.state.send_replace(LoadState::Error(e.message()));
                Err(e)
            }
        }
    }

    /// Create a record and append it locally
    pub async fn add(&self, record: &R::Create) -> Result<R, ClientError> {
        let created: R = self.api.post(R::PATH, record).await?;
        self.state.send_modify(|state| {
            if let LoadState::Ready(items) = state {
                items.push(created.clone());
            }
        });
        Ok(created)
    }

    /// Send a partial update and replace the local copy with the result
    pub async fn update(&self, id: i32, changes: &R::Update) -> Result<R, ClientError> {
        let path = format!("{}/{}", R::PATH, id);
        let updated: R = self.api.put(&path, changes).await?;
        self.state.send_modify(|state| {
            if let LoadState::Ready(items) = state {
                if let Some(item) = items.iter_mut().find(|item| item.id() == id) {
                    *item = updated.clone();
                }
            }
        });
        Ok(updated)
    }

    /// Delete a record and drop it locally
    pub async fn remove(&self, id: i32) -> Result<(), ClientError> {
        let path = format!("{}/{}", R::PATH, id);
        let _: DeleteResponse = self.api.delete(&path).await?;
        self.state.send_modify(|state| {
            if let LoadState::Ready(items) = state {
                items.retain(|item| item.id() != id);
            }
        });
        Ok(())
    }
}
