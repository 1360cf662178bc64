//! In-memory table shared by the memory repositories

use tokio::sync::RwLock;

/// Rows addressed by an integer id
pub trait Keyed {
    fn key(&self) -> i32;
}

impl Keyed for crate::models::Route {
    fn key(&self) -> i32 {
        self.id
    }
}

impl Keyed for crate::models::Alert {
    fn key(&self) -> i32 {
        self.id
    }
}

impl Keyed for crate::models::Schedule {
    fn key(&self) -> i32 {
        self.id
    }
}

struct Rows<T> {
    next_id: i32,
    items: Vec<T>,
}

/// A table of rows with sequential ids, like a `SERIAL` column
pub struct MemoryTable<T> {
    rows: RwLock<Rows<T>>,
}

impl<T: Keyed + Clone> MemoryTable<T> {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(items: Vec<T>) -> Self {
        let next_id = items.iter().map(Keyed::key).max().unwrap_or(0) + 1;
        Self {
            rows: RwLock::new(Rows { next_id, items }),
        }
    }

    pub async fn all(&self) -> Vec<T> {
        self.rows.read().await.items.clone()
    }

    pub async fn get(&self, id: i32) -> Option<T> {
        self.rows.read().await.items.iter().find(|r| r.key() == id).cloned()
    }

    /// Assign the next id and store the row built from it
    pub async fn insert(&self, build: impl FnOnce(i32) -> T) -> T {
        let mut rows = self.rows.write().await;
        let id = rows.next_id;
        rows.next_id += 1;
        let row = build(id);
        rows.items.push(row.clone());
        row
    }

    pub async fn modify(&self, id: i32, change: impl FnOnce(&mut T)) -> Option<T> {
        let mut rows = self.rows.write().await;
        let row = rows.items.iter_mut().find(|r| r.key() == id)?;
        change(row);
        Some(row.clone())
    }

    pub async fn remove(&self, id: i32) -> bool {
        let mut rows = self.rows.write().await;
        let before = rows.items.len();
        rows.items.retain(|r| r.key() != id);
        rows.items.len() != before
    }
}

impl<T: Keyed + Clone> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
