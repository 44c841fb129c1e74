//! In-process `LinkStore` doubles for handler tests.
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::error::{StoreError, StoreResult};
use super::link_repo::{LinkRow, LinkStore, NewLink};

#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    rows: Mutex<Vec<LinkRow>>,
}

impl MemoryLinkStore {
    pub fn with_rows(rows: Vec<LinkRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub fn rows(&self) -> Vec<LinkRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<LinkRow>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, link: NewLink) -> StoreResult<Vec<LinkRow>> {
        let row = LinkRow {
            id: Uuid::new_v4(),
            user_id: link.user_id,
            title: link.title,
            url: link.url,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(vec![row])
    }
}

/// Fails every call and counts how often it was reached.
#[derive(Debug, Default)]
pub struct FailingLinkStore {
    calls: AtomicUsize,
}

impl FailingLinkStore {
    pub const MESSAGE: &'static str = "connection to store refused";

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> StoreResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Backend(Self::MESSAGE.to_string()))
    }
}

#[async_trait]
impl LinkStore for FailingLinkStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn list_for_user(&self, _user_id: &str) -> StoreResult<Vec<LinkRow>> {
        self.fail()
    }

    async fn insert(&self, _link: NewLink) -> StoreResult<Vec<LinkRow>> {
        self.fail()
    }
}

pub fn link_row(user_id: &str, title: &str, url: &str) -> LinkRow {
    LinkRow {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        url: url.to_string(),
        created_at: Utc::now(),
    }
}
