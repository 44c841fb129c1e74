/*
 * Responsibility
 * - Link request/response DTOs
 * - Anything the caller sends besides title/url (user_id included) is dropped on decode
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::{LinkRow, NewLink};

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub title: String,
    pub url: String,
}

impl CreateLinkRequest {
    /// Stamp the owner. The caller never chooses `user_id`.
    pub fn into_new_link(self, user_id: &str) -> NewLink {
        NewLink {
            user_id: user_id.to_string(),
            title: self.title,
            url: self.url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<LinkRow> for LinkResponse {
    fn from(row: LinkRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            url: row.url,
            created_at: row.created_at,
        }
    }
}
