//! # Message Store
//!
//! Read side of the dashboard inbox, loaded once from a JSON snapshot of the `users` and
//! `messages` tables.
//!
//! ## Who sees what
//!
//! Only unread, top-level messages (no parent) are ever notifications.
//!
//! - Admin: platform messages (no workspace), anything addressed to `admin`, anything
//!   categorized `platform`
//! - User: portfolio messages of their own workspace that they did not send themselves,
//!   plus internal messages an admin sent to them
//!
//! Newest first, at most [`FEED_LIMIT`].
use std::{cmp::Reverse, io::ErrorKind, path::Path};

use chrono::NaiveDateTime;
use feed::{Category, NotificationRecord, RecordId};
use serde::Deserialize;
use tokio::fs;
use tracing::{info, warn};

use crate::{error::AppError, viewer::Viewer};

pub const FEED_LIMIT: usize = 10;
pub const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub workspace_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub receiver_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sender_role: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

pub struct MessageStore {
    snapshot: Snapshot,
}

impl MessageStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// A missing snapshot is an empty inbox, a malformed one is an error.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("{} not found, starting with an empty inbox", path.display());
                return Ok(Self::new(Snapshot::default()));
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&raw)
            .map_err(|e| AppError::Store(format!("{}: {e}", path.display())))?;

        info!(
            "Loaded {} users and {} messages",
            snapshot.users.len(),
            snapshot.messages.len()
        );

        Ok(Self::new(snapshot))
    }

    pub fn latest_for(&self, viewer: &Viewer) -> Vec<NotificationRecord> {
        let mut visible: Vec<&Message> = if viewer.is_admin {
            self.unread().filter(|m| admin_sees(m)).collect()
        } else {
            let Some(user) = self
                .snapshot
                .users
                .iter()
                .find(|u| u.username == viewer.username)
            else {
                return Vec::new();
            };

            self.unread().filter(|m| user_sees(user, m)).collect()
        };

        visible.sort_by_key(|m| Reverse(m.created_at));

        visible
            .into_iter()
            .take(FEED_LIMIT)
            .map(to_record)
            .collect()
    }

    fn unread(&self) -> impl Iterator<Item = &Message> {
        self.snapshot
            .messages
            .iter()
            .filter(|m| !m.is_read && m.parent_id.is_none())
    }
}

fn admin_sees(message: &Message) -> bool {
    message.workspace_id.is_none()
        || message.receiver_id.as_deref() == Some("admin")
        || message.category.as_deref() == Some("platform")
}

fn user_sees(user: &User, message: &Message) -> bool {
    let own_portfolio = message.workspace_id.as_deref() == Some(user.workspace_id.as_str())
        && message.category.as_deref() == Some("portfolio")
        && message.sender_id.as_deref() != Some(user.id.as_str());

    let from_admin = message.category.as_deref() == Some("internal")
        && message.sender_role.as_deref() == Some("admin")
        && message.receiver_id.as_deref() == Some(user.id.as_str());

    own_portfolio || from_admin
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn preview(message: &str) -> String {
    if message.chars().count() > PREVIEW_CHARS {
        let cut: String = message.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        message.to_string()
    }
}

fn to_record(message: &Message) -> NotificationRecord {
    let thread = message.parent_id.as_ref().unwrap_or(&message.id);

    NotificationRecord {
        id: RecordId::from(message.id.as_str()),
        thread_id: Some(RecordId::from(thread.as_str())),
        category: non_empty(&message.category)
            .map(Category::from)
            .unwrap_or_default(),
        name: non_empty(&message.name).unwrap_or("Unknown").to_string(),
        message: non_empty(&message.message).map(preview).unwrap_or_default(),
        time: message
            .created_at
            .map(|at| at.format("%H:%M").to_string())
            .unwrap_or_default(),
    }
}
