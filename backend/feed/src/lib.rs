//! # Feed
//!
//! Wire model shared by the dashboard server and the notification poller.
//!
//! ## Payloads
//!
//! - `GET /dashboard/notifications/latest`: JSON array of [`NotificationRecord`], most recent first
//! - `GET /dashboard/api/backups`: JSON array of [`BackupRecord`], most recent first
//!
//! Both ends decode leniently. Missing strings become empty, an unknown category is kept
//! as [`Category::Other`] instead of failing the whole snapshot.

pub mod backups;
pub mod records;

pub use backups::{BackupKind, BackupRecord};
pub use records::{Category, NotificationRecord, RecordId};

pub const NOTIFICATIONS_PATH: &str = "/dashboard/notifications/latest";
pub const BACKUPS_PATH: &str = "/dashboard/api/backups";

pub const VIEWER_HEADER: &str = "x-viewer";
pub const VIEWER_ADMIN_HEADER: &str = "x-viewer-admin";
