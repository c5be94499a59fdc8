//! # Backups
//!
//! Listing of `backups.json`, the metadata file kept next to the backup archives.
//!
//! Creating, restoring and deleting backups happens elsewhere. This service only reads
//! the metadata so the dashboard can render its dropdown.
use std::{io::ErrorKind, path::Path};

use feed::{BackupRecord, backups::sort_newest_first};
use tokio::fs;

use crate::error::AppError;

pub const METADATA_FILE: &str = "backups.json";

pub async fn list_backups(backups_dir: &Path) -> Result<Vec<BackupRecord>, AppError> {
    let path = backups_dir.join(METADATA_FILE);

    let raw = match fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(AppError::Backups(format!("{}: {e}", path.display()))),
    };

    let mut backups: Vec<BackupRecord> = serde_json::from_str(&raw)
        .map_err(|e| AppError::Backups(format!("{}: {e}", path.display())))?;

    sort_newest_first(&mut backups);

    Ok(backups)
}
