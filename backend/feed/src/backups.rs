use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupKind {
    Manual,
    #[default]
    #[serde(other)]
    Automatic,
}

/// Metadata entry of `backups.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub filename: String,

    /// ISO-8601, sorts lexicographically.
    pub timestamp: String,

    #[serde(default)]
    pub size_kb: f64,

    #[serde(rename = "type", default)]
    pub kind: BackupKind,
}

/// Newest first.
pub fn sort_newest_first(backups: &mut [BackupRecord]) {
    backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
