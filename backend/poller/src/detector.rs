//! # Change Detection
//!
//! Cross-poll state of one feed session and the delta computation against it.
//!
//! First-load detection uses an explicit `has_polled_once` flag rather than the emptiness of
//! the previous id list. Otherwise a session whose feed drained to zero would treat its next
//! non-empty poll as a first load and swallow the alert.
use std::collections::HashSet;

use feed::{NotificationRecord, RecordId};

#[derive(Debug, Default, Clone)]
pub struct FeedState {
    last_known_ids: Vec<RecordId>,
    last_known_count: usize,
    has_polled_once: bool,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_known_ids(&self) -> &[RecordId] {
        &self.last_known_ids
    }

    pub fn last_known_count(&self) -> usize {
        self.last_known_count
    }

    pub fn has_polled_once(&self) -> bool {
        self.has_polled_once
    }

    /// Replaces the snapshot after a successful fetch. Failed fetches never get here.
    pub fn commit(&mut self, fresh: &[NotificationRecord]) {
        self.last_known_ids = fresh.iter().map(|record| record.id.clone()).collect();
        self.last_known_count = fresh.len();
        self.has_polled_once = true;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    /// Ids absent from the previous snapshot, in fresh (most recent first) order.
    pub new_ids: Vec<RecordId>,
    pub is_first_load: bool,
}

impl Delta {
    pub fn should_alert(&self) -> bool {
        !self.is_first_load && !self.new_ids.is_empty()
    }

    /// Most recent record among the new ones.
    pub fn first_new<'a>(&self, fresh: &'a [NotificationRecord]) -> Option<&'a NotificationRecord> {
        let first = self.new_ids.first()?;
        fresh.iter().find(|record| &record.id == first)
    }
}

pub fn detect(state: &FeedState, fresh: &[NotificationRecord]) -> Delta {
    let known: HashSet<&RecordId> = state.last_known_ids.iter().collect();

    let mut seen = HashSet::new();
    let new_ids = fresh
        .iter()
        .map(|record| &record.id)
        .filter(|id| !known.contains(id) && seen.insert(*id))
        .cloned()
        .collect();

    Delta {
        new_ids,
        is_first_load: !state.has_polled_once,
    }
}
