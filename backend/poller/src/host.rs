//! Capabilities the embedding host provides. Tests swap in recording stubs.
use std::time::Duration;

use crate::error::PollError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Undetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Pulse,
    Shake,
}

/// Short audible cue.
pub trait Sounder: Send + Sync {
    fn chime(&self) -> Result<(), PollError>;
}

/// Alert surface outside the feed itself, gated by user permission.
pub trait AmbientNotifier: Send + Sync {
    fn permission(&self) -> Permission;

    /// Fire and forget. The answer is picked up by a later cycle through
    /// [`AmbientNotifier::permission`].
    fn request_permission(&self);

    fn notify(&self, title: &str, body: &str, link: &str) -> Result<(), PollError>;
}

/// Where the feed, the badge and the attention animations live.
///
/// Missing anchors are reported as [`PollError::RenderSkipped`].
pub trait Surface: Send + Sync {
    fn render_feed(&self, markup: &str) -> Result<(), PollError>;

    fn set_badge(&self, label: Option<&str>) -> Result<(), PollError>;

    fn animate(&self, animation: Animation, duration: Duration) -> Result<(), PollError>;
}
