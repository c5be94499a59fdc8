//! # Notification Poller
//!
//! Client side of the dashboard notification bell.
//!
//! ## Cycle
//!
//! 1. The [`Scheduler`] ticks, or the host asks for a refresh
//! 2. The [`FeedFetcher`] does one GET against the aggregation endpoint
//! 3. The change detector diffs the snapshot against the previous one and commits it
//! 4. The whole feed and the badge are re-rendered, every successful poll
//! 5. The [`AlertDispatcher`] fires only for genuinely new ids, and never on the first load
//!
//! A failed fetch changes nothing. The feed goes stale until the next tick succeeds.
//!
//! ## State
//!
//! One [`FeedSession`] per consuming session, owned by its scheduler. Nothing survives the
//! session and there are no globals.
//!
//! ## Host
//!
//! Sound, ambient notifications and the rendering surface are traits in [`host`]. The
//! binary wires them to the terminal, tests wire them to recording stubs.
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

pub mod alerts;
pub mod config;
pub mod detector;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod terminal;

pub use alerts::{AlertDispatcher, AlertReport};
pub use config::Config;
pub use error::{Effect, PollError};
pub use fetcher::{FeedFetcher, HttpFetcher};
pub use scheduler::{HostEvent, Scheduler, SchedulerState, Visibility};
pub use session::{FeedSession, PollOutcome};

use host::{AmbientNotifier, Sounder, Surface};

pub struct Host {
    pub sounder: Arc<dyn Sounder>,
    pub ambient: Arc<dyn AmbientNotifier>,
    pub surface: Arc<dyn Surface>,
}

pub fn build_session(fetcher: Arc<dyn FeedFetcher>, host: Host) -> Arc<FeedSession> {
    let dispatcher = AlertDispatcher::new(host.sounder, host.ambient, host.surface.clone());

    Arc::new(FeedSession::new(fetcher, host.surface, dispatcher))
}

/// Polls until the host sends `Quit` or drops its sender.
pub async fn watch(
    config: &Config,
    fetcher: Arc<dyn FeedFetcher>,
    host: Host,
    events: UnboundedReceiver<HostEvent>,
) {
    let mut scheduler = Scheduler::new(build_session(fetcher, host), config.interval);

    scheduler.start();
    scheduler.drive(events).await;
}
