//! # Scheduler
//!
//! Visibility-aware poll cadence for one [`FeedSession`].
//!
//! - `Active`: a timer task polls once right away, then every interval
//! - `Suspended`: no timer, no polls
//! - Manual triggers poll out of band and leave the timer alone
//!
//! Missed ticks are delayed rather than bursted, so a slow or failing endpoint is retried at
//! most once per interval.
use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc::UnboundedReceiver,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, info};

use crate::{
    error::PollError,
    session::{FeedSession, PollOutcome},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Active,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Lifecycle signals from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Refresh,
    Visible,
    Hidden,
    Quit,
}

pub struct Scheduler {
    session: Arc<FeedSession>,
    period: Duration,
    timer: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(session: Arc<FeedSession>, period: Duration) -> Self {
        Self {
            session,
            period,
            timer: None,
        }
    }

    pub fn session(&self) -> &Arc<FeedSession> {
        &self.session
    }

    pub fn state(&self) -> SchedulerState {
        match self.timer {
            Some(_) => SchedulerState::Active,
            None => SchedulerState::Suspended,
        }
    }

    /// Polls immediately, then arms the repeating timer. No-op while active.
    pub fn start(&mut self) {
        if self.timer.is_some() {
            return;
        }

        let session = self.session.clone();
        let period = self.period;

        self.timer = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // first tick completes immediately
                ticker.tick().await;

                // failures are logged by the session and retried on the next tick
                let _ = session.poll_once().await;
            }
        }));

        info!("Polling every {}ms", self.period.as_millis());
    }

    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            info!("Polling suspended");
        }
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        debug!("Surface is now {visibility:?}");

        match visibility {
            Visibility::Visible => self.start(),
            Visibility::Hidden => self.stop(),
        }
    }

    /// One out-of-band poll, e.g. when the user opens the feed.
    pub async fn trigger(&self) -> Result<PollOutcome, PollError> {
        self.session.poll_once().await
    }

    /// Maps host events onto the hooks until `Quit` or until the host goes away.
    pub async fn drive(&mut self, mut events: UnboundedReceiver<HostEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                HostEvent::Refresh => {
                    let _ = self.trigger().await;
                }
                HostEvent::Visible => self.set_visibility(Visibility::Visible),
                HostEvent::Hidden => self.set_visibility(Visibility::Hidden),
                HostEvent::Quit => break,
            }
        }

        self.stop();
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
