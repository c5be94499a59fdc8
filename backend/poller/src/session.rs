use std::sync::Arc;

use feed::NotificationRecord;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    alerts::{AlertDispatcher, AlertReport},
    detector::{Delta, FeedState, detect},
    error::PollError,
    fetcher::FeedFetcher,
    host::Surface,
    render::{badge_label, render_feed},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub delta: Delta,
    pub count: usize,
    pub alerts: AlertReport,
}

/// One consuming session: the feed state plus everything a poll cycle touches.
pub struct FeedSession {
    fetcher: Arc<dyn FeedFetcher>,
    surface: Arc<dyn Surface>,
    dispatcher: AlertDispatcher,
    state: Mutex<FeedState>,
}

impl FeedSession {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        surface: Arc<dyn Surface>,
        dispatcher: AlertDispatcher,
    ) -> Self {
        Self {
            fetcher,
            surface,
            dispatcher,
            state: Mutex::new(FeedState::new()),
        }
    }

    pub fn state(&self) -> FeedState {
        self.state.lock().clone()
    }

    /// Fetch, diff, commit, render, alert.
    ///
    /// Only a failed fetch is returned as an error, and it leaves the state untouched.
    /// Render and effect failures are logged and the cycle carries on.
    pub async fn poll_once(&self) -> Result<PollOutcome, PollError> {
        let fresh = self.fetcher.fetch().await.map_err(|e| {
            warn!("Poll failed, keeping previous feed: {e}");
            e
        })?;

        // detect and commit under one lock, never held across an await
        let delta = {
            let mut state = self.state.lock();
            let delta = detect(&state, &fresh);
            state.commit(&fresh);
            delta
        };

        debug!(
            count = fresh.len(),
            new = delta.new_ids.len(),
            first_load = delta.is_first_load,
            "Poll committed"
        );

        self.render(&fresh);

        let alerts = self.dispatcher.dispatch(&delta, &fresh);
        if delta.should_alert() {
            info!("{} new notification(s)", delta.new_ids.len());
        }

        Ok(PollOutcome {
            count: fresh.len(),
            delta,
            alerts,
        })
    }

    fn render(&self, fresh: &[NotificationRecord]) {
        if let Err(e) = self.surface.render_feed(&render_feed(fresh)) {
            debug!("Feed not rendered: {e}");
        }

        let label = badge_label(fresh.len());
        if let Err(e) = self.surface.set_badge(label.as_deref()) {
            debug!("Badge not updated: {e}");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{collections::VecDeque, sync::atomic::Ordering};

    use async_trait::async_trait;
    use feed::{Category, RecordId};

    use super::*;
    use crate::{
        alerts::tests::{RecordingAmbient, RecordingSounder, RecordingSurface},
        error::Effect,
        host::Permission,
    };

    /// Replays scripted responses, then keeps answering with the last one.
    pub struct ScriptedFetcher {
        script: Mutex<VecDeque<Result<Vec<NotificationRecord>, String>>>,
        last: Mutex<Vec<NotificationRecord>>,
        pub calls: std::sync::atomic::AtomicUsize,
    }

    impl ScriptedFetcher {
        pub fn new(script: Vec<Result<Vec<NotificationRecord>, String>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                last: Mutex::new(Vec::new()),
                calls: Default::default(),
            }
        }
    }

    #[async_trait]
    impl FeedFetcher for ScriptedFetcher {
        async fn fetch(&self) -> Result<Vec<NotificationRecord>, PollError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            match self.script.lock().pop_front() {
                Some(Ok(records)) => {
                    *self.last.lock() = records.clone();
                    Ok(records)
                }
                Some(Err(reason)) => Err(PollError::FetchFailed(reason)),
                None => Ok(self.last.lock().clone()),
            }
        }
    }

    pub struct Harness {
        pub session: FeedSession,
        pub fetcher: Arc<ScriptedFetcher>,
        pub sounder: Arc<RecordingSounder>,
        pub ambient: Arc<RecordingAmbient>,
        pub surface: Arc<RecordingSurface>,
    }

    pub fn harness(script: Vec<Result<Vec<NotificationRecord>, String>>) -> Harness {
        harness_with_surface(script, RecordingSurface::default())
    }

    pub fn harness_with_surface(
        script: Vec<Result<Vec<NotificationRecord>, String>>,
        surface: RecordingSurface,
    ) -> Harness {
        let fetcher = Arc::new(ScriptedFetcher::new(script));
        let sounder = Arc::new(RecordingSounder::default());
        let ambient = Arc::new(RecordingAmbient::new(Permission::Granted));
        let surface = Arc::new(surface);

        let dispatcher = AlertDispatcher::new(sounder.clone(), ambient.clone(), surface.clone());
        let session = FeedSession::new(fetcher.clone(), surface.clone(), dispatcher);

        Harness {
            session,
            fetcher,
            sounder,
            ambient,
            surface,
        }
    }

    fn record(id: i64, category: Category) -> NotificationRecord {
        NotificationRecord::new(id, category).with_sender(format!("sender {id}"), "hello")
    }

    #[tokio::test]
    async fn test_two_poll_scenario() {
        let h = harness(vec![
            Ok(vec![record(1, Category::Internal)]),
            Ok(vec![record(2, Category::Portfolio), record(1, Category::Internal)]),
        ]);

        let first = h.session.poll_once().await.unwrap();
        assert!(first.delta.is_first_load);
        assert_eq!(first.alerts, AlertReport::default());
        assert_eq!(h.surface.feeds.lock().len(), 1);
        assert!(h.surface.feeds.lock()[0].contains("fa-comments text-info"));
        assert_eq!(h.sounder.chimes.load(Ordering::SeqCst), 0);

        let second = h.session.poll_once().await.unwrap();
        assert_eq!(second.delta.new_ids, vec![RecordId::Number(2)]);
        assert_eq!(second.count, 2);
        assert!(second.alerts.fired.contains(&Effect::Sound));
        assert_eq!(h.sounder.chimes.load(Ordering::SeqCst), 1);
        assert_eq!(h.ambient.shown.lock().len(), 1);

        let feeds = h.surface.feeds.lock();
        let latest = feeds.last().unwrap();
        assert_eq!(latest.matches("notification-item").count(), 2);
        assert!(latest.find("sender 2").unwrap() < latest.find("sender 1").unwrap());

        assert_eq!(
            *h.surface.badges.lock(),
            vec![Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_state() {
        let h = harness(vec![
            Ok(vec![record(1, Category::Portfolio)]),
            Err("connection reset".to_string()),
            Ok(vec![record(2, Category::Portfolio), record(1, Category::Portfolio)]),
        ]);

        h.session.poll_once().await.unwrap();
        let before = h.session.state();

        assert!(matches!(
            h.session.poll_once().await,
            Err(PollError::FetchFailed(_))
        ));
        let after = h.session.state();
        assert_eq!(before.last_known_ids(), after.last_known_ids());
        assert_eq!(before.last_known_count(), after.last_known_count());
        assert_eq!(h.surface.feeds.lock().len(), 1);

        let third = h.session.poll_once().await.unwrap();
        assert_eq!(third.delta.new_ids, vec![RecordId::Number(2)]);
        assert!(third.delta.should_alert());
    }

    #[tokio::test]
    async fn test_failure_before_first_success_keeps_first_load() {
        let h = harness(vec![
            Err("timeout".to_string()),
            Ok(vec![record(1, Category::Portfolio)]),
        ]);

        assert!(h.session.poll_once().await.is_err());

        let outcome = h.session.poll_once().await.unwrap();
        assert!(outcome.delta.is_first_load);
        assert_eq!(h.sounder.chimes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_surface_does_not_stop_polling() {
        let h = harness_with_surface(
            vec![
                Ok(vec![record(1, Category::Portfolio)]),
                Ok(vec![record(2, Category::Portfolio), record(1, Category::Portfolio)]),
            ],
            RecordingSurface {
                detached: true,
                ..Default::default()
            },
        );

        h.session.poll_once().await.unwrap();
        let second = h.session.poll_once().await.unwrap();

        assert_eq!(h.session.state().last_known_count(), 2);
        assert_eq!(second.alerts.failed, vec![Effect::Pulse, Effect::Shake]);
        assert_eq!(h.sounder.chimes.load(Ordering::SeqCst), 1);
        assert_eq!(h.ambient.shown.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_feed_hides_badge() {
        let h = harness(vec![Ok(vec![record(1, Category::Portfolio)]), Ok(vec![])]);

        h.session.poll_once().await.unwrap();
        h.session.poll_once().await.unwrap();

        assert_eq!(h.surface.badges.lock().last(), Some(&None));
        assert!(h.surface.feeds.lock()[1].contains("No new notifications"));
    }
}
