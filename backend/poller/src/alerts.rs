use std::{sync::Arc, time::Duration};

use feed::NotificationRecord;
use tracing::{debug, warn};

use crate::{
    detector::Delta,
    error::{Effect, PollError},
    host::{AmbientNotifier, Animation, Permission, Sounder, Surface},
    render::deep_link,
};

pub const PULSE_DURATION: Duration = Duration::from_millis(1000);
pub const SHAKE_DURATION: Duration = Duration::from_millis(500);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AlertReport {
    pub fired: Vec<Effect>,
    pub failed: Vec<Effect>,
}

impl AlertReport {
    fn record(&mut self, effect: Effect, result: Result<bool, PollError>) {
        match result {
            Ok(true) => self.fired.push(effect),
            Ok(false) => debug!("{effect} skipped"),
            Err(e) => {
                warn!("Alert effect swallowed: {e}");
                self.failed.push(effect);
            }
        }
    }
}

pub struct AlertDispatcher {
    sounder: Arc<dyn Sounder>,
    ambient: Arc<dyn AmbientNotifier>,
    surface: Arc<dyn Surface>,
}

impl AlertDispatcher {
    pub fn new(
        sounder: Arc<dyn Sounder>,
        ambient: Arc<dyn AmbientNotifier>,
        surface: Arc<dyn Surface>,
    ) -> Self {
        Self {
            sounder,
            ambient,
            surface,
        }
    }

    /// Runs every effect for a delta that should alert. Failures are logged and reported,
    /// never propagated, and never stop the remaining effects.
    pub fn dispatch(&self, delta: &Delta, fresh: &[NotificationRecord]) -> AlertReport {
        let mut report = AlertReport::default();

        if !delta.should_alert() {
            return report;
        }

        report.record(Effect::Sound, self.sounder.chime().map(|_| true));
        report.record(
            Effect::Pulse,
            self.surface
                .animate(Animation::Pulse, PULSE_DURATION)
                .map(|_| true),
        );
        report.record(
            Effect::Shake,
            self.surface
                .animate(Animation::Shake, SHAKE_DURATION)
                .map(|_| true),
        );

        if let Some(record) = delta.first_new(fresh) {
            report.record(Effect::Ambient, self.ambient_notify(record));
        }

        report
    }

    fn ambient_notify(&self, record: &NotificationRecord) -> Result<bool, PollError> {
        match self.ambient.permission() {
            Permission::Granted => {
                let title = if record.name.is_empty() {
                    "New notification"
                } else {
                    record.name.as_str()
                };

                self.ambient
                    .notify(title, &record.message, &deep_link(record))
                    .map(|_| true)
            }
            Permission::Denied => Ok(false),
            Permission::Undetermined => {
                self.ambient.request_permission();
                Ok(false)
            }
        }
    }
}
