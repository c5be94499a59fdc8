//! Terminal implementations of the host capabilities, used by the `poller` binary.
//!
//! The feed markup goes to an HTML file when one is configured, the badge and the
//! animations go to the log, ambient notifications are printed to stdout.
use std::{
    borrow::Cow,
    io::{Write, stderr},
    path::PathBuf,
    time::Duration,
};

use parking_lot::Mutex;
use tokio::{
    fs,
    io::{AsyncBufReadExt, BufReader, stdin},
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};
use tracing::{debug, info};

use crate::{
    error::{Effect, PollError},
    host::{AmbientNotifier, Animation, Permission, Sounder, Surface},
    scheduler::HostEvent,
};

pub struct Bell {
    enabled: bool,
}

impl Bell {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Sounder for Bell {
    fn chime(&self) -> Result<(), PollError> {
        if !self.enabled {
            return Ok(());
        }

        let mut err = stderr();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| PollError::effect(Effect::Sound, e))
    }
}

pub struct ConsoleNotifier {
    permission: Mutex<Permission>,
}

impl ConsoleNotifier {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
        }
    }
}

impl AmbientNotifier for ConsoleNotifier {
    fn permission(&self) -> Permission {
        *self.permission.lock()
    }

    /// Running the watcher interactively counts as consent.
    fn request_permission(&self) {
        let mut permission = self.permission.lock();
        if *permission == Permission::Undetermined {
            info!("Ambient notifications enabled from the next new message on");
            *permission = Permission::Granted;
        }
    }

    fn notify(&self, title: &str, body: &str, link: &str) -> Result<(), PollError> {
        println!("{}", console_line(title, body, link));
        Ok(())
    }
}

/// Control characters become spaces so a sender can't emit escape sequences or extra lines.
fn printable(input: &str) -> Cow<'_, str> {
    if !input.chars().any(char::is_control) {
        return Cow::Borrowed(input);
    }

    Cow::Owned(
        input
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect(),
    )
}

fn console_line(title: &str, body: &str, link: &str) -> String {
    format!(
        "[notification] {}: {} ({})",
        printable(title),
        printable(body),
        printable(link)
    )
}

/// Feed markup goes to a writer task, the poll loop never touches the disk.
pub struct HtmlFileSurface {
    documents: Option<UnboundedSender<String>>,
}

impl HtmlFileSurface {
    /// Spawns the writer task when a path is given, so it must run inside a tokio runtime.
    pub fn new(feed_path: Option<PathBuf>) -> Self {
        let documents = feed_path.map(|path| {
            let (tx, rx) = unbounded_channel();
            tokio::spawn(write_documents(path, rx));
            tx
        });

        Self { documents }
    }
}

async fn write_documents(path: PathBuf, mut documents: UnboundedReceiver<String>) {
    while let Some(mut document) = documents.recv().await {
        // only the latest render matters
        while let Ok(newer) = documents.try_recv() {
            document = newer;
        }

        if let Err(e) = fs::write(&path, document).await {
            debug!("Could not write {}: {e}", path.display());
        }
    }
}

impl Surface for HtmlFileSurface {
    fn render_feed(&self, markup: &str) -> Result<(), PollError> {
        let documents = self
            .documents
            .as_ref()
            .ok_or(PollError::RenderSkipped("feed"))?;

        let document = format!(
            "<!doctype html>\n<meta charset=\"utf-8\">\n<ul class=\"notification-list\">{markup}</ul>\n"
        );

        documents
            .send(document)
            .map_err(|_| PollError::RenderSkipped("feed"))
    }

    fn set_badge(&self, label: Option<&str>) -> Result<(), PollError> {
        info!(badge = label.unwrap_or("hidden"), "Badge updated");
        Ok(())
    }

    fn animate(&self, animation: Animation, duration: Duration) -> Result<(), PollError> {
        debug!("{animation:?} for {}ms", duration.as_millis());
        Ok(())
    }
}

/// `r`/empty refreshes, `h` hides, `v` shows, `q` quits.
pub fn parse_command(line: &str) -> Option<HostEvent> {
    match line.trim() {
        "" | "r" | "refresh" => Some(HostEvent::Refresh),
        "h" | "hide" => Some(HostEvent::Hidden),
        "v" | "show" => Some(HostEvent::Visible),
        "q" | "quit" => Some(HostEvent::Quit),
        _ => None,
    }
}

pub async fn forward_stdin(events: UnboundedSender<HostEvent>) {
    let mut lines = BufReader::new(stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match parse_command(&line) {
            Some(event) => {
                if events.send(event).is_err() {
                    return;
                }
            }
            None => info!("Unknown command {line:?}, expected r, h, v or q"),
        }
    }
}
