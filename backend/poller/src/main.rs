use std::{path::PathBuf, sync::Arc};

use clap::{Parser, ValueEnum};
use poller::{
    Config, Host, HostEvent, HttpFetcher,
    fetcher::viewer_headers,
    host::Permission,
    terminal::{Bell, ConsoleNotifier, HtmlFileSurface, forward_stdin},
    watch,
};
use reqwest::header::HeaderMap;
use tokio::{signal::ctrl_c, sync::mpsc::unbounded_channel};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Ambient {
    Allow,
    Deny,
    Ask,
}

impl From<Ambient> for Permission {
    fn from(mode: Ambient) -> Self {
        match mode {
            Ambient::Allow => Permission::Granted,
            Ambient::Deny => Permission::Denied,
            Ambient::Ask => Permission::Undetermined,
        }
    }
}

/// Watches the dashboard notification feed from a terminal.
///
/// Commands on stdin: enter or `r` refreshes, `h` pauses, `v` resumes, `q` quits.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Aggregation endpoint, overrides FEED_URL
    #[arg(long)]
    url: Option<String>,

    /// Poll interval, overrides POLL_INTERVAL_MS
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Username forwarded to the server
    #[arg(long)]
    viewer: Option<String>,

    #[arg(long)]
    admin: bool,

    /// Write the rendered feed to this HTML file
    #[arg(long)]
    feed_out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Ambient::Ask)]
    ambient: Ambient,

    /// No terminal bell
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let config = Config::load_with(args.url, args.interval_ms)?;

    let headers = match &args.viewer {
        Some(viewer) => viewer_headers(viewer, args.admin)?,
        None => HeaderMap::new(),
    };
    let fetcher = Arc::new(HttpFetcher::with_headers(config.feed_url.clone(), headers)?);

    let host = Host {
        sounder: Arc::new(Bell::new(!args.quiet)),
        ambient: Arc::new(ConsoleNotifier::new(args.ambient.into())),
        surface: Arc::new(HtmlFileSurface::new(args.feed_out)),
    };

    let (events, rx) = unbounded_channel();

    tokio::spawn(forward_stdin(events.clone()));
    tokio::spawn(async move {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
            let _ = events.send(HostEvent::Quit);
        }
    });

    info!("Watching {}", config.feed_url);
    watch(&config, fetcher, host, rx).await;

    Ok(())
}
