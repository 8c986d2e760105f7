//! pat-host - browser native messaging host for GitHub PAT storage
//!
//! No CLI surface: the browser launches this binary and owns both streams.
//! stdout carries protocol frames exclusively, so diagnostics go to a fixed
//! log file instead of the usual stderr/stdout subscriber.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::EnvFilter;

use pat_host::config::{HostConfig, VERSION};
use pat_host::framing::FramedChannel;
use pat_host::host;
use pat_host::router::Router;
use pat_host::store::KeyringStore;

fn main() -> anyhow::Result<()> {
    let config = HostConfig::default();
    init_logging(&config.log_path);
    info!(version = VERSION, "native host started");

    let mut channel = FramedChannel::new(io::stdin().lock(), io::stdout().lock());
    let router = Router::new(
        KeyringStore::new(config.service.as_str(), config.account.as_str()),
        KeyringStore::new(config.service.as_str(), config.health_account.as_str()),
    );

    host::run(&mut channel, &router)?;
    info!("native host exiting");
    Ok(())
}

/// Point the subscriber at the side-channel log file. If the file cannot be
/// opened the host runs unlogged; dying over diagnostics would take the
/// extension's storage down with it.
fn init_logging(path: &Path) {
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
