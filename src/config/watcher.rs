//! Config file watcher for route hot reload.
//!
//! # Responsibilities
//! - Watch the config file's directory and pick out events for the file
//! - Re-read, parse and validate the file on change
//! - Forward accepted configs to the server over an mpsc channel
//!
//! # Design Decisions
//! - The parent directory is watched so editors that save by rename are seen
//! - Unchanged content is not forwarded; one save often fires several events
//! - Invalid files are logged and dropped, the server keeps its routes

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{parse_config, ConfigError};
use crate::config::schema::ServerConfig;

/// Sends a fresh `ServerConfig` whenever the watched file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ServerConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for `HttpServer::run`.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ServerConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Dropping the returned handle stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(|n| n.to_os_string());

        // seed with the current content so the first event is not a no-op reload
        let last = Mutex::new(fs::read_to_string(&self.path).ok());
        let path = self.path.clone();
        let tx = self.update_tx;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Config watch error");
                        return;
                    }
                };
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                if !event.paths.iter().any(|p| p.file_name() == file_name.as_deref()) {
                    return;
                }

                let mut last = match last.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                match reload(&path, &mut last) {
                    Ok(Some(config)) => {
                        tracing::info!(path = %path.display(), routes = config.routes.len(), "Config reloaded");
                        if tx.send(config).is_err() {
                            tracing::debug!("Config receiver gone, dropping update");
                        }
                    }
                    Ok(None) => tracing::trace!(path = %path.display(), "Config unchanged"),
                    Err(e) => {
                        tracing::error!(path = %path.display(), error = %e, "Rejected config change, keeping current routes");
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(path = %self.path.display(), "Watching config for route changes");
        Ok(watcher)
    }
}

/// Read `path` and parse it if the content differs from `last`.
///
/// `last` is only updated when the new content is accepted.
fn reload(path: &Path, last: &mut Option<String>) -> Result<Option<ServerConfig>, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    if last.as_deref() == Some(content.as_str()) {
        return Ok(None);
    }
    let config = parse_config(&content)?;
    *last = Some(content);
    Ok(Some(config))
}
