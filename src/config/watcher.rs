// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Hot reload of the settings file.
//!
//! Watches a settings file (or a directory of them) and emits a reloaded
//! configuration after edits settle, so a re-tuning takes effect without
//! restarting.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use super::FretboardFile;

/// Quiet period before a burst of edits is reloaded
pub const DEFAULT_SETTLE_MS: u64 = 500;

/// How often the settle thread checks for a quiet period
const POLL: Duration = Duration::from_millis(100);

/// What happened to a watched settings file
#[derive(Debug, Clone)]
pub enum SettingsEvent {
    /// Edits settled and the file builds a valid fretboard
    Reloaded(Box<FretboardFile>),
    /// Edits settled but the file did not load or build
    Invalid { path: PathBuf, reason: String },
    /// A file appeared in the watched directory
    Created(PathBuf),
    /// A file disappeared from the watched directory
    Removed(PathBuf),
}

/// Whether a changed path should be reloaded
fn is_settings_file(path: &Path, watched: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(ext, "yaml" | "yml" | "toml"),
        None => path == watched,
    }
}

/// Load and validate a changed file into an event
fn reload(path: &Path) -> SettingsEvent {
    match validate_config(path) {
        Ok(config) => {
            debug!(?path, "settings reloaded");
            SettingsEvent::Reloaded(Box::new(config))
        }
        Err(e) => {
            warn!(?path, "settings rejected: {:#}", e);
            SettingsEvent::Invalid {
                path: path.to_path_buf(),
                reason: format!("{:#}", e),
            }
        }
    }
}

/// Watches settings on disk and reports reloads over a channel
pub struct SettingsWatcher {
    _inner: RecommendedWatcher,
    events: Receiver<SettingsEvent>,
    path: PathBuf,
}

impl SettingsWatcher {
    /// Watch a settings file or directory.
    ///
    /// `settle_ms` is the quiet period after the last modification before the
    /// file is reloaded (default [`DEFAULT_SETTLE_MS`]).
    pub fn new<P: AsRef<Path>>(path: P, settle_ms: Option<u64>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let settle = Duration::from_millis(settle_ms.unwrap_or(DEFAULT_SETTLE_MS));

        let (raw_tx, raw_rx) = mpsc::channel::<Event>();
        let (events_tx, events) = mpsc::channel();

        let mut inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let _ = raw_tx.send(event);
                }
                Err(e) => warn!("file watch error: {}", e),
            },
            Config::default(),
        )
        .context("Failed to create file watcher")?;

        let recursive = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        inner
            .watch(&path, recursive)
            .with_context(|| format!("Failed to watch {:?}", path))?;

        let watched = path.clone();
        thread::spawn(move || settle_loop(raw_rx, events_tx, &watched, settle));

        Ok(Self {
            _inner: inner,
            events,
            path,
        })
    }

    /// Next event if one is ready
    pub fn poll(&self) -> Option<SettingsEvent> {
        self.events.try_recv().ok()
    }

    /// Every event that is ready
    pub fn drain(&self) -> Vec<SettingsEvent> {
        self.events.try_iter().collect()
    }

    /// Block up to `timeout` for the next event
    pub fn wait(&self, timeout: Duration) -> Option<SettingsEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Collect modified paths and reload them once `settle` has passed without a
/// new modification. Exits when the watcher is dropped.
fn settle_loop(
    raw: Receiver<Event>,
    out: Sender<SettingsEvent>,
    watched: &Path,
    settle: Duration,
) {
    let mut dirty: Vec<PathBuf> = Vec::new();
    let mut last_change: Option<Instant> = None;

    loop {
        match raw.recv_timeout(POLL) {
            Ok(event) => match event.kind {
                EventKind::Create(_) => {
                    for path in event.paths {
                        let _ = out.send(SettingsEvent::Created(path));
                    }
                }
                EventKind::Remove(_) => {
                    for path in event.paths {
                        let _ = out.send(SettingsEvent::Removed(path));
                    }
                }
                EventKind::Modify(_) => {
                    for path in event.paths {
                        if is_settings_file(&path, watched) && !dirty.contains(&path) {
                            dirty.push(path);
                        }
                    }
                    last_change = Some(Instant::now());
                }
                _ => {}
            },
            Err(RecvTimeoutError::Timeout) => {
                if last_change.is_some_and(|t| t.elapsed() >= settle) {
                    for path in dirty.drain(..) {
                        let _ = out.send(reload(&path));
                    }
                    last_change = None;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Load a settings file and check that it builds a fretboard
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<FretboardFile> {
    let config = FretboardFile::load(path)?;
    config.build_fretboard()?;
    Ok(config)
}
