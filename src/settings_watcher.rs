//! Settings hot reload.
//!
//! Watches the settings file and hands freshly parsed settings to whoever
//! polls. Polling happens on the UI sequence; the notify callback only
//! forwards raw events through a channel.

use crate::error::CanvasResult;
use crate::settings::CanvasSettings;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use tracing::{debug, warn};

pub use crate::settings::default_settings_path;

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEvent {
    Changed(CanvasSettings),
    /// The file changed but could not be read or parsed
    Error(String),
}

pub struct SettingsWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
}

impl SettingsWatcher {
    pub fn new(path: PathBuf) -> CanvasResult<Self> {
        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            let _ = tx.send(event);
        })?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;
        debug!("Watching settings file {}", path.display());
        Ok(Self {
            path,
            _watcher: watcher,
            events,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending file events. Bursts of writes collapse into a single
    /// reload of the file.
    pub fn poll(&mut self) -> Option<SettingsEvent> {
        let mut touched = false;
        for event in self.events.try_iter() {
            match event {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => touched = true,
                Ok(_) => {}
                Err(e) => warn!("Settings watcher error: {}", e),
            }
        }
        if !touched {
            return None;
        }
        Some(match CanvasSettings::load(&self.path) {
            Ok(settings) => SettingsEvent::Changed(settings),
            Err(e) => {
                warn!("Failed to reload settings from {}: {}", self.path.display(), e);
                SettingsEvent::Error(e.to_string())
            }
        })
    }
}
