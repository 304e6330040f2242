//! Watch daemon and runtime logic.

use super::events::{ChangeEvent, EventBatcher, WatchConfig};
use crate::error::{ApiError, StorageError};
use crate::workspace::Session;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use parking_lot::{Mutex, RwLock};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Keeps an open session in sync with edits made outside of it.
pub struct WatchDaemon {
    session: Arc<Mutex<Session>>,
    config: WatchConfig,
    running: Arc<RwLock<bool>>,
}

impl WatchDaemon {
    pub fn new(session: Arc<Mutex<Session>>, config: WatchConfig) -> Self {
        Self {
            session,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Flag observed by the loop; clearing it stops the daemon.
    pub fn running(&self) -> Arc<RwLock<bool>> {
        Arc::clone(&self.running)
    }

    /// Run until stopped or the watcher disconnects.
    pub fn start(&self) -> Result<(), ApiError> {
        *self.running.write() = true;
        self.session.lock().reload()?;

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })
        .map_err(|e| watch_error(format!("Failed to create watcher: {}", e)))?;

        let data_dir = self.config.data_dir();
        watcher
            .watch(&data_dir, RecursiveMode::Recursive)
            .map_err(|e| watch_error(format!("Failed to watch directory: {}", e)))?;

        info!(data_dir = ?data_dir, "Watching project");

        let mut batcher = EventBatcher::new(self.config.clone());
        let batch_window = Duration::from_millis(self.config.batch_window_ms);
        let mut last_batch_time = Instant::now();
        let mut pending_events = Vec::new();

        loop {
            if !*self.running.read() {
                break;
            }

            let timeout = batch_window.saturating_sub(last_batch_time.elapsed());
            match rx.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    for change_event in convert_event(event) {
                        if batcher.add_event(change_event) {
                            pending_events.extend(batcher.take_batch());
                        }
                    }
                }
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }

            if last_batch_time.elapsed() >= batch_window {
                if batcher.has_pending() {
                    pending_events.extend(batcher.take_batch());
                }
                if !pending_events.is_empty() {
                    self.process_events(std::mem::take(&mut pending_events));
                }
                last_batch_time = Instant::now();
            }
        }

        info!("Watch stopped");
        Ok(())
    }

    pub fn stop(&self) {
        *self.running.write() = false;
    }

    /// Failures are logged; a view that failed to rebuild stays disabled until
    /// the next structural change succeeds.
    fn process_events(&self, events: Vec<ChangeEvent>) {
        debug!(event_count = events.len(), "Processing change events");
        let mut session = self.session.lock();
        match session.apply_changes(&events) {
            Ok(()) => info!(event_count = events.len(), "Processed change events"),
            Err(e) => error!(event_count = events.len(), error = %e, "Failed to apply change events"),
        }
    }
}

fn watch_error(message: String) -> ApiError {
    ApiError::StorageError(StorageError::IoError(std::io::Error::new(
        std::io::ErrorKind::Other,
        message,
    )))
}

fn convert_event(event: Event) -> Vec<ChangeEvent> {
    let mut paths = event.paths.into_iter();
    match event.kind {
        EventKind::Create(_) => paths.next().map(ChangeEvent::Created).into_iter().collect(),
        EventKind::Modify(notify::event::ModifyKind::Name(_)) => {
            match (paths.next(), paths.next()) {
                (Some(from), Some(to)) => vec![ChangeEvent::Renamed { from, to }],
                // A lone half of a rename: report whichever side we saw.
                (Some(path), None) if path.exists() => vec![ChangeEvent::Created(path)],
                (Some(path), None) => vec![ChangeEvent::Removed(path)],
                _ => Vec::new(),
            }
        }
        EventKind::Modify(_) => paths.next().map(ChangeEvent::Modified).into_iter().collect(),
        EventKind::Remove(_) => paths.next().map(ChangeEvent::Removed).into_iter().collect(),
        _ => Vec::new(),
    }
}
