//! Periodic and event-driven advisory refresh.
//!
//! The original consumer of this engine re-fetches its forecast every 15
//! minutes and opportunistically when the app regains focus. This module
//! packages that policy: a background task publishes advisory states on a
//! watch channel, `refresh()` schedules an immediate re-fetch, and dropping
//! the watcher cancels the task so no fetch cycle outlives its consumer.
//!
//! Climate normals ride the normals client's cache, so interval ticks only
//! cost a forecast fetch; refreshing normals stays an explicit
//! `force_refresh` call on the client.

use crate::frostcast::{Advisory, Frostcast};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

/// Refresh cadence used when none is given: 15 minutes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// The lifecycle states a watched advisory moves through.
///
/// Kept as three distinct states so the presentation layer never collapses
/// "still loading", "failed", and "loaded but no risk" into one rendering.
#[derive(Debug, Clone)]
pub enum AdvisoryState {
    /// No fetch has completed yet.
    Loading,
    /// The most recent fetch succeeded.
    Ready(Advisory),
    /// The most recent fetch failed; the message describes the error.
    Failed(String),
}

/// Handle to a background advisory refresh loop.
///
/// Dropping the watcher aborts the loop.
pub struct AdvisoryWatcher {
    state: watch::Receiver<AdvisoryState>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl AdvisoryWatcher {
    /// A receiver over the advisory states; every fetch publishes one.
    pub fn state(&self) -> watch::Receiver<AdvisoryState> {
        self.state.clone()
    }

    /// Schedules an immediate re-fetch, e.g. when the app regains focus.
    ///
    /// Safe to call at any time; redundant calls while a fetch is already
    /// underway coalesce into a single follow-up fetch.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }
}

impl Drop for AdvisoryWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl Frostcast {
    /// Spawns a refresh loop for a ZIP code.
    ///
    /// The loop fetches the advisory, publishes the resulting
    /// [`AdvisoryState`], then sleeps for `interval` (default
    /// [`DEFAULT_REFRESH_INTERVAL`]) or until [`AdvisoryWatcher::refresh`]
    /// wakes it, whichever comes first. Fetch failures are published as
    /// [`AdvisoryState::Failed`] and the loop keeps going; a later tick may
    /// succeed.
    pub fn watch_advisory(
        self: &Arc<Self>,
        zip: impl Into<String>,
        interval: Option<Duration>,
    ) -> AdvisoryWatcher {
        let zip = zip.into();
        let interval = interval.unwrap_or(DEFAULT_REFRESH_INTERVAL);
        let (tx, rx) = watch::channel(AdvisoryState::Loading);
        let refresh = Arc::new(Notify::new());

        let client = Arc::clone(self);
        let wakeup = Arc::clone(&refresh);
        let task = tokio::spawn(async move {
            loop {
                let state = match client.get_advisory().zip(&zip).call().await {
                    Ok(advisory) => AdvisoryState::Ready(advisory),
                    Err(e) => {
                        warn!("Advisory refresh for ZIP {zip} failed: {e}");
                        AdvisoryState::Failed(e.to_string())
                    }
                };
                if tx.send(state).is_err() {
                    // Receiver and watcher handle are both gone.
                    break;
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = wakeup.notified() => {
                        info!("Immediate advisory refresh requested for ZIP {zip}");
                    }
                }
            }
        });

        AdvisoryWatcher {
            state: rx,
            refresh,
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::client::ForecastClient;
    use crate::normals::client::NormalsClient;
    use crate::stations::station_index::StationIndex;

    fn offline_client() -> Arc<Frostcast> {
        Arc::new(
            Frostcast::builder()
                .station_index(StationIndex::bundled().unwrap())
                .normals(
                    NormalsClient::builder()
                        .token("test-token".to_string())
                        .base_url("http://127.0.0.1:9".to_string())
                        .build(),
                )
                .forecast(
                    ForecastClient::builder()
                        .base_url("http://127.0.0.1:9".to_string())
                        .build(),
                )
                .build(),
        )
    }

    #[tokio::test]
    async fn watcher_publishes_ready_for_unknown_zip() {
        let client = offline_client();
        // Unknown ZIP resolves without the network, so the first tick
        // publishes a Ready(unavailable) state.
        let watcher = client.watch_advisory("99999", Some(Duration::from_secs(3600)));

        let mut rx = watcher.state();
        rx.changed().await.expect("first state should arrive");
        match &*rx.borrow() {
            AdvisoryState::Ready(advisory) => {
                assert!(advisory.station.is_none());
            }
            other => panic!("expected Ready, got {other:?}"),
        };
    }

    #[tokio::test]
    async fn watcher_publishes_failure_and_keeps_running() {
        let client = offline_client();
        let watcher = client.watch_advisory("02108", Some(Duration::from_secs(3600)));

        let mut rx = watcher.state();
        rx.changed().await.expect("first state should arrive");
        assert!(matches!(&*rx.borrow(), AdvisoryState::Failed(_)));

        // Focus-style refresh wakes the loop before the hour-long interval.
        watcher.refresh();
        rx.changed().await.expect("refresh should produce a state");
        assert!(matches!(&*rx.borrow(), AdvisoryState::Failed(_)));
    }

    #[tokio::test]
    async fn dropping_watcher_cancels_the_loop() {
        let client = offline_client();
        let watcher = client.watch_advisory("99999", Some(Duration::from_millis(1)));
        let mut rx = watcher.state();
        rx.changed().await.unwrap();

        drop(watcher);
        // With the task aborted the sender is dropped; changed() now errors
        // once the current value has been seen.
        let _ = rx.borrow_and_update();
        assert!(rx.changed().await.is_err());
    }
}
