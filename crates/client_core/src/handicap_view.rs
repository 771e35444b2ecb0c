//! The displayed handicap and the requests that refresh it.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::HandicapApi;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load handicap";

#[derive(Debug, Clone, PartialEq)]
pub enum HandicapSnapshot {
    Loading,
    Error(String),
    /// `None` means no rounds are recorded yet, which is not a handicap of 0.
    Available(Option<f64>),
}

impl HandicapSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self, HandicapSnapshot::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RefreshRejected {
    #[error("a handicap refresh is already in progress")]
    AlreadyLoading,
}

/// Holds the single handicap value shown to the user.
///
/// Every transition replaces the whole snapshot, so subscribers only ever
/// observe `Loading`, `Error` or `Available`.
pub struct HandicapViewState {
    api: Arc<dyn HandicapApi>,
    snapshot: watch::Sender<HandicapSnapshot>,
}

impl HandicapViewState {
    /// Starts in `Loading` without issuing a request.
    pub fn new(api: Arc<dyn HandicapApi>) -> Arc<Self> {
        let (snapshot, _) = watch::channel(HandicapSnapshot::Loading);
        Arc::new(Self { api, snapshot })
    }

    /// Creates the view state and performs the initial refresh.
    pub async fn start(api: Arc<dyn HandicapApi>) -> Arc<Self> {
        let state = Self::new(api);
        state.refresh().await;
        state
    }

    pub fn snapshot(&self) -> HandicapSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<HandicapSnapshot> {
        self.snapshot.subscribe()
    }

    /// Whether the manual refresh action is available.
    pub fn refresh_enabled(&self) -> bool {
        !self.snapshot.borrow().is_loading()
    }

    /// Fetches the handicap and settles in `Available` or `Error`. Backend
    /// failures are logged and absorbed.
    pub async fn refresh(&self) -> HandicapSnapshot {
        let mut pending = PendingLoad::begin(&self.snapshot);

        let next = match self.api.fetch_handicap().await {
            Ok(value) => {
                info!(handicap = ?value, "handicap refreshed");
                HandicapSnapshot::Available(value)
            }
            Err(err) => {
                error!(error = %err, "failed to fetch handicap");
                HandicapSnapshot::Error(LOAD_FAILED_MESSAGE.to_string())
            }
        };

        pending.settle(next.clone());
        next
    }

    /// The manual "Refresh" action: refused while a load is in progress.
    pub async fn request_refresh(&self) -> Result<HandicapSnapshot, RefreshRejected> {
        if !self.refresh_enabled() {
            warn!("refresh requested while handicap is still loading");
            return Err(RefreshRejected::AlreadyLoading);
        }
        Ok(self.refresh().await)
    }
}

/// Publishes `Loading` and guarantees a terminal snapshot follows, even if
/// the refresh future is dropped or the backend call panics.
struct PendingLoad<'a> {
    snapshot: &'a watch::Sender<HandicapSnapshot>,
    settled: bool,
}

impl<'a> PendingLoad<'a> {
    fn begin(snapshot: &'a watch::Sender<HandicapSnapshot>) -> Self {
        snapshot.send_replace(HandicapSnapshot::Loading);
        Self {
            snapshot,
            settled: false,
        }
    }

    fn settle(&mut self, next: HandicapSnapshot) {
        self.snapshot.send_replace(next);
        self.settled = true;
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.snapshot
                .send_replace(HandicapSnapshot::Error(LOAD_FAILED_MESSAGE.to_string()));
        }
    }
}

#[cfg(test)]
#[path = "tests/handicap_view_tests.rs"]
mod tests;
