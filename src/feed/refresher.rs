//! Background task that re-reads the feed snapshot on a timer or on request.

use crate::app::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval};

use super::source::FileFeedSource;

/// A request to bring the master list up to date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Real positions the screen asked for, or `None` for every feed.
    pub positions: Option<Vec<usize>>,
}

impl RefreshRequest {
    pub fn all() -> Self {
        Self { positions: None }
    }

    pub fn positions(positions: Vec<usize>) -> Self {
        Self {
            positions: Some(positions),
        }
    }
}

/// Spawn the background task that keeps the shared master list current.
///
/// The task reloads the snapshot file on every request and, when `period` is
/// set, on a fixed schedule. Each attempt ends with exactly one
/// `FeedsRefreshed` or `RefreshFailed` event. The task exits when either
/// channel closes.
///
/// The snapshot file always carries every feed, so `positions` only narrows
/// what gets logged.
pub fn spawn_refresher(
    source: FileFeedSource,
    period: Option<Duration>,
    mut requests: mpsc::Receiver<RefreshRequest>,
    event_tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = period
            .filter(|p| !p.is_zero())
            .map(|p| tokio::time::interval_at(Instant::now() + p, p));

        loop {
            let request = tokio::select! {
                maybe = requests.recv() => match maybe {
                    Some(request) => request,
                    None => break,
                },
                _ = next_tick(&mut ticker) => RefreshRequest::all(),
            };

            match &request.positions {
                Some(positions) => {
                    tracing::info!(feeds = positions.len(), "Refreshing selected feeds")
                }
                None => tracing::info!("Refreshing all feeds"),
            }

            let event = match source.reload().await {
                Ok(count) => AppEvent::FeedsRefreshed { count },
                Err(e) => {
                    tracing::warn!(error = %e, path = %source.path().display(), "Feed refresh failed");
                    AppEvent::RefreshFailed {
                        error: e.to_string(),
                    }
                }
            };

            if event_tx.send(event).await.is_err() {
                tracing::debug!("Event receiver dropped, stopping refresher");
                break;
            }
        }
    })
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
