//! Session module
//!
//! Owns the latest aggregation snapshot and re-runs the aggregator
//! whenever the fetch context changes.
//!
//! Context changes go through a watch channel. Changes made while a run is
//! in flight coalesce into a single follow-up run with the latest context,
//! so runs never overlap. Each finished run replaces the previous snapshot
//! wholesale.

use crate::display::DisplaySink;
use crate::engine::{AggregationState, Aggregator, FetchContext};
use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Shared, immutable view of an aggregation state
pub type Snapshot = Arc<AggregationState>;

/// Background refresh loop around an [`Aggregator`]
pub struct Session {
    trigger: watch::Sender<FetchContext>,
    snapshots: watch::Receiver<Snapshot>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Session {
    /// Start the refresh loop; the first run begins immediately
    pub fn spawn(aggregator: Arc<Aggregator>, context: FetchContext) -> Self {
        let (trigger, trigger_rx) = watch::channel(context);
        let (snapshot_tx, snapshots) = watch::channel(Arc::new(AggregationState::idle()));
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(refresh_loop(
            aggregator,
            trigger_rx,
            snapshot_tx,
            cancel.clone(),
        ));

        Self {
            trigger,
            snapshots,
            cancel,
            handle: Some(handle),
        }
    }

    /// Replace the fetch context, starting a fresh run
    pub fn set_context(&self, context: FetchContext) {
        self.trigger.send_replace(context);
    }

    /// Re-run with the current parameters under a new generation
    pub fn refresh(&self) -> FetchContext {
        let next = self.trigger.borrow().next_generation();
        self.set_context(next.clone());
        next
    }

    /// Current fetch context
    pub fn context(&self) -> FetchContext {
        self.trigger.borrow().clone()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Wait for a finished run started with the given context
    ///
    /// Fails with `Error::Cancelled` once another context has replaced
    /// `context`, since its run may never be published.
    pub async fn wait_for(&self, context: &FetchContext) -> Result<Snapshot> {
        let mut rx = self.subscribe();
        let snapshot = rx
            .wait_for(|s| {
                (s.is_finished() && &s.context == context) || *self.trigger.borrow() != *context
            })
            .await
            .map_err(|_| Error::Cancelled)?
            .clone();

        if &snapshot.context == context && snapshot.is_finished() {
            Ok(snapshot)
        } else {
            Err(Error::Cancelled)
        }
    }

    /// Rebuild `display` from every finished snapshot
    ///
    /// If the current run has already finished, the display is rebuilt from
    /// it before this returns. Later rebuilds happen on a background task
    /// that ends with the session.
    pub async fn attach_display<D>(&self, display: Arc<RwLock<D>>) -> JoinHandle<()>
    where
        D: DisplaySink + Send + Sync + 'static,
    {
        let mut rx = self.subscribe();
        let current = rx.borrow_and_update().clone();
        if current.is_finished() {
            display.write().await.rebuild(current.listings());
        }

        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }

                let snapshot = rx.borrow_and_update().clone();
                if snapshot.is_finished() {
                    display.write().await.rebuild(snapshot.listings());
                }
            }
        })
    }

    /// Stop the refresh loop, cancelling any run in flight
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Refresh loop ended abnormally");
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("context", &*self.trigger.borrow())
            .field("status", &self.snapshots.borrow().status)
            .finish_non_exhaustive()
    }
}

async fn refresh_loop(
    aggregator: Arc<Aggregator>,
    mut trigger: watch::Receiver<FetchContext>,
    snapshots: watch::Sender<Snapshot>,
    cancel: CancellationToken,
) {
    loop {
        let context = trigger.borrow_and_update().clone();
        debug!(generation = context.generation, "Refreshing listings");

        snapshots.send_replace(Arc::new(AggregationState::loading(&context)));
        match aggregator.fetch_all(&context, &cancel).await {
            Ok(state) => {
                snapshots.send_replace(Arc::new(state));
            }
            Err(e) => {
                warn!(error = %e, "Refresh rejected");
                let mut state = AggregationState::loading(&context);
                state.fail(e);
                snapshots.send_replace(Arc::new(state));
            }
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            changed = trigger.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}
