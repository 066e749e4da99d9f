use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flume::Sender;
use log::{debug, warn};

use crate::Action;

/// Message carried from computes and command tasks back to the UI thread.
pub(crate) enum Update {
    /// Replace the state or compute with this `TypeId`.
    Assign {
        id: TypeId,
        value: Box<dyn Any + Send>,
    },
    /// Run an action through its reducer.
    Action {
        id: TypeId,
        action: Box<dyn Any + Send>,
    },
}

/// Send half of the context's update channel.
///
/// Nothing is applied until the owner of the `StateCtx` calls `sync_computes`.
#[derive(Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>) -> Self {
        Self { send }
    }

    /// Replace the state or compute of type `T` on the next sync.
    pub fn set<T: Any + Send>(&self, value: T) {
        let update = Update::Assign {
            id: TypeId::of::<T>(),
            value: Box::new(value),
        };
        if self.send.send(update).is_err() {
            warn!("Updater::set: context dropped, {} lost", type_name::<T>());
        }
    }

    /// Reduce `action` on the next sync, as if dispatched on the UI thread.
    pub fn dispatch<A: Action>(&self, action: A) {
        let kind = action.kind();
        let update = Update::Action {
            id: TypeId::of::<A>(),
            action: Box::new(action),
        };
        if self.send.send(update).is_err() {
            warn!("Updater::dispatch: context dropped, {kind} lost");
        }
    }
}

/// Updater handed to command tasks.
///
/// Every flush of a command bumps that command's generation; updates from an
/// older generation are dropped so a slow response can never overwrite a
/// newer one. Commands that opt out of cancellation get an updater without a
/// generation check.
#[derive(Clone)]
pub struct LatestOnlyUpdater {
    inner: Updater,
    /// `None` when every generation may report.
    latest: Option<Arc<AtomicU64>>,
    generation: u64,
}

impl LatestOnlyUpdater {
    pub(crate) fn new(inner: Updater, latest: Arc<AtomicU64>, generation: u64) -> Self {
        Self {
            inner,
            latest: Some(latest),
            generation,
        }
    }

    pub(crate) fn unchecked(inner: Updater, generation: u64) -> Self {
        Self {
            inner,
            latest: None,
            generation,
        }
    }

    /// Generation of the run this updater belongs to, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once a newer run of a cancelling command was flushed.
    pub fn is_latest(&self) -> bool {
        self.latest
            .as_ref()
            .is_none_or(|latest| latest.load(Ordering::Acquire) == self.generation)
    }

    /// [`Updater::set`], unless this run is stale.
    pub fn set<T: Any + Send>(&self, value: T) {
        if self.is_latest() {
            self.inner.set(value);
        } else {
            debug!(
                "dropping stale {} from generation {}",
                type_name::<T>(),
                self.generation
            );
        }
    }

    /// [`Updater::dispatch`], unless this run is stale.
    pub fn dispatch<A: Action>(&self, action: A) {
        if self.is_latest() {
            self.inner.dispatch(action);
        } else {
            debug!(
                "dropping stale action {} from generation {}",
                action.kind(),
                self.generation
            );
        }
    }
}
