use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, LatestOnlyUpdater};

pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A side effect triggered explicitly, never as part of a compute pass.
///
/// `run` is called on the UI thread with the snapshot taken when the command
/// was enqueued; the returned future is spawned and reports back only through
/// `updater`.
pub trait Command: Send + Sync + 'static {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        cancel: CancellationToken,
    ) -> CommandFuture;

    /// Whether a new run cancels the one still in flight and mutes its updates.
    ///
    /// Reads (list queries) keep the default. Writes return `false`: every
    /// enqueued run is sent and reports back, in whatever order they finish.
    fn cancel_previous(&self) -> bool {
        true
    }
}
