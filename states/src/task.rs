//! Bookkeeping for command tasks.
//!
//! Each flushed command gets a [`TaskHandle`] whose [`TaskId`] pairs the
//! command's `TypeId` with a generation counter. Flushing the same command
//! again cancels the previous handle's token.

use std::any::TypeId;

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    command: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(command: TypeId, generation: u64) -> Self {
        Self {
            command,
            generation,
        }
    }

    pub fn command(&self) -> TypeId {
        self.command
    }

    /// Higher generations were flushed more recently.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Cooperative cancellation handle for one command task.
///
/// Cancelling does not abort the future; the task is expected to watch
/// `cancellation_token()` at its await points.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Signal the run to stop; it still has to observe the token.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Query;
    struct Sync;

    #[test]
    fn task_ids_differ_by_command_and_generation() {
        let first = TaskId::new(TypeId::of::<Query>(), 1);

        assert_eq!(first, TaskId::new(TypeId::of::<Query>(), 1));
        assert_ne!(first, TaskId::new(TypeId::of::<Query>(), 2));
        assert_ne!(first, TaskId::new(TypeId::of::<Sync>(), 1));
        assert_eq!(first.command(), TypeId::of::<Query>());
        assert_eq!(first.generation(), 1);
    }

    #[test]
    fn cloned_handles_share_cancellation() {
        let handle = TaskHandle::new(
            TaskId::new(TypeId::of::<Query>(), 3),
            CancellationToken::new(),
        );
        let cloned = handle.clone();
        let token = handle.cancellation_token();

        assert!(!cloned.is_cancelled());
        handle.cancel();
        assert!(cloned.is_cancelled());
        assert!(token.is_cancelled());
    }
}
