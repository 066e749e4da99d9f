//! Reactive state context for the Truthy admin client.
//!
//! - [`State`]: plain data owned by the UI thread.
//! - [`Reducer`] + [`Action`]: states that change only by folding labelled actions.
//! - [`Compute`]: derived values, recomputed when their dependencies change.
//! - [`Command`]: side effects; they get a snapshot and report back through an updater.
//! - [`StateCtx::watch`]: enqueue a command when a selected part of a state changes.

mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod graph;
mod reducer;
mod snapshot;
mod state;
mod state_sync_status;
mod task;
mod updater;

pub use command::{Command, CommandFuture};
pub use compute::{Compute, ComputeDeps, assign_impl};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use graph::{DepRoute, Graph, TopologyError};
pub use reducer::{Action, Reducer};
pub use snapshot::CommandSnapshot;
pub use state::{SnapshotClone, State, state_assign_impl};
pub use state_sync_status::StateSyncStatus;
pub use task::{TaskHandle, TaskId};
pub use updater::{LatestOnlyUpdater, Updater};

#[cfg(test)]
mod state_ctx_test {
    use std::any::{Any, TypeId};

    use tokio_util::sync::CancellationToken;

    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Counter {
        page: u32,
        label: String,
        queried_with: Vec<String>,
    }

    #[derive(Debug)]
    enum CounterAction {
        SetPage(u32),
        SetLabel(String),
        Reload,
        Loaded(String),
    }

    impl Action for CounterAction {
        type Target = Counter;

        fn kind(&self) -> &'static str {
            match self {
                Self::SetPage(_) => "SET_PAGE",
                Self::SetLabel(_) => "SET_LABEL",
                Self::Reload => "RELOAD",
                Self::Loaded(_) => "LOADED",
            }
        }
    }

    impl Reducer for Counter {
        type Action = CounterAction;

        fn reduce(&mut self, action: CounterAction) {
            match action {
                CounterAction::SetPage(page) => self.page = page,
                CounterAction::SetLabel(label) => self.label = label,
                CounterAction::Reload => {}
                CounterAction::Loaded(label) => self.queried_with.push(label),
            }
        }
    }

    impl SnapshotClone for Counter {
        fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
            Some(Box::new(self.clone()))
        }
    }

    impl State for Counter {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            state_assign_impl(self, new_self);
        }
    }

    /// Echoes the label it saw in its snapshot back as `Loaded`.
    struct EchoCommand;

    impl Command for EchoCommand {
        fn run(
            &self,
            snap: CommandSnapshot,
            updater: LatestOnlyUpdater,
            _cancel: CancellationToken,
        ) -> CommandFuture {
            let label = snap.state::<Counter>().label.clone();
            Box::pin(async move {
                updater.dispatch(CounterAction::Loaded(label));
            })
        }
    }

    /// Same as [`EchoCommand`], but every run reports.
    struct EchoEveryCommand;

    impl Command for EchoEveryCommand {
        fn run(
            &self,
            snap: CommandSnapshot,
            updater: LatestOnlyUpdater,
            cancel: CancellationToken,
        ) -> CommandFuture {
            EchoCommand.run(snap, updater, cancel)
        }

        fn cancel_previous(&self) -> bool {
            false
        }
    }

    #[derive(Debug, Default, Clone)]
    struct DoubledPage {
        value: u32,
    }

    impl SnapshotClone for DoubledPage {}

    impl Compute for DoubledPage {
        fn deps(&self) -> ComputeDeps {
            (vec![TypeId::of::<Counter>()], vec![])
        }

        fn compute(&self, deps: Dep<'_>, updater: Updater) {
            let page = deps.get_state_ref::<Counter>().page;
            updater.set(Self { value: page * 2 });
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            assign_impl(self, new_self);
        }
    }

    fn setup() -> StateCtx {
        let mut ctx = StateCtx::new();
        ctx.add_reducer(Counter::default());
        ctx.record_command(EchoCommand);
        ctx.record_command(EchoEveryCommand);
        ctx
    }

    #[test]
    fn dispatch_action_reduces_synchronously() {
        let mut ctx = setup();

        ctx.dispatch_action(CounterAction::SetPage(3));

        assert_eq!(ctx.state::<Counter>().page, 3);
        assert_eq!(ctx.state_status::<Counter>(), Some(StateSyncStatus::Dirty));
    }

    #[test]
    fn on_action_enqueues_only_matching_actions() {
        let mut ctx = setup();
        ctx.on_action::<CounterAction, EchoCommand>(|a| matches!(a, CounterAction::Reload));

        ctx.dispatch_action(CounterAction::SetLabel("x".to_owned()));
        assert_eq!(ctx.queued_commands(), 0);

        ctx.dispatch_action(CounterAction::Reload);
        assert_eq!(ctx.queued_commands(), 1);
    }

    #[tokio::test]
    async fn command_snapshot_sees_actions_reduced_before_it() {
        let mut ctx = setup();
        ctx.on_action::<CounterAction, EchoCommand>(|a| matches!(a, CounterAction::Reload));

        ctx.dispatch_action(CounterAction::SetLabel("alpha".to_owned()));
        ctx.dispatch_action(CounterAction::Reload);
        ctx.flush_commands();
        ctx.await_tasks().await;

        assert_eq!(ctx.state::<Counter>().queried_with, vec!["alpha".to_owned()]);
    }

    #[test]
    fn watch_fires_once_per_distinct_key() {
        let mut ctx = setup();
        ctx.watch::<Counter, u32, EchoCommand>(|c| Some(c.page));

        ctx.run_effects();
        assert_eq!(ctx.queued_commands(), 1, "first observation counts as mount");

        ctx.run_effects();
        ctx.dispatch_action(CounterAction::SetLabel("unrelated".to_owned()));
        ctx.run_effects();
        assert_eq!(ctx.queued_commands(), 1);

        ctx.dispatch_action(CounterAction::SetPage(2));
        ctx.run_effects();
        ctx.run_effects();
        assert_eq!(ctx.queued_commands(), 2);
    }

    #[test]
    fn inactive_watch_rearms_on_next_key() {
        let mut ctx = setup();
        ctx.watch::<Counter, u32, EchoCommand>(|c| (!c.label.is_empty()).then_some(c.page));

        ctx.run_effects();
        assert_eq!(ctx.queued_commands(), 0);

        ctx.dispatch_action(CounterAction::SetLabel("shown".to_owned()));
        ctx.run_effects();
        assert_eq!(ctx.queued_commands(), 1);

        ctx.dispatch_action(CounterAction::SetLabel(String::new()));
        ctx.run_effects();
        ctx.dispatch_action(CounterAction::SetLabel("shown again".to_owned()));
        ctx.run_effects();
        assert_eq!(ctx.queued_commands(), 2, "same page, but the watcher was re-armed");
    }

    #[test]
    fn compute_follows_its_dependency() {
        let mut ctx = setup();
        ctx.record_compute(DoubledPage::default());

        ctx.run_computed();
        assert_eq!(ctx.compute::<DoubledPage>().value, 0);

        ctx.dispatch_action(CounterAction::SetPage(4));
        ctx.run_computed();
        assert_eq!(ctx.compute::<DoubledPage>().value, 8);
    }

    #[tokio::test]
    async fn stale_generation_updates_are_dropped() {
        let mut ctx = setup();
        ctx.update::<Counter>(|c| c.label = "first".to_owned());
        ctx.dispatch::<EchoCommand>();
        ctx.update::<Counter>(|c| c.label = "second".to_owned());
        ctx.dispatch::<EchoCommand>();

        ctx.await_tasks().await;

        assert_eq!(ctx.state::<Counter>().queried_with, vec!["second".to_owned()]);
        let running = ctx.running_task::<EchoCommand>().expect("recorded");
        assert_eq!(running.map(|id| id.generation()), Some(2));
    }

    #[tokio::test]
    async fn non_cancelling_command_reports_every_run() {
        let mut ctx = setup();
        ctx.update::<Counter>(|c| c.label = "first".to_owned());
        ctx.dispatch::<EchoEveryCommand>();
        ctx.update::<Counter>(|c| c.label = "second".to_owned());
        ctx.dispatch::<EchoEveryCommand>();

        ctx.await_tasks().await;

        let mut seen = ctx.state::<Counter>().queried_with.clone();
        seen.sort();
        assert_eq!(seen, vec!["first".to_owned(), "second".to_owned()]);
    }

    #[tokio::test]
    async fn snapshot_is_taken_when_enqueued() {
        let mut ctx = setup();
        ctx.on_action::<CounterAction, EchoEveryCommand>(|a| matches!(a, CounterAction::SetLabel(_)));

        ctx.dispatch_action(CounterAction::SetLabel("one".to_owned()));
        ctx.dispatch_action(CounterAction::SetLabel("two".to_owned()));
        ctx.flush_commands();
        ctx.await_tasks().await;

        let mut seen = ctx.state::<Counter>().queried_with.clone();
        seen.sort();
        assert_eq!(seen, vec!["one".to_owned(), "two".to_owned()]);
    }

    #[test]
    fn missing_state_is_an_error() {
        let ctx = StateCtx::new();
        let err = ctx.try_state::<Counter>().expect_err("not added");
        assert!(err.to_string().contains("Counter"));
    }
}
