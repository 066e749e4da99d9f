use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flume::{Receiver, Sender};
use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::reducer::{KindFn, ReduceFn, action_kind, reduce_boxed};
use crate::updater::Update;
use crate::{
    Action, Command, CommandFuture, CommandSnapshot, Compute, Dep, Error, Graph,
    LatestOnlyUpdater, Reducer, State, StateSyncStatus, TaskHandle, TaskId, TopologyError,
    Updater,
};

pub(crate) struct StateSlot {
    pub(crate) value: Box<dyn State>,
    pub(crate) status: StateSyncStatus,
}

pub(crate) struct ComputeSlot {
    pub(crate) value: Box<dyn Compute>,
    pub(crate) status: StateSyncStatus,
}

struct ReducerSlot {
    state: TypeId,
    reduce: ReduceFn,
    kind: KindFn,
}

/// Command enqueued after an action of a given type is reduced.
struct ActionListener {
    matches: Box<dyn Fn(&dyn Any) -> bool + Send>,
    command: TypeId,
}

/// Command enqueued when a selected key of a state changes.
struct Watcher {
    state: TypeId,
    changed: Box<dyn FnMut(&dyn State) -> bool + Send>,
    command: TypeId,
}

/// A command waiting for the next flush, with the context as it was when it
/// was enqueued.
struct Queued {
    command: TypeId,
    snap: CommandSnapshot,
}

struct CommandSlot {
    command: Arc<dyn Command>,
    name: &'static str,
    latest: Arc<AtomicU64>,
    running: Option<TaskHandle>,
}

/// The application state container.
///
/// Everything runs on the thread that owns the context; spawned command tasks
/// talk back only through the update channel drained by [`Self::sync_computes`].
///
/// A frame of the host loop is expected to look like:
///
/// ```ignore
/// ctx.sync_computes();   // apply results from tasks
/// ctx.run_computed();    // refresh derived values
/// render(&mut ctx);      // read states, dispatch actions
/// ctx.flush_commands();  // run watchers, spawn queued commands
/// ```
///
/// A command's snapshot is taken when it is enqueued, so two actions reduced
/// in the same frame each reach their command with their own payload.
pub struct StateCtx {
    states: BTreeMap<TypeId, StateSlot>,
    computes: BTreeMap<TypeId, ComputeSlot>,
    compute_order: Vec<TypeId>,

    reducers: BTreeMap<TypeId, ReducerSlot>,
    listeners: BTreeMap<TypeId, Vec<ActionListener>>,
    watchers: Vec<Watcher>,

    commands: BTreeMap<TypeId, CommandSlot>,
    queue: VecDeque<Queued>,

    send: Sender<Update>,
    recv: Receiver<Update>,

    #[cfg(not(target_arch = "wasm32"))]
    tasks: tokio::task::JoinSet<()>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .field("commands", &self.commands.len())
            .field("queued", &self.queue.len())
            .field("tasks", &self.task_count())
            .finish()
    }
}

impl StateCtx {
    /// An empty context with its own update channel.
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            compute_order: Vec::new(),
            reducers: BTreeMap::new(),
            listeners: BTreeMap::new(),
            watchers: Vec::new(),
            commands: BTreeMap::new(),
            queue: VecDeque::new(),
            send,
            recv,
            #[cfg(not(target_arch = "wasm32"))]
            tasks: tokio::task::JoinSet::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    /// Register `state`, replacing any previous value of the same type.
    pub fn add_state<T: State>(&mut self, state: T) {
        self.states.insert(
            TypeId::of::<T>(),
            StateSlot {
                value: Box::new(state),
                status: StateSyncStatus::Init,
            },
        );
    }

    /// Add a state that is driven by actions of type `T::Action`.
    pub fn add_reducer<T: Reducer>(&mut self, state: T) {
        self.add_state(state);
        self.reducers.insert(
            TypeId::of::<T::Action>(),
            ReducerSlot {
                state: TypeId::of::<T>(),
                reduce: reduce_boxed::<T>,
                kind: action_kind::<T::Action>,
            },
        );
    }

    /// # Panics
    /// Panics if the compute dependencies form a cycle; that is a wiring
    /// mistake, not a runtime condition.
    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        self.computes.insert(
            TypeId::of::<T>(),
            ComputeSlot {
                value: Box::new(compute),
                status: StateSyncStatus::Init,
            },
        );
        if let Err(err) = self.rebuild_compute_order() {
            panic!("invalid compute dependencies after adding {}: {err}", type_name::<T>());
        }
    }

    /// Register `command` so it can be enqueued by type.
    ///
    /// Nothing runs until the command is enqueued and flushed.
    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(
            TypeId::of::<T>(),
            CommandSlot {
                command: Arc::new(command),
                name: type_name::<T>(),
                latest: Arc::new(AtomicU64::new(0)),
                running: None,
            },
        );
    }

    /// Enqueue `C` every time an action of type `A` matching `filter` is reduced.
    pub fn on_action<A: Action, C: Command>(&mut self, filter: fn(&A) -> bool) {
        self.listeners
            .entry(TypeId::of::<A>())
            .or_default()
            .push(ActionListener {
                matches: Box::new(move |action: &dyn Any| action.downcast_ref::<A>().is_some_and(filter)),
                command: TypeId::of::<C>(),
            });
    }

    /// Enqueue `C` whenever `select(state)` yields a key different from the
    /// last one. `None` means the watcher is inactive: nothing fires and the
    /// next `Some` counts as a change again.
    pub fn watch<S, K, C>(&mut self, select: fn(&S) -> Option<K>)
    where
        S: State,
        K: PartialEq + Send + 'static,
        C: Command,
    {
        let mut last: Option<K> = None;
        self.watchers.push(Watcher {
            state: TypeId::of::<S>(),
            changed: Box::new(move |state: &dyn State| {
                let Some(state) = state.as_any().downcast_ref::<S>() else {
                    return false;
                };
                match select(state) {
                    None => {
                        last = None;
                        false
                    }
                    Some(key) if last.as_ref() == Some(&key) => false,
                    Some(key) => {
                        last = Some(key);
                        true
                    }
                }
            }),
            command: TypeId::of::<C>(),
        });
    }

    /// Check that the compute dependencies form a DAG.
    ///
    /// # Errors
    /// Returns the cycle found by the topological sort.
    pub fn verify_deps(&self) -> Result<(), TopologyError<TypeId>> {
        self.dependency_graph().topology_sort().map(|_| ())
    }

    fn dependency_graph(&self) -> Graph<TypeId> {
        let mut graph = Graph::new();
        for (id, slot) in &self.computes {
            graph.add_node(*id);
            let (states, computes) = slot.value.deps();
            for dep in states.into_iter().chain(computes) {
                graph.route_to(dep, *id);
            }
        }
        graph
    }

    fn rebuild_compute_order(&mut self) -> Result<(), TopologyError<TypeId>> {
        let order = self.dependency_graph().topology_sort()?;
        self.compute_order = order
            .into_iter()
            .filter(|id| self.computes.contains_key(id))
            .collect();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Reading
    // ---------------------------------------------------------------------

    /// # Errors
    /// Returns [`Error::StateNotFound`] when `T` was never added.
    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.as_any().downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found::<T>("StateCtx::state"))
    }

    /// # Panics
    /// Panics if `T` was never added.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>().unwrap_or_else(|e| panic!("{e}"))
    }

    /// Mutable access; marks the state dirty.
    ///
    /// # Panics
    /// Panics if `T` was never added.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let slot = self
            .states
            .get_mut(&TypeId::of::<T>())
            .unwrap_or_else(|| panic!("{}", Error::state_not_found::<T>("StateCtx::state_mut")));
        slot.status = StateSyncStatus::Dirty;
        slot.value
            .as_any_mut()
            .downcast_mut::<T>()
            .unwrap_or_else(|| panic!("{}", Error::state_not_found::<T>("StateCtx::state_mut")))
    }

    /// Mutate `T` in place; same dirty marking as [`Self::state_mut`].
    ///
    /// # Panics
    /// Panics if `T` was never added.
    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    /// Sync status of `T`, `None` when it was never added.
    pub fn state_status<T: State>(&self) -> Option<StateSyncStatus> {
        self.states.get(&TypeId::of::<T>()).map(|slot| slot.status)
    }

    /// Last computed value of `T`, `None` when it was never recorded.
    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was never recorded.
    pub fn compute<T: Compute>(&self) -> &T {
        self.cached::<T>()
            .unwrap_or_else(|| panic!("{}", Error::compute_not_found::<T>("StateCtx::compute")))
    }

    /// A handle for sending updates from outside the UI thread.
    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    // ---------------------------------------------------------------------
    // Actions
    // ---------------------------------------------------------------------

    /// Reduce `action` into its target state right away, then enqueue any
    /// command listening for it.
    pub fn dispatch_action<A: Action>(&mut self, action: A) {
        self.apply_action(TypeId::of::<A>(), Box::new(action));
    }

    fn apply_action(&mut self, id: TypeId, action: Box<dyn Any + Send>) {
        let Some(reducer) = self.reducers.get(&id) else {
            warn!("no reducer registered for action {id:?}");
            return;
        };
        debug!("reduce {}", (reducer.kind)(action.as_ref()));

        // Listeners match before the action is consumed, but are queued after
        // the reduce so their snapshot sees the new state.
        let triggered: Vec<TypeId> = self
            .listeners
            .get(&id)
            .into_iter()
            .flatten()
            .filter(|listener| (listener.matches)(action.as_ref()))
            .map(|listener| listener.command)
            .collect();

        match self.states.get_mut(&reducer.state) {
            Some(slot) => {
                (reducer.reduce)(slot.value.as_mut(), action);
                slot.status = StateSyncStatus::Dirty;
            }
            None => warn!("reducer state {:?} was never added", reducer.state),
        }

        for command in triggered {
            self.enqueue(command);
        }
    }

    // ---------------------------------------------------------------------
    // Computes
    // ---------------------------------------------------------------------

    /// Apply everything sent through [`Updater`]s since the last call.
    pub fn sync_computes(&mut self) {
        let pending: Vec<Update> = self.recv.try_iter().collect();
        for update in pending {
            match update {
                Update::Assign { id, value } => self.assign(id, value),
                Update::Action { id, action } => self.apply_action(id, action),
            }
        }
    }

    fn assign(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        if let Some(slot) = self.computes.get_mut(&id) {
            slot.value.assign_box(value);
            slot.status = StateSyncStatus::Dirty;
        } else if let Some(slot) = self.states.get_mut(&id) {
            slot.value.assign_box(value);
            slot.status = StateSyncStatus::Dirty;
        } else {
            warn!("update for unregistered type {id:?} dropped");
        }
    }

    /// Recompute every compute whose dependencies changed, in dependency order.
    pub fn run_computed(&mut self) {
        for id in self.compute_order.clone() {
            let Some(slot) = self.computes.get(&id) else {
                continue;
            };
            let (state_deps, compute_deps) = slot.value.deps();
            let stale = slot.status == StateSyncStatus::Init
                || state_deps.iter().any(|dep| {
                    self.states
                        .get(dep)
                        .is_some_and(|s| s.status.needs_compute())
                })
                || compute_deps.iter().any(|dep| {
                    self.computes
                        .get(dep)
                        .is_some_and(|c| c.status == StateSyncStatus::Dirty)
                });
            if !stale {
                continue;
            }

            slot.value
                .compute(Dep::new(&self.states, &self.computes), self.updater());
            if let Some(slot) = self.computes.get_mut(&id) {
                slot.status = StateSyncStatus::Clean;
            }
            // Later computes in the order may read this one.
            self.sync_computes();
        }

        for slot in self.states.values_mut() {
            slot.status = StateSyncStatus::Clean;
        }
        for slot in self.computes.values_mut() {
            slot.status = StateSyncStatus::Clean;
        }
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    /// Queue `T` with a snapshot of the current context.
    pub fn enqueue_command<T: Command>(&mut self) {
        self.enqueue(TypeId::of::<T>());
    }

    fn enqueue(&mut self, command: TypeId) {
        let snap = self.snapshot();
        self.queue.push_back(Queued { command, snap });
    }

    /// Enqueue and flush immediately.
    pub fn dispatch<T: Command>(&mut self) {
        self.enqueue_command::<T>();
        self.flush_commands();
    }

    /// Commands waiting for the next flush.
    pub fn queued_commands(&self) -> usize {
        self.queue.len()
    }

    /// Fire watchers whose selected key changed.
    pub fn run_effects(&mut self) {
        let mut fired = Vec::new();
        for watcher in &mut self.watchers {
            let Some(slot) = self.states.get(&watcher.state) else {
                continue;
            };
            if (watcher.changed)(slot.value.as_ref()) {
                fired.push(watcher.command);
            }
        }
        for command in fired {
            self.enqueue(command);
        }
    }

    /// Run watchers, then spawn every queued command in FIFO order.
    pub fn flush_commands(&mut self) {
        self.run_effects();

        while let Some(Queued { command: id, snap }) = self.queue.pop_front() {
            let Some(slot) = self.commands.get_mut(&id) else {
                warn!("command {id:?} is not recorded; dropped");
                continue;
            };

            let latest_only = slot.command.cancel_previous();
            if let Some(previous) = slot.running.take().filter(|_| latest_only) {
                previous.cancel();
            }
            let generation = slot.latest.fetch_add(1, Ordering::AcqRel) + 1;
            let token = CancellationToken::new();
            slot.running = Some(TaskHandle::new(TaskId::new(id, generation), token.clone()));

            info!("run {} (generation {generation})", slot.name);
            let inner = Updater::new(self.send.clone());
            let updater = if latest_only {
                LatestOnlyUpdater::new(inner, slot.latest.clone(), generation)
            } else {
                LatestOnlyUpdater::unchecked(inner, generation)
            };
            let future = slot.command.run(snap, updater, token);
            self.spawn(future);
        }
    }

    fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        for (id, slot) in &self.states {
            if let Some(value) = slot.value.clone_boxed() {
                snap.insert_state(*id, value);
            }
        }
        for (id, slot) in &self.computes {
            if let Some(value) = slot.value.clone_boxed() {
                snap.insert_compute(*id, value);
            }
        }
        snap
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn(&mut self, future: CommandFuture) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                self.tasks.spawn_on(future, &handle);
            }
            Err(err) => error!("no Tokio runtime to run command on: {err}"),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn(&mut self, future: CommandFuture) {
        wasm_bindgen_futures::spawn_local(future);
    }

    /// Spawned command tasks not yet joined.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn task_count(&self) -> usize {
        0
    }

    /// Direct access for hosts that drive the tasks themselves.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn task_set_mut(&mut self) -> &mut tokio::task::JoinSet<()> {
        &mut self.tasks
    }

    /// Drop finished tasks from the set without blocking. Call once per frame.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn reap_tasks(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(err) = result {
                error!("command task failed: {err}");
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn reap_tasks(&mut self) {}

    /// Wait for every spawned task, syncing after each one finishes.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn await_tasks(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(err) = result {
                error!("command task failed: {err}");
            }
            self.sync_computes();
        }
        self.sync_computes();
    }

    /// Id of the newest run of `T`, if it was ever flushed.
    ///
    /// # Errors
    /// Returns [`Error::CommandNotFound`] when `T` was never recorded.
    pub fn running_task<T: Command>(&self) -> Result<Option<TaskId>, Error> {
        self.commands
            .get(&TypeId::of::<T>())
            .map(|slot| slot.running.as_ref().map(TaskHandle::id))
            .ok_or_else(Error::command_not_found::<T>)
    }
}
