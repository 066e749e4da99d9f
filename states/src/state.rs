use std::any::{Any, type_name};

use log::warn;

/// Produces an owned, `Send` copy of a value for command snapshots.
///
/// Commands run off the UI thread, so they only ever see clones. Types that
/// return `None` are simply absent from the snapshot.
pub trait SnapshotClone {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        None
    }
}

/// A plain piece of application state stored in [`crate::StateCtx`].
///
/// States are only mutated on the UI thread, either directly through
/// `StateCtx::update`, through a [`crate::Reducer`], or by a value sent with
/// an [`crate::Updater`] and applied during `sync_computes`.
pub trait State: SnapshotClone + Send + 'static {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Replace `self` with a boxed value of the same concrete type.
    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shared `assign_box` body for states.
pub fn state_assign_impl<T: State>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => warn!("assign_box: value is not a {}", type_name::<T>()),
    }
}
