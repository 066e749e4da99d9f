use std::any::{Any, TypeId, type_name};

use log::warn;

use crate::{Dep, SnapshotClone, Updater};

/// `(state ids, compute ids)` a compute reads from.
pub type ComputeDeps = (Vec<TypeId>, Vec<TypeId>);

/// Derived value that is recalculated when one of its dependencies changes.
///
/// `compute` must stay free of side effects: it reads through [`Dep`] and
/// publishes the new value with [`Updater::set`]. Network work belongs in a
/// [`crate::Command`].
pub trait Compute: SnapshotClone + Send + 'static {
    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater);

    fn as_any(&self) -> &dyn Any;

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shared `assign_box` body for computes.
pub fn assign_impl<T: Compute>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => warn!("assign_box: value is not a {}", type_name::<T>()),
    }
}
