use std::any::{Any, type_name};
use std::fmt::Debug;

use log::warn;

use crate::State;

/// A labelled intent applied to exactly one [`Reducer`].
///
/// `kind` is drawn from a fixed set per feature area, mirroring the `type`
/// field of a plain action object.
pub trait Action: Debug + Send + 'static {
    type Target: Reducer<Action = Self>;

    fn kind(&self) -> &'static str;
}

/// A state that changes only by folding actions into itself.
pub trait Reducer: State + Sized {
    type Action: Action<Target = Self>;

    fn reduce(&mut self, action: Self::Action);
}

pub(crate) type ReduceFn = fn(&mut dyn State, Box<dyn Any + Send>);
pub(crate) type KindFn = fn(&dyn Any) -> &'static str;

pub(crate) fn reduce_boxed<S: Reducer>(state: &mut dyn State, action: Box<dyn Any + Send>) {
    let Some(state) = state.as_any_mut().downcast_mut::<S>() else {
        warn!("reducer target is not a {}", type_name::<S>());
        return;
    };
    match action.downcast::<S::Action>() {
        Ok(action) => state.reduce(*action),
        Err(_) => warn!("action is not a {}", type_name::<S::Action>()),
    }
}

pub(crate) fn action_kind<A: Action>(action: &dyn Any) -> &'static str {
    action.downcast_ref::<A>().map_or("<unknown>", A::kind)
}
