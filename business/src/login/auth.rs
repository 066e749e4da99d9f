use std::any::Any;

use truthy_states::{Compute, ComputeDeps, Dep, SnapshotClone, Updater, assign_impl};
use ustr::Ustr;

use crate::api::SubmissionError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    NotAuthenticated,
    Authenticated {
        username: Ustr,
        token: String,
    },
}

/// Compute-shaped cache for the session.
///
/// `compute()` is a no-op; login and logout commands replace it through
/// `Updater::set`.
#[derive(Debug, Clone, Default)]
pub struct AuthCompute {
    pub status: AuthStatus,
}

impl AuthCompute {
    pub fn authenticated(username: &str, token: impl Into<String>) -> Self {
        Self {
            status: AuthStatus::Authenticated {
                username: Ustr::from(username),
                token: token.into(),
            },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.status, AuthStatus::Authenticated { .. })
    }

    pub fn username(&self) -> Option<Ustr> {
        match &self.status {
            AuthStatus::Authenticated { username, .. } => Some(*username),
            AuthStatus::NotAuthenticated => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.status {
            AuthStatus::Authenticated { token, .. } => Some(token),
            AuthStatus::NotAuthenticated => None,
        }
    }

    pub fn require_token(&self) -> Result<String, SubmissionError> {
        self.token()
            .map(str::to_owned)
            .ok_or(SubmissionError::NotAuthenticated)
    }
}

impl SnapshotClone for AuthCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for AuthCompute {
    fn deps(&self) -> ComputeDeps {
        (vec![], vec![])
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}
