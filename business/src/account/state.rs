use std::any::Any;

use serde::Serialize;
use truthy_states::{Reducer, SnapshotClone, State, state_assign_impl};
use ustr::Ustr;

use super::actions::AccountAction;
use crate::form::{FieldError, FormValues};

pub const OLD_PASSWORD: &str = "oldPassword";
pub const PASSWORD: &str = "password";
pub const CONFIRM_PASSWORD: &str = "confirmPassword";

/// Body of `PUT /auth/change-password`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordValues {
    pub old_password: String,
    pub password: String,
    pub confirm_password: String,
}

impl ChangePasswordValues {
    pub fn from_form(values: &FormValues) -> Self {
        let get = |name: &str| values.get(&Ustr::from(name)).cloned().unwrap_or_default();
        Self {
            old_password: get(OLD_PASSWORD),
            password: get(PASSWORD),
            confirm_password: get(CONFIRM_PASSWORD),
        }
    }
}

/// Store slice behind the account page's security tab.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AccountState {
    pub form_values: ChangePasswordValues,
    pub is_loading: bool,
    pub errors: Vec<FieldError>,
    pub initiate_clean: bool,
}

impl AccountState {
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn initiate_clean(&self) -> bool {
        self.initiate_clean
    }
}

impl Reducer for AccountState {
    type Action = AccountAction;

    fn reduce(&mut self, action: AccountAction) {
        match action {
            AccountAction::SetFormValues(values) => self.form_values = values,
            AccountAction::SubmitChangePasswordForm => {
                self.errors.clear();
                self.initiate_clean = false;
            }
            AccountAction::AsyncStart => self.is_loading = true,
            AccountAction::AsyncEnd => self.is_loading = false,
            AccountAction::SetErrors(errors) => self.errors = errors,
            AccountAction::InitiateClean => self.initiate_clean = true,
            AccountAction::ClearForm => {
                self.form_values = ChangePasswordValues::default();
                self.errors.clear();
                self.initiate_clean = false;
            }
        }
    }
}

impl SnapshotClone for AccountState {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for AccountState {
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
