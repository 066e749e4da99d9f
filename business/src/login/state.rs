use std::any::Any;

use truthy_states::{Reducer, SnapshotClone, State, state_assign_impl};

use super::actions::LoginAction;
use crate::form::FieldError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub is_loading: bool,
    /// Per-field errors from local validation or the server.
    pub errors: Vec<FieldError>,
    /// Error not tied to a field, e.g. bad credentials.
    pub error: Option<String>,
    pub is_logged: bool,
}

impl LoginState {
    pub fn field_error(&self, name: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.name == name)
            .and_then(FieldError::first_message)
    }
}

impl Reducer for LoginState {
    type Action = LoginAction;

    fn reduce(&mut self, action: LoginAction) {
        match action {
            LoginAction::ChangePassword { password } => {
                self.password = password;
                self.errors.retain(|e| e.name != "password");
            }
            LoginAction::ChangeUsername { username } => {
                self.username = username;
                self.errors.retain(|e| e.name != "username");
            }
            LoginAction::EnterLogin => {
                self.is_logged = true;
                self.password.clear();
                self.error = None;
            }
            LoginAction::AsyncStart => self.is_loading = true,
            LoginAction::AsyncEnd => self.is_loading = false,
            LoginAction::AddValidationError { errors } => self.errors = errors,
            LoginAction::LoginProcess => {
                self.errors.clear();
                self.error = None;
            }
            LoginAction::LoginError { error } => {
                self.error = Some(error);
                self.is_logged = false;
            }
        }
    }
}

impl SnapshotClone for LoginState {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for LoginState {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_clears_that_fields_error_only() {
        let mut state = LoginState::default();
        state.reduce(LoginAction::enter_validation_error(vec![
            FieldError::new("username", "required"),
            FieldError::new("password", "required"),
        ]));

        state.reduce(LoginAction::change_username("root"));

        assert_eq!(state.username, "root");
        assert_eq!(state.field_error("username"), None);
        assert_eq!(state.field_error("password"), Some("required"));
    }

    #[test]
    fn successful_login_drops_password_and_error() {
        let mut state = LoginState::default();
        state.reduce(LoginAction::change_password("Secret1!"));
        state.reduce(LoginAction::login_error("nope"));
        assert!(!state.is_logged);

        state.reduce(LoginAction::is_logged());

        assert!(state.is_logged);
        assert!(state.password.is_empty());
        assert_eq!(state.error, None);
    }

    #[test]
    fn async_markers_toggle_loading() {
        let mut state = LoginState::default();
        state.reduce(LoginAction::async_start());
        assert!(state.is_loading);
        state.reduce(LoginAction::async_end());
        assert!(!state.is_loading);
    }
}
