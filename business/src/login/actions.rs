use truthy_states::Action;

use super::state::LoginState;
use crate::form::FieldError;

pub const CHANGE_PASSWORD: &str = "login/CHANGE_PASSWORD";
pub const CHANGE_USERNAME: &str = "login/CHANGE_USERNAME";
pub const ENTER_LOGIN: &str = "login/ENTER_LOGIN";
pub const ASYNC_START: &str = "login/ASYNC_START";
pub const ASYNC_END: &str = "login/ASYNC_END";
pub const ADD_VALIDATION_ERROR: &str = "login/ADD_VALIDATION_ERROR";
pub const LOGIN_PROCESS: &str = "login/LOGIN_PROCESS";
pub const LOGIN_ERROR: &str = "login/LOGIN_ERROR";

/// Everything that can happen on the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    ChangePassword { password: String },
    ChangeUsername { username: String },
    /// The session was established.
    EnterLogin,
    AsyncStart,
    AsyncEnd,
    AddValidationError { errors: Vec<FieldError> },
    /// Submit the credentials.
    LoginProcess,
    LoginError { error: String },
}

impl LoginAction {
    pub fn change_password(password: impl Into<String>) -> Self {
        Self::ChangePassword {
            password: password.into(),
        }
    }

    pub fn change_username(username: impl Into<String>) -> Self {
        Self::ChangeUsername {
            username: username.into(),
        }
    }

    pub fn is_logged() -> Self {
        Self::EnterLogin
    }

    pub fn async_start() -> Self {
        Self::AsyncStart
    }

    pub fn async_end() -> Self {
        Self::AsyncEnd
    }

    pub fn enter_validation_error(errors: Vec<FieldError>) -> Self {
        Self::AddValidationError { errors }
    }

    pub fn enter_login() -> Self {
        Self::LoginProcess
    }

    pub fn login_error(error: impl Into<String>) -> Self {
        Self::LoginError {
            error: error.into(),
        }
    }
}

impl Action for LoginAction {
    type Target = LoginState;

    fn kind(&self) -> &'static str {
        match self {
            Self::ChangePassword { .. } => CHANGE_PASSWORD,
            Self::ChangeUsername { .. } => CHANGE_USERNAME,
            Self::EnterLogin => ENTER_LOGIN,
            Self::AsyncStart => ASYNC_START,
            Self::AsyncEnd => ASYNC_END,
            Self::AddValidationError { .. } => ADD_VALIDATION_ERROR,
            Self::LoginProcess => LOGIN_PROCESS,
            Self::LoginError { .. } => LOGIN_ERROR,
        }
    }
}
