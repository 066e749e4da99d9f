use truthy_states::Action;

use super::state::{AccountState, ChangePasswordValues};
use crate::form::FieldError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountAction {
    /// Store the validated change-password form.
    SetFormValues(ChangePasswordValues),
    /// Send the stored form to the server.
    SubmitChangePasswordForm,
    AsyncStart,
    AsyncEnd,
    SetErrors(Vec<FieldError>),
    /// The password was changed; the form should be cleared.
    InitiateClean,
    ClearForm,
}

impl Action for AccountAction {
    type Target = AccountState;

    fn kind(&self) -> &'static str {
        match self {
            Self::SetFormValues(_) => "account/SET_FORM_VALUES",
            Self::SubmitChangePasswordForm => "account/SUBMIT_CHANGE_PASSWORD_FORM",
            Self::AsyncStart => "account/ASYNC_START",
            Self::AsyncEnd => "account/ASYNC_END",
            Self::SetErrors(_) => "account/SET_ERRORS",
            Self::InitiateClean => "account/INITIATE_CLEAN",
            Self::ClearForm => "account/CLEAR_FORM",
        }
    }
}
