//! Change-password modal of the account page.
//!
//! The modal walks `Closed -> Open -> Validating -> Submitting`. Submitting
//! ends in one of two ways, both observed from [`AccountState`]:
//! `initiate_clean` closes and clears the modal, field errors reopen it with
//! the errors shown under their inputs.

use truthy_states::StateCtx;

use super::actions::AccountAction;
use super::state::{AccountState, CONFIRM_PASSWORD, ChangePasswordValues, OLD_PASSWORD, PASSWORD};
use crate::form::{
    FieldError, FieldSpec, FormInstance, ValidationError, ValidationKind, ValidatorCtx,
};
use crate::messages::{MessageKey, Messages};
use crate::password_strength::{
    PasswordDraft, PasswordStrength, PasswordStrengthCompute, check_if_strong_password,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChangePasswordPhase {
    #[default]
    Closed,
    Open,
    Validating,
    Submitting,
}

/// Empty input passes; the required rule reports it.
pub fn check_confirm(ctx: &ValidatorCtx<'_>) -> Result<(), ValidationError> {
    if ctx.value.is_empty() || ctx.value == ctx.value_of(PASSWORD) {
        Ok(())
    } else {
        Err(ctx.reject(
            ValidationKind::Mismatch,
            MessageKey::ConfirmPasswordMatchError,
        ))
    }
}

pub fn change_password_form(messages: &Messages) -> FormInstance {
    FormInstance::new(
        vec![
            FieldSpec::new(OLD_PASSWORD).required(MessageKey::OldPasswordRequired, true),
            FieldSpec::new(PASSWORD)
                .required(MessageKey::PasswordRequired, true)
                .validator(check_if_strong_password),
            FieldSpec::new(CONFIRM_PASSWORD)
                .required(MessageKey::ConfirmPasswordRequired, true)
                .validator(check_confirm),
        ],
        messages.provider(),
    )
}

#[derive(Debug)]
pub struct SecurityTab {
    form: FormInstance,
    visible: bool,
    phase: ChangePasswordPhase,
    seen_errors: Vec<FieldError>,
    seen_initiate_clean: bool,
}

impl SecurityTab {
    pub fn new(messages: &Messages) -> Self {
        Self {
            form: change_password_form(messages),
            visible: false,
            phase: ChangePasswordPhase::Closed,
            seen_errors: Vec::new(),
            seen_initiate_clean: false,
        }
    }

    pub fn form(&self) -> &FormInstance {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormInstance {
        &mut self.form
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn phase(&self) -> ChangePasswordPhase {
        self.phase
    }

    pub fn open(&mut self) {
        self.visible = true;
        self.phase = ChangePasswordPhase::Open;
    }

    pub fn set_field(&mut self, ctx: &mut StateCtx, name: &str, value: impl Into<String>) {
        *self.form.value_mut(name) = value.into();
        self.field_edited(ctx, name);
    }

    /// Call after an input wrote through [`FormInstance::value_mut`].
    pub fn field_edited(&mut self, ctx: &mut StateCtx, name: &str) {
        self.form.touch(name);
        if name == PASSWORD {
            let password = self.form.value(PASSWORD).to_owned();
            ctx.update::<PasswordDraft>(|draft| draft.password = password);
        }
    }

    /// Strength of the password typed so far.
    pub fn strength(&self, ctx: &StateCtx) -> PasswordStrength {
        ctx.cached::<PasswordStrengthCompute>()
            .map(|c| c.strength)
            .unwrap_or_default()
    }

    /// The modal's OK button.
    pub fn confirm(&mut self, ctx: &mut StateCtx) -> Result<(), Vec<ValidationError>> {
        self.phase = ChangePasswordPhase::Validating;
        match self.form.validate_fields() {
            Ok(values) => {
                ctx.dispatch_action(AccountAction::SetFormValues(
                    ChangePasswordValues::from_form(&values),
                ));
                ctx.dispatch_action(AccountAction::SubmitChangePasswordForm);
                // The submit cleared the stored errors; let identical ones apply again.
                self.seen_errors.clear();
                self.phase = ChangePasswordPhase::Submitting;
                Ok(())
            }
            Err(errors) => {
                self.phase = ChangePasswordPhase::Open;
                Err(errors)
            }
        }
    }

    /// Close without submitting.
    pub fn cancel(&mut self, ctx: &mut StateCtx) {
        self.close(ctx);
    }

    /// React to the stored submission outcome; call once per frame.
    pub fn observe(&mut self, ctx: &mut StateCtx) {
        let state = ctx.state::<AccountState>();
        let errors = state.errors();
        let initiate_clean = state.initiate_clean();

        if errors != self.seen_errors.as_slice() {
            self.seen_errors = errors.to_vec();
            // A submit that outlived a cancel has nothing left to report on.
            if !self.seen_errors.is_empty() && self.phase != ChangePasswordPhase::Closed {
                self.form.set_fields(&self.seen_errors);
                if self.phase == ChangePasswordPhase::Submitting {
                    self.phase = ChangePasswordPhase::Open;
                }
            }
        }

        if initiate_clean != self.seen_initiate_clean {
            self.seen_initiate_clean = initiate_clean;
            if initiate_clean {
                ctx.dispatch_action(AccountAction::ClearForm);
                self.close(ctx);
            }
        }
    }

    fn close(&mut self, ctx: &mut StateCtx) {
        self.visible = false;
        self.phase = ChangePasswordPhase::Closed;
        self.form.reset_fields();
        ctx.update::<PasswordDraft>(|draft| draft.password.clear());
    }
}
