use truthy_states::StateCtx;

use super::actions::LoginAction;
use super::state::LoginState;
use crate::form::{FieldError, FieldSpec, FormInstance};
use crate::messages::{MessageKey, Messages};

pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";

fn login_form(messages: &Messages) -> FormInstance {
    FormInstance::new(
        vec![
            FieldSpec::new(USERNAME).required(MessageKey::UsernameRequired, true),
            FieldSpec::new(PASSWORD).required(MessageKey::PasswordRequired, false),
        ],
        messages.provider(),
    )
}

/// Validate the credentials in [`LoginState`] and submit them.
///
/// Returns whether `LoginProcess` was dispatched; on a validation failure the
/// field errors are dispatched instead.
pub fn submit_login(ctx: &mut StateCtx) -> bool {
    let state = ctx.state::<LoginState>();
    let mut form = login_form(ctx.state::<Messages>());
    form.set_values([
        (USERNAME, state.username.clone()),
        (PASSWORD, state.password.clone()),
    ]);

    match form.validate_fields() {
        Ok(_) => {
            ctx.dispatch_action(LoginAction::enter_login());
            true
        }
        Err(errors) => {
            let errors = errors.iter().map(FieldError::from).collect();
            ctx.dispatch_action(LoginAction::enter_validation_error(errors));
            false
        }
    }
}
