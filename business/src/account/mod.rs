//! Account page, security tab: the change-password flow.

mod actions;
mod command;
mod security_tab;
mod state;

pub use actions::AccountAction;
pub use command::ChangePasswordCommand;
pub use security_tab::{ChangePasswordPhase, SecurityTab, change_password_form, check_confirm};
pub use state::{
    AccountState, CONFIRM_PASSWORD, ChangePasswordValues, OLD_PASSWORD, PASSWORD,
};

use truthy_states::StateCtx;

use crate::password_strength::{PasswordDraft, PasswordStrengthCompute};

pub fn register(ctx: &mut StateCtx) {
    ctx.add_reducer(AccountState::default());
    ctx.add_state(PasswordDraft::default());
    ctx.record_compute(PasswordStrengthCompute::default());
    ctx.record_command(ChangePasswordCommand);
    ctx.on_action::<AccountAction, ChangePasswordCommand>(|a| {
        matches!(a, AccountAction::SubmitChangePasswordForm)
    });
}
