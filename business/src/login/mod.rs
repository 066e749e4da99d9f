//! Login page: credential inputs, the session cache, and the sign-in command.

pub mod actions;
mod auth;
mod command;
mod page;
mod state;

pub use actions::LoginAction;
pub use auth::{AuthCompute, AuthStatus};
pub use command::{LoginCommand, LoginRequest, LoginResponse, LogoutCommand};
pub use page::{PASSWORD, USERNAME, submit_login};
pub use state::LoginState;

use truthy_states::StateCtx;

pub fn register(ctx: &mut StateCtx) {
    ctx.add_reducer(LoginState::default());
    ctx.record_compute(AuthCompute::default());
    ctx.record_command(LoginCommand);
    ctx.record_command(LogoutCommand);
    ctx.on_action::<LoginAction, LoginCommand>(|a| matches!(a, LoginAction::LoginProcess));
}
