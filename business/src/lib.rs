//! Business layer of the Truthy admin client.
//!
//! Every page keeps its data in `StateCtx`: a reducer state driven by the
//! page's action enum, commands for the network, and a small controller
//! (`SecurityTab`, `PermissionModule`) for what the page holds locally.
//! UI code only renders, calls controller methods and dispatches actions.

pub mod account;
pub mod api;
mod config;
pub mod form;
pub mod http;
pub mod login;
pub mod messages;
pub mod password_strength;
pub mod permission;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod test_utils;

pub use account::{AccountAction, AccountState, ChangePasswordCommand, SecurityTab};
pub use api::{Paginated, SubmissionError};
pub use config::{BusinessConfig, ConfigError, DEFAULT_PAGE_SIZE, ENV_PREFIX};
pub use form::{FieldError, FormInstance, ValidationError};
pub use login::{AuthCompute, AuthStatus, LoginAction, LoginCommand, LoginState, LogoutCommand};
pub use messages::{EnglishMessages, MessageKey, MessageProvider, Messages};
pub use password_strength::{PasswordStrength, PasswordStrengthCompute};
pub use permission::{PermissionAction, PermissionItem, PermissionModule, PermissionState};

use truthy_states::StateCtx;

/// A context with every page registered.
pub fn build_state_ctx(config: BusinessConfig) -> StateCtx {
    build_state_ctx_with(config, Messages::default())
}

pub fn build_state_ctx_with(config: BusinessConfig, messages: Messages) -> StateCtx {
    let mut ctx = StateCtx::new();
    let page_size = config.page_size;

    ctx.add_state(config);
    ctx.add_state(messages);
    login::register(&mut ctx);
    account::register(&mut ctx);
    permission::register(&mut ctx, page_size);

    if let Err(err) = ctx.verify_deps() {
        log::error!("compute dependencies are inconsistent: {err}");
    }
    ctx
}
