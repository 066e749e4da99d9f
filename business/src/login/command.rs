use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use truthy_states::{Command, CommandFuture, CommandSnapshot, LatestOnlyUpdater};

use super::actions::LoginAction;
use super::auth::AuthCompute;
use super::state::LoginState;
use crate::api::{SubmissionError, send_json};
use crate::http::Client;
use crate::messages::{MessageKey, Messages};
use crate::account::AccountState;
use crate::permission::PermissionState;
use crate::BusinessConfig;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Posts the credentials held in [`LoginState`].
///
/// Enqueued by `LoginProcess`. Reports through `AsyncStart`/`AsyncEnd`, then
/// either stores the session in [`AuthCompute`] and dispatches `EnterLogin`,
/// or dispatches `AddValidationError`/`LoginError`.
#[derive(Debug, Default)]
pub struct LoginCommand;

impl Command for LoginCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let input = snap.state::<LoginState>();
        let body = LoginRequest {
            username: input.username.trim().to_owned(),
            password: input.password.clone(),
        };
        let url = format!("{}/auth/login", snap.state::<BusinessConfig>().api_url());
        let messages = snap.state::<Messages>().clone();

        Box::pin(async move {
            updater.dispatch(LoginAction::async_start());
            info!("LoginCommand: signing in as '{}'", body.username);

            let result = match Client::post(url).json(&body) {
                Ok(request) => tokio::select! {
                    () = cancel.cancelled() => return,
                    result = send_json::<LoginResponse>(request) => result,
                },
                Err(err) => Err(SubmissionError::from(err)),
            };

            match result {
                Ok(response) => {
                    info!("LoginCommand: signed in as '{}'", body.username);
                    updater.set(AuthCompute::authenticated(&body.username, response.access_token));
                    updater.dispatch(LoginAction::is_logged());
                }
                Err(SubmissionError::Validation(errors)) => {
                    info!("LoginCommand: rejected with {} field error(s)", errors.len());
                    updater.dispatch(LoginAction::enter_validation_error(errors));
                }
                Err(SubmissionError::NotAuthenticated) => {
                    updater.dispatch(LoginAction::login_error(
                        messages.get(MessageKey::InvalidCredentials),
                    ));
                }
                Err(err) => {
                    warn!("LoginCommand: {err}");
                    updater.dispatch(LoginAction::login_error(
                        err.user_message(messages.provider().as_ref()),
                    ));
                }
            }
            updater.dispatch(LoginAction::async_end());
        })
    }
}

/// Drops the session and resets every page the signed-in user saw.
#[derive(Debug, Default)]
pub struct LogoutCommand;

impl Command for LogoutCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let page_size = snap.state::<BusinessConfig>().page_size;

        Box::pin(async move {
            info!("LogoutCommand: session cleared");
            updater.set(AuthCompute::default());
            updater.set(LoginState::default());
            // Nothing of the previous user's pages may outlive the session.
            updater.set(PermissionState::with_limit(page_size));
            updater.set(AccountState::default());
        })
    }
}
