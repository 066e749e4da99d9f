use log::{info, warn};
use tokio_util::sync::CancellationToken;
use truthy_states::{Command, CommandFuture, CommandSnapshot, LatestOnlyUpdater};

use super::actions::AccountAction;
use super::state::{AccountState, ChangePasswordValues, OLD_PASSWORD};
use crate::BusinessConfig;
use crate::api::{SubmissionError, send_empty};
use crate::http::Client;
use crate::login::AuthCompute;
use crate::messages::Messages;

async fn change_password(
    url: String,
    token: Result<String, SubmissionError>,
    body: ChangePasswordValues,
) -> Result<(), SubmissionError> {
    let request = Client::put(url).bearer(&token?).json(&body)?;
    send_empty(request).await
}

/// Sends the stored change-password form with the session token.
///
/// Success dispatches `InitiateClean`; any failure becomes field errors, with
/// errors that name no field attached to the old-password input.
#[derive(Debug, Default)]
pub struct ChangePasswordCommand;

impl Command for ChangePasswordCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let body = snap.state::<AccountState>().form_values.clone();
        let url = format!("{}/auth/change-password", snap.state::<BusinessConfig>().api_url());
        let token = snap.compute::<AuthCompute>().require_token();
        let messages = snap.state::<Messages>().clone();

        Box::pin(async move {
            updater.dispatch(AccountAction::AsyncStart);

            let result = tokio::select! {
                () = cancel.cancelled() => return,
                result = change_password(url, token, body) => result,
            };

            match result {
                Ok(()) => {
                    info!("ChangePasswordCommand: password changed");
                    updater.dispatch(AccountAction::InitiateClean);
                }
                Err(err) => {
                    warn!("ChangePasswordCommand: {err}");
                    let errors = err.into_field_errors(OLD_PASSWORD, messages.provider().as_ref());
                    updater.dispatch(AccountAction::SetErrors(errors));
                }
            }
            updater.dispatch(AccountAction::AsyncEnd);
        })
    }
}
