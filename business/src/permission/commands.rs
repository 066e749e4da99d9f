//! Network side of the permission page.
//!
//! Every command brackets its request with `AsyncStart`/`AsyncEnd` and turns
//! failures into `SetError`. Mutations dispatch `QueryPermission` on success
//! so the table reloads; only the query is latest-only.

use chrono::Utc;
use log::{info, warn};
use tokio_util::sync::CancellationToken;
use truthy_states::{Command, CommandFuture, CommandSnapshot, LatestOnlyUpdater};

use super::actions::PermissionAction;
use super::state::{FormMethod, PermissionItem, PermissionState};
use crate::BusinessConfig;
use crate::api::{Paginated, SubmissionError, send_empty, send_json};
use crate::http::{Client, RequestBuilder};
use crate::login::AuthCompute;
use crate::messages::{MessageKey, Messages};

/// What every permission command reads from its snapshot.
struct Request {
    base: String,
    token: Result<String, SubmissionError>,
    state: PermissionState,
    messages: Messages,
}

impl Request {
    fn from_snapshot(snap: &CommandSnapshot) -> Self {
        Self {
            base: format!("{}/permissions", snap.state::<BusinessConfig>().api_url()),
            token: snap.compute::<AuthCompute>().require_token(),
            state: snap.state::<PermissionState>().clone(),
            messages: snap.state::<Messages>().clone(),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, SubmissionError> {
        let token = self.token.clone()?;
        Ok(request.bearer(&token))
    }

    fn fail(&self, updater: &LatestOnlyUpdater, command: &str, err: &SubmissionError) {
        warn!("{command}: {err}");
        updater.dispatch(PermissionAction::SetError(
            err.user_message(self.messages.provider().as_ref()),
        ));
    }
}

async fn query(req: &Request) -> Result<Paginated<PermissionItem>, SubmissionError> {
    let mut request = Client::get(&req.base)
        .query("page", req.state.page_number)
        .query("limit", req.state.limit);
    let keywords = req.state.keywords.trim();
    if !keywords.is_empty() {
        request = request.query("keywords", keywords);
    }
    send_json(req.authorize(request)?).await
}

/// Loads one page of permissions for the stored page, limit and keywords.
#[derive(Debug, Default)]
pub struct QueryPermissionsCommand;

impl Command for QueryPermissionsCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let req = Request::from_snapshot(&snap);

        Box::pin(async move {
            updater.dispatch(PermissionAction::AsyncStart);
            let result = tokio::select! {
                () = cancel.cancelled() => return,
                result = query(&req) => result,
            };
            match result {
                Ok(page) => {
                    info!(
                        "QueryPermissionsCommand: page {} has {} of {} permissions",
                        req.state.page_number,
                        page.results.len(),
                        page.total_items
                    );
                    updater.dispatch(PermissionAction::AssignPermissions(page));
                }
                Err(err) => req.fail(&updater, "QueryPermissionsCommand", &err),
            }
            updater.dispatch(PermissionAction::AsyncEnd);
        })
    }
}

async fn delete(req: &Request) -> Result<u64, SubmissionError> {
    let Some(id) = req.state.pending_delete else {
        return Err(SubmissionError::Rejected {
            status: 0,
            message: req.messages.get(MessageKey::NoPermissionSelected).into_owned(),
        });
    };
    send_empty(req.authorize(Client::delete(format!("{}/{id}", req.base)))?).await?;
    Ok(id)
}

/// Deletes the permission named by the `DeleteItemById` this run was
/// enqueued for. Runs are never cancelled, so every delete is sent.
#[derive(Debug, Default)]
pub struct DeletePermissionCommand;

impl Command for DeletePermissionCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let req = Request::from_snapshot(&snap);

        Box::pin(async move {
            updater.dispatch(PermissionAction::AsyncStart);
            let result = delete(&req).await;
            match result {
                Ok(id) => {
                    info!("DeletePermissionCommand: deleted permission {id}");
                    updater.dispatch(PermissionAction::QueryPermission);
                }
                Err(err) => req.fail(&updater, "DeletePermissionCommand", &err),
            }
            updater.dispatch(PermissionAction::AsyncEnd);
        })
    }

    fn cancel_previous(&self) -> bool {
        false
    }
}

async fn sync(req: &Request) -> Result<(), SubmissionError> {
    send_empty(req.authorize(Client::post(format!("{}/sync", req.base)))?).await
}

/// Asks the server to register its routes as permissions.
#[derive(Debug, Default)]
pub struct SyncPermissionsCommand;

impl Command for SyncPermissionsCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let req = Request::from_snapshot(&snap);

        Box::pin(async move {
            updater.dispatch(PermissionAction::AsyncStart);
            let result = sync(&req).await;
            match result {
                Ok(()) => {
                    info!("SyncPermissionsCommand: permissions synced");
                    updater.dispatch(PermissionAction::Synced(Utc::now()));
                    updater.dispatch(PermissionAction::QueryPermission);
                }
                Err(err) => req.fail(&updater, "SyncPermissionsCommand", &err),
            }
            updater.dispatch(PermissionAction::AsyncEnd);
        })
    }

    fn cancel_previous(&self) -> bool {
        false
    }
}

async fn submit(req: &Request) -> Result<(), SubmissionError> {
    let request = match req.state.form_method {
        FormMethod::Post => Client::post(&req.base),
        FormMethod::Put => {
            let Some(id) = req.state.id else {
                return Err(SubmissionError::Rejected {
                    status: 0,
                    message: req.messages.get(MessageKey::NoPermissionSelected).into_owned(),
                });
            };
            Client::put(format!("{}/{id}", req.base))
        }
    };
    send_empty(req.authorize(request)?.json(&req.state.form_values)?).await
}

/// Creates or updates a permission from the stored form values.
#[derive(Debug, Default)]
pub struct SubmitPermissionCommand;

impl Command for SubmitPermissionCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let req = Request::from_snapshot(&snap);

        Box::pin(async move {
            updater.dispatch(PermissionAction::AsyncStart);
            let result = submit(&req).await;
            match result {
                Ok(()) => {
                    info!(
                        "SubmitPermissionCommand: {:?} {} saved",
                        req.state.form_method, req.state.form_values.resource
                    );
                    updater.dispatch(PermissionAction::QueryPermission);
                }
                Err(err) => req.fail(&updater, "SubmitPermissionCommand", &err),
            }
            updater.dispatch(PermissionAction::AsyncEnd);
        })
    }

    fn cancel_previous(&self) -> bool {
        false
    }
}
