//! Permission page: paginated list, search, create/edit modals, delete and sync.

mod actions;
mod commands;
mod module;
mod state;

pub use actions::PermissionAction;
pub use commands::{
    DeletePermissionCommand, QueryPermissionsCommand, SubmitPermissionCommand,
    SyncPermissionsCommand,
};
pub use module::{METHODS, PermissionModule, permission_form};
pub use state::{
    DESCRIPTION, FormMethod, METHOD, PATH, PermissionFormValues, PermissionItem, PermissionState,
    RESOURCE,
};

use truthy_states::StateCtx;

pub fn register(ctx: &mut StateCtx, page_size: u32) {
    ctx.add_reducer(PermissionState::with_limit(page_size));
    ctx.record_command(QueryPermissionsCommand);
    ctx.record_command(DeletePermissionCommand);
    ctx.record_command(SyncPermissionsCommand);
    ctx.record_command(SubmitPermissionCommand);

    ctx.watch::<PermissionState, (u32, u32), QueryPermissionsCommand>(PermissionState::pagination);
    ctx.on_action::<PermissionAction, QueryPermissionsCommand>(|a| {
        matches!(a, PermissionAction::QueryPermission)
    });
    ctx.on_action::<PermissionAction, DeletePermissionCommand>(|a| {
        matches!(a, PermissionAction::DeleteItemById(_))
    });
    ctx.on_action::<PermissionAction, SyncPermissionsCommand>(|a| {
        matches!(a, PermissionAction::SyncPermission)
    });
    ctx.on_action::<PermissionAction, SubmitPermissionCommand>(|a| {
        matches!(a, PermissionAction::SubmitForm)
    });
}
