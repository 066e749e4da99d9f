use chrono::{DateTime, Utc};
use truthy_states::Action;

use super::state::{FormMethod, PermissionFormValues, PermissionItem, PermissionState};
use crate::api::Paginated;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionAction {
    Mount,
    Unmount,
    /// Load the page described by the current pagination and keywords.
    QueryPermission,
    SetKeywords(String),
    SetId(u64),
    SetFormMethod(FormMethod),
    DeleteItemById(u64),
    /// Register the server's routes as permissions.
    SyncPermission,
    SetPageNumber(u32),
    SetLimit(u32),
    AsyncStart,
    AsyncEnd,
    AssignPermissions(Paginated<PermissionItem>),
    SetError(String),
    SetFormValues(PermissionFormValues),
    /// Create or update, per the stored form method.
    SubmitForm,
    Synced(DateTime<Utc>),
}

impl Action for PermissionAction {
    type Target = PermissionState;

    fn kind(&self) -> &'static str {
        match self {
            Self::Mount => "permission/MOUNT",
            Self::Unmount => "permission/UNMOUNT",
            Self::QueryPermission => "permission/QUERY_PERMISSION",
            Self::SetKeywords(_) => "permission/SET_KEYWORDS",
            Self::SetId(_) => "permission/SET_ID",
            Self::SetFormMethod(_) => "permission/SET_FORM_METHOD",
            Self::DeleteItemById(_) => "permission/DELETE_ITEM_BY_ID",
            Self::SyncPermission => "permission/SYNC_PERMISSION",
            Self::SetPageNumber(_) => "permission/SET_PAGE_NUMBER",
            Self::SetLimit(_) => "permission/SET_LIMIT",
            Self::AsyncStart => "permission/ASYNC_START",
            Self::AsyncEnd => "permission/ASYNC_END",
            Self::AssignPermissions(_) => "permission/ASSIGN_PERMISSIONS",
            Self::SetError(_) => "permission/SET_ERROR",
            Self::SetFormValues(_) => "permission/SET_FORM_VALUES",
            Self::SubmitForm => "permission/SUBMIT_FORM",
            Self::Synced(_) => "permission/SYNCED",
        }
    }
}
