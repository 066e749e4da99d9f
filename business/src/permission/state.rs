use std::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use truthy_states::{Reducer, SnapshotClone, State, state_assign_impl};
use ustr::Ustr;

use super::actions::PermissionAction;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::form::FormValues;

pub const RESOURCE: &str = "resource";
pub const DESCRIPTION: &str = "description";
pub const PATH: &str = "path";
pub const METHOD: &str = "method";

/// A named capability: an HTTP route on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionItem {
    pub id: u64,
    pub resource: String,
    pub description: String,
    pub path: String,
    pub method: String,
    /// Registered by sync; the server refuses to delete these.
    #[serde(default)]
    pub is_default: bool,
}

/// Whether the permission form creates (POST) or updates (PUT).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    #[default]
    Post,
    Put,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionFormValues {
    pub resource: String,
    pub description: String,
    pub path: String,
    pub method: String,
}

impl PermissionFormValues {
    pub fn from_form(values: &FormValues) -> Self {
        let get = |name: &str| {
            values
                .get(&Ustr::from(name))
                .map(|v| v.trim().to_owned())
                .unwrap_or_default()
        };
        Self {
            resource: get(RESOURCE),
            description: get(DESCRIPTION),
            path: get(PATH),
            method: get(METHOD),
        }
    }

    pub fn from_item(item: &PermissionItem) -> Self {
        Self {
            resource: item.resource.clone(),
            description: item.description.clone(),
            path: item.path.clone(),
            method: item.method.clone(),
        }
    }
}

/// Store slice behind the permission page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionState {
    /// Set while the page is on screen; pagination queries only run then.
    pub mounted: bool,
    /// 1-based.
    pub page_number: u32,
    pub limit: u32,
    pub keywords: String,
    pub is_loading: bool,
    pub permissions: Vec<PermissionItem>,
    pub total_items: u64,
    /// Permission being edited.
    pub id: Option<u64>,
    pub form_method: FormMethod,
    pub form_values: PermissionFormValues,
    /// Target of the latest `DeleteItemById`; each delete run reads it from
    /// the snapshot taken when that action was reduced.
    pub pending_delete: Option<u64>,
    pub error: Option<String>,
    pub last_synced: Option<DateTime<Utc>>,
}

impl Default for PermissionState {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAGE_SIZE)
    }
}

impl PermissionState {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            mounted: false,
            page_number: 1,
            limit: limit.max(1),
            keywords: String::new(),
            is_loading: false,
            permissions: Vec::new(),
            total_items: 0,
            id: None,
            form_method: FormMethod::Post,
            form_values: PermissionFormValues::default(),
            pending_delete: None,
            error: None,
            last_synced: None,
        }
    }

    /// Key the list query is re-run for, while mounted.
    pub fn pagination(&self) -> Option<(u32, u32)> {
        self.mounted.then_some((self.page_number, self.limit))
    }

    pub fn page_count(&self) -> u32 {
        let pages = self.total_items.div_ceil(u64::from(self.limit.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    pub fn find(&self, id: u64) -> Option<&PermissionItem> {
        self.permissions.iter().find(|p| p.id == id)
    }
}

impl Reducer for PermissionState {
    type Action = PermissionAction;

    fn reduce(&mut self, action: PermissionAction) {
        match action {
            PermissionAction::Mount => self.mounted = true,
            PermissionAction::Unmount => self.mounted = false,
            PermissionAction::QueryPermission | PermissionAction::SyncPermission => {
                self.error = None;
            }
            PermissionAction::SetKeywords(keywords) => self.keywords = keywords,
            PermissionAction::SetId(id) => self.id = Some(id),
            PermissionAction::SetFormMethod(method) => {
                if method == FormMethod::Post {
                    self.id = None;
                }
                self.form_method = method;
            }
            PermissionAction::DeleteItemById(id) => self.pending_delete = Some(id),
            PermissionAction::SetPageNumber(page) => self.page_number = page.max(1),
            PermissionAction::SetLimit(limit) => {
                self.limit = limit.max(1);
                self.page_number = 1;
            }
            PermissionAction::AsyncStart => self.is_loading = true,
            PermissionAction::AsyncEnd => self.is_loading = false,
            PermissionAction::AssignPermissions(page) => {
                self.permissions = page.results;
                self.total_items = page.total_items;
                self.error = None;
            }
            PermissionAction::SetError(error) => self.error = Some(error),
            PermissionAction::SetFormValues(values) => self.form_values = values,
            PermissionAction::SubmitForm => self.error = None,
            PermissionAction::Synced(at) => self.last_synced = Some(at),
        }
    }
}

impl SnapshotClone for PermissionState {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for PermissionState {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
