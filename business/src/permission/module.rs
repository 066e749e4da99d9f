//! Container logic of the permission page.
//!
//! Holds what the page keeps locally (modal visibility, the sync confirmation
//! and the modal form) and turns user gestures into store actions.

use truthy_states::StateCtx;

use super::actions::PermissionAction;
use super::state::{
    DESCRIPTION, FormMethod, METHOD, PATH, PermissionFormValues, PermissionState, RESOURCE,
};
use crate::form::{FieldSpec, FormInstance, ValidationError};
use crate::messages::{MessageKey, Messages};

/// Methods offered by the permission form.
pub const METHODS: [&str; 4] = ["get", "post", "put", "delete"];

pub fn permission_form(messages: &Messages) -> FormInstance {
    FormInstance::new(
        vec![
            FieldSpec::new(RESOURCE).required(MessageKey::ResourceRequired, true),
            FieldSpec::new(DESCRIPTION).required(MessageKey::DescriptionRequired, true),
            FieldSpec::new(PATH).required(MessageKey::PathRequired, true),
            FieldSpec::new(METHOD).required(MessageKey::MethodRequired, true),
        ],
        messages.provider(),
    )
}

#[derive(Debug)]
pub struct PermissionModule {
    create_visible: bool,
    edit_visible: bool,
    confirm_sync_visible: bool,
    search: String,
    form: FormInstance,
}

impl PermissionModule {
    pub fn new(messages: &Messages) -> Self {
        Self {
            create_visible: false,
            edit_visible: false,
            confirm_sync_visible: false,
            search: String::new(),
            form: permission_form(messages),
        }
    }

    /// The page appeared; its first pagination key triggers the initial query.
    pub fn mount(&mut self, ctx: &mut StateCtx) {
        if !ctx.state::<PermissionState>().mounted {
            ctx.dispatch_action(PermissionAction::Mount);
        }
    }

    pub fn unmount(&mut self, ctx: &mut StateCtx) {
        if ctx.state::<PermissionState>().mounted {
            ctx.dispatch_action(PermissionAction::Unmount);
        }
    }

    pub fn is_create_visible(&self) -> bool {
        self.create_visible
    }

    pub fn is_edit_visible(&self) -> bool {
        self.edit_visible
    }

    pub fn is_confirm_sync_visible(&self) -> bool {
        self.confirm_sync_visible
    }

    pub fn form(&self) -> &FormInstance {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormInstance {
        &mut self.form
    }

    pub fn search_mut(&mut self) -> &mut String {
        &mut self.search
    }

    pub fn on_create(&mut self, ctx: &mut StateCtx) {
        ctx.dispatch_action(PermissionAction::SetFormMethod(FormMethod::Post));
        self.form.reset_fields();
        self.create_visible = true;
    }

    pub fn on_edit(&mut self, ctx: &mut StateCtx, id: u64) {
        ctx.dispatch_action(PermissionAction::SetId(id));
        ctx.dispatch_action(PermissionAction::SetFormMethod(FormMethod::Put));

        self.form.reset_fields();
        if let Some(item) = ctx.state::<PermissionState>().find(id) {
            let values = PermissionFormValues::from_item(item);
            self.form.set_values([
                (RESOURCE, values.resource),
                (DESCRIPTION, values.description),
                (PATH, values.path),
                (METHOD, values.method),
            ]);
        }
        self.edit_visible = true;
    }

    pub fn on_delete(&mut self, ctx: &mut StateCtx, id: u64) {
        ctx.dispatch_action(PermissionAction::DeleteItemById(id));
    }

    /// Sync is destructive, so it only opens the confirmation.
    pub fn request_sync(&mut self) {
        self.confirm_sync_visible = true;
    }

    pub fn confirm_sync(&mut self, ctx: &mut StateCtx) {
        self.confirm_sync_visible = false;
        ctx.dispatch_action(PermissionAction::SyncPermission);
    }

    pub fn cancel_sync(&mut self) {
        self.confirm_sync_visible = false;
    }

    /// Keywords are stored before the query is dispatched, so the query sees them.
    pub fn on_keyword_change(&mut self, ctx: &mut StateCtx, keywords: &str) {
        self.search = keywords.to_owned();
        ctx.dispatch_action(PermissionAction::SetKeywords(keywords.to_owned()));
        ctx.dispatch_action(PermissionAction::QueryPermission);
    }

    pub fn on_page_change(&mut self, ctx: &mut StateCtx, page: u32) {
        if ctx.state::<PermissionState>().page_number != page {
            ctx.dispatch_action(PermissionAction::SetPageNumber(page));
        }
    }

    pub fn on_limit_change(&mut self, ctx: &mut StateCtx, limit: u32) {
        if ctx.state::<PermissionState>().limit != limit {
            ctx.dispatch_action(PermissionAction::SetLimit(limit));
        }
    }

    /// Cancel of either modal.
    pub fn close_modal(&mut self) {
        self.create_visible = false;
        self.edit_visible = false;
        self.form.reset_fields();
    }

    /// OK of either modal: validate, store the values, submit and close.
    pub fn submit_form(&mut self, ctx: &mut StateCtx) -> Result<(), Vec<ValidationError>> {
        let values = self.form.validate_fields()?;
        ctx.dispatch_action(PermissionAction::SetFormValues(
            PermissionFormValues::from_form(&values),
        ));
        ctx.dispatch_action(PermissionAction::SubmitForm);
        self.close_modal();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Paginated;
    use crate::permission::{self, PermissionItem};

    fn setup() -> (StateCtx, PermissionModule) {
        let mut ctx = StateCtx::new();
        ctx.add_state(Messages::default());
        permission::register(&mut ctx, 10);
        let module = PermissionModule::new(ctx.state::<Messages>());
        (ctx, module)
    }

    fn seed(ctx: &mut StateCtx) {
        ctx.dispatch_action(PermissionAction::AssignPermissions(Paginated {
            results: vec![PermissionItem {
                id: 4,
                resource: "role".to_owned(),
                description: "update role".to_owned(),
                path: "/roles/:id".to_owned(),
                method: "put".to_owned(),
                is_default: false,
            }],
            page_size: 10,
            current_page: 1,
            total_items: 1,
            next: None,
            previous: None,
        }));
    }

    #[test]
    fn mount_queries_once_and_pagination_changes_query_once_each() {
        let (mut ctx, mut module) = setup();
        ctx.run_effects();
        assert_eq!(ctx.queued_commands(), 0, "nothing runs before mount");

        module.mount(&mut ctx);
        ctx.run_effects();
        ctx.run_effects();
        assert_eq!(ctx.queued_commands(), 1);

        module.on_page_change(&mut ctx, 2);
        module.on_page_change(&mut ctx, 2);
        ctx.run_effects();
        assert_eq!(ctx.queued_commands(), 2);

        module.on_limit_change(&mut ctx, 20);
        ctx.run_effects();
        assert_eq!(ctx.queued_commands(), 3);
        assert_eq!(ctx.state::<PermissionState>().page_number, 1);
    }

    #[test]
    fn create_sets_post_and_opens_create_modal() {
        let (mut ctx, mut module) = setup();
        ctx.dispatch_action(PermissionAction::SetId(9));

        module.on_create(&mut ctx);

        let state = ctx.state::<PermissionState>();
        assert_eq!(state.form_method, FormMethod::Post);
        assert_eq!(state.id, None);
        assert!(module.is_create_visible());
        assert!(!module.is_edit_visible());
        assert_eq!(ctx.queued_commands(), 0);
    }

    #[test]
    fn edit_sets_id_then_put_and_prefills() {
        let (mut ctx, mut module) = setup();
        seed(&mut ctx);

        module.on_edit(&mut ctx, 4);

        let state = ctx.state::<PermissionState>();
        assert_eq!(state.id, Some(4));
        assert_eq!(state.form_method, FormMethod::Put);
        assert!(module.is_edit_visible());
        assert_eq!(module.form().value(PATH), "/roles/:id");
    }

    #[test]
    fn delete_dispatches_immediately() {
        let (mut ctx, mut module) = setup();

        module.on_delete(&mut ctx, 4);

        assert_eq!(ctx.state::<PermissionState>().pending_delete, Some(4));
        assert_eq!(ctx.queued_commands(), 1);
    }

    #[test]
    fn sync_waits_for_confirmation() {
        let (mut ctx, mut module) = setup();

        module.request_sync();
        assert!(module.is_confirm_sync_visible());
        assert_eq!(ctx.queued_commands(), 0);

        module.cancel_sync();
        assert_eq!(ctx.queued_commands(), 0);

        module.request_sync();
        module.confirm_sync(&mut ctx);
        assert!(!module.is_confirm_sync_visible());
        assert_eq!(ctx.queued_commands(), 1);
    }

    #[test]
    fn search_stores_keywords_before_querying() {
        let (mut ctx, mut module) = setup();

        module.on_keyword_change(&mut ctx, "role");

        assert_eq!(ctx.state::<PermissionState>().keywords, "role");
        assert_eq!(ctx.queued_commands(), 1);
    }

    #[test]
    fn invalid_form_stays_open() {
        let (mut ctx, mut module) = setup();
        module.on_create(&mut ctx);
        module.form_mut().set_value(RESOURCE, "user");

        let errors = module.submit_form(&mut ctx).expect_err("missing fields");

        assert_eq!(errors.len(), 3);
        assert!(module.is_create_visible());
        assert_eq!(ctx.queued_commands(), 0);
    }

    #[test]
    fn valid_form_submits_and_closes() {
        let (mut ctx, mut module) = setup();
        module.on_create(&mut ctx);
        module.form_mut().set_values([
            (RESOURCE, "user".to_owned()),
            (DESCRIPTION, " list users ".to_owned()),
            (PATH, "/users".to_owned()),
            (METHOD, "get".to_owned()),
        ]);

        module.submit_form(&mut ctx).expect("valid form");

        assert!(!module.is_create_visible());
        assert_eq!(
            ctx.state::<PermissionState>().form_values.description,
            "list users"
        );
        assert_eq!(ctx.queued_commands(), 1);
    }
}
