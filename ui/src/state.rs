use truthy_business::{
    AuthCompute, BusinessConfig, Messages, PermissionModule, SecurityTab, build_state_ctx,
};
use truthy_states::StateCtx;

/// Which page the signed-in shell shows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    #[default]
    Permission,
    Account,
}

/// The main application state.
///
/// Store-backed data lives in `ctx`; the page controllers hold what a page
/// keeps locally (modal visibility, form instances).
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
    pub route: Route,
    pub security_tab: SecurityTab,
    pub permission_module: PermissionModule,
}

impl Default for State {
    fn default() -> Self {
        Self::new(BusinessConfig::default())
    }
}

impl State {
    pub fn new(config: BusinessConfig) -> Self {
        let ctx = build_state_ctx(config);
        let messages = ctx.state::<Messages>();
        let security_tab = SecurityTab::new(messages);
        let permission_module = PermissionModule::new(messages);

        Self {
            ctx,
            route: Route::default(),
            security_tab,
            permission_module,
        }
    }

    pub fn test(base_url: String) -> Self {
        Self::new(BusinessConfig::new(base_url))
    }

    pub fn is_authenticated(&self) -> bool {
        self.ctx
            .cached::<AuthCompute>()
            .is_some_and(AuthCompute::is_authenticated)
    }

    pub fn messages(&self) -> Messages {
        self.ctx.state::<Messages>().clone()
    }

    /// Apply results that commands sent since the last frame.
    pub fn begin_frame(&mut self) {
        self.ctx.sync_computes();
    }

    /// Recompute derived values and start the commands this frame queued.
    pub fn end_frame(&mut self, egui_ctx: &egui::Context) {
        self.ctx.run_computed();
        self.ctx.flush_commands();
        self.ctx.reap_tasks();

        // Results arrive without input events; keep polling while work is in flight.
        // Web tasks are not tracked, so the web build always polls.
        if self.ctx.task_count() > 0 || cfg!(target_arch = "wasm32") {
            egui_ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}
