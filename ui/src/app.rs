use truthy_business::{AuthCompute, LogoutCommand, PermissionModule, SecurityTab};

use crate::pages;
use crate::state::{Route, State};

pub struct TruthyApp {
    state: State,
}

impl TruthyApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn navigate(&mut self, route: Route) {
        if self.state.route == Route::Permission && route != Route::Permission {
            self.state.permission_module.unmount(&mut self.state.ctx);
        }
        self.state.route = route;
    }

    fn logout(&mut self) {
        self.state.permission_module.unmount(&mut self.state.ctx);
        self.state.route = Route::default();

        let messages = self.state.messages();
        self.state.security_tab = SecurityTab::new(&messages);
        self.state.permission_module = PermissionModule::new(&messages);
        self.state.ctx.dispatch::<LogoutCommand>();
    }
}

impl Default for TruthyApp {
    fn default() -> Self {
        Self::new(State::default())
    }
}

impl eframe::App for TruthyApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Sync Compute for render
        self.state.begin_frame();

        if self.state.is_authenticated() {
            let username = self
                .state
                .ctx
                .cached::<AuthCompute>()
                .and_then(AuthCompute::username);
            let mut route = self.state.route;
            let mut logout = false;

            egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
                egui::MenuBar::new().ui(ui, |ui| {
                    ui.selectable_value(&mut route, Route::Permission, "Permission");
                    ui.selectable_value(&mut route, Route::Account, "Account");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        logout = ui.button("Logout").clicked();
                        if let Some(username) = username {
                            ui.label(username.as_str());
                        }
                    });
                });
            });

            if logout {
                self.logout();
            } else {
                if route != self.state.route {
                    self.navigate(route);
                }
                egui::CentralPanel::default().show(ctx, |ui| match self.state.route {
                    Route::Permission => pages::permission_page(&mut self.state, ui),
                    Route::Account => pages::account_page(&mut self.state, ui),
                });
            }
        } else {
            egui::CentralPanel::default().show(ctx, |ui| {
                pages::login_page(&mut self.state, ui);
            });
        }

        // Run background jobs
        self.state.end_frame(ctx);
    }
}
