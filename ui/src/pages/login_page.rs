//! Login page for unauthenticated users.

use egui::{Align, Layout, Ui};
use truthy_business::BusinessConfig;

use crate::{state::State, widgets};

/// Max width of the form column.
const FORM_WIDTH: f32 = 420.0;

/// Centered login form, with the server it signs in to underneath.
pub fn login_page(state: &mut State, ui: &mut Ui) {
    let api_url = state.ctx.state::<BusinessConfig>().api_url();

    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.set_max_width(FORM_WIDTH);
        widgets::login_widget(&mut state.ctx, ui);

        ui.add_space(24.0);
        ui.weak(format!("Server: {api_url}"));
    });
}
