//! Account page: the security tab with the change-password entry point.

use egui::{RichText, Ui};
use truthy_business::{AuthCompute, MessageKey};

use crate::{state::State, widgets};

pub fn account_page(state: &mut State, ui: &mut Ui) {
    let messages = state.messages();
    let username = state
        .ctx
        .cached::<AuthCompute>()
        .and_then(AuthCompute::username);

    ui.heading("Account");
    if let Some(username) = username {
        ui.label(format!("Signed in as {username}"));
    }
    ui.separator();

    ui.label(RichText::new("Security").strong());
    ui.horizontal(|ui| {
        ui.label("Password");
        if ui
            .button(messages.get(MessageKey::ChangePassword).into_owned())
            .clicked()
        {
            state.security_tab.open();
        }
    });

    widgets::change_password_modal(&mut state.ctx, &mut state.security_tab, ui);
}
