//! "Change Password" modal of the account page.

use egui::{Button, Ui, Window};
use truthy_business::account::{CONFIRM_PASSWORD, ChangePasswordPhase, OLD_PASSWORD, PASSWORD};
use truthy_business::{AccountState, MessageKey, Messages, SecurityTab};
use truthy_states::StateCtx;

use super::form_field::form_field;
use super::password_strength::strength_meter;

/// Shows the modal while the tab is open; also applies the submission outcome.
pub fn change_password_modal(state_ctx: &mut StateCtx, tab: &mut SecurityTab, ui: &mut Ui) {
    tab.observe(state_ctx);
    if !tab.is_open() {
        return;
    }

    let messages = state_ctx.state::<Messages>().clone();
    let is_loading = state_ctx.state::<AccountState>().is_loading();
    let submitting = tab.phase() == ChangePasswordPhase::Submitting || is_loading;
    let mut open = true;
    let mut cancelled = false;

    Window::new(messages.get(MessageKey::ChangePasswordTitle).into_owned())
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            form_field(ui, tab.form_mut(), OLD_PASSWORD, "Old password", true);

            if form_field(ui, tab.form_mut(), PASSWORD, "New password", true) {
                tab.field_edited(state_ctx, PASSWORD);
            }
            strength_meter(ui, tab.strength(state_ctx));

            form_field(ui, tab.form_mut(), CONFIRM_PASSWORD, "Confirm password", true);

            ui.add_space(16.0);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!submitting, Button::new(messages.get(MessageKey::Ok).into_owned()))
                    .clicked()
                    && let Err(errors) = tab.confirm(state_ctx)
                {
                    log::info!("change password rejected with {} error(s)", errors.len());
                }

                if ui.button(messages.get(MessageKey::Cancel).into_owned()).clicked() {
                    cancelled = true;
                }

                if submitting {
                    ui.spinner();
                }
            });
        });

    if !open || cancelled {
        tab.cancel(state_ctx);
    }
}
