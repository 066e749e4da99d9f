//! Create/edit modal and the sync confirmation of the permission page.

use egui::{Button, ComboBox, Ui, Window};
use truthy_business::permission::{DESCRIPTION, METHOD, METHODS, PATH, RESOURCE};
use truthy_business::{MessageKey, Messages, PermissionModule};
use truthy_states::StateCtx;

use super::form_field::{LABEL_WIDTH, field_error, form_field};

/// Shared by both modals; the title tells them apart.
pub fn permission_form_modal(
    state_ctx: &mut StateCtx,
    module: &mut PermissionModule,
    messages: &Messages,
    ui: &mut Ui,
) {
    let title = if module.is_edit_visible() {
        messages.get(MessageKey::Edit)
    } else if module.is_create_visible() {
        messages.get(MessageKey::Create)
    } else {
        return;
    };

    let mut open = true;
    let mut cancelled = false;

    Window::new(format!("{title} {}", messages.get(MessageKey::PermissionTitle)))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            let form = module.form_mut();
            form_field(ui, form, RESOURCE, "Resource", false);
            form_field(ui, form, DESCRIPTION, "Description", false);
            form_field(ui, form, PATH, "Path", false);

            ui.horizontal(|ui| {
                ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Method"));
                let current = form.value(METHOD).to_owned();
                let mut selected = current.clone();
                ComboBox::from_id_salt("permission_method")
                    .selected_text(if current.is_empty() {
                        "Select".to_owned()
                    } else {
                        current.to_uppercase()
                    })
                    .show_ui(ui, |ui| {
                        for method in METHODS {
                            ui.selectable_value(&mut selected, method.to_owned(), method.to_uppercase());
                        }
                    });
                if selected != current {
                    form.set_value(METHOD, selected);
                }
            });
            field_error(ui, form.errors(METHOD).first().map(String::as_str));

            ui.add_space(16.0);

            ui.horizontal(|ui| {
                if ui.add(Button::new(messages.get(MessageKey::Ok).into_owned())).clicked()
                    && let Err(errors) = module.submit_form(state_ctx)
                {
                    log::info!("permission form rejected with {} error(s)", errors.len());
                }
                if ui.button(messages.get(MessageKey::Cancel).into_owned()).clicked() {
                    cancelled = true;
                }
            });
        });

    if !open || cancelled {
        module.close_modal();
    }
}

/// Sync only runs once the user confirms it here.
pub fn sync_confirmation(
    state_ctx: &mut StateCtx,
    module: &mut PermissionModule,
    messages: &Messages,
    ui: &mut Ui,
) {
    if !module.is_confirm_sync_visible() {
        return;
    }

    let title = format!(
        "{} {}",
        messages.get(MessageKey::SyncButton),
        messages.get(MessageKey::PermissionTitle)
    );
    let mut open = true;

    Window::new(title)
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            ui.label(messages.get(MessageKey::SyncConfirmation).into_owned());
            ui.add_space(16.0);

            ui.horizontal(|ui| {
                if ui.button(messages.get(MessageKey::SyncOk).into_owned()).clicked() {
                    module.confirm_sync(state_ctx);
                }
                if ui.button(messages.get(MessageKey::Cancel).into_owned()).clicked() {
                    module.cancel_sync();
                }
            });
        });

    if !open {
        module.cancel_sync();
    }
}
