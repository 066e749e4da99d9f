//! Permission page: breadcrumb, toolbar, table, pagination and the modals.

use egui::{Key, TextEdit, Ui};
use truthy_business::{MessageKey, Messages, PermissionState};

use crate::state::State;
use crate::widgets::{
    COLOR_ERROR, PageEvent, RowAction, pagination, permission_form_modal, permission_table,
    sync_confirmation,
};

pub fn permission_page(state: &mut State, ui: &mut Ui) {
    let State {
        ctx,
        permission_module: module,
        ..
    } = state;
    let messages = ctx.state::<Messages>().clone();

    module.mount(ctx);

    ui.horizontal(|ui| {
        ui.weak("Home");
        ui.weak("/");
        ui.strong(messages.get(MessageKey::PermissionTitle).into_owned());
    });
    ui.add_space(8.0);

    let list = ctx.state::<PermissionState>().clone();

    ui.horizontal(|ui| {
        if ui
            .button(messages.get(MessageKey::SyncButton).into_owned())
            .clicked()
        {
            module.request_sync();
        }
        if ui
            .button(messages.get(MessageKey::Create).into_owned())
            .clicked()
        {
            module.on_create(ctx);
        }

        ui.separator();

        let search = ui.add(
            TextEdit::singleline(module.search_mut())
                .hint_text(messages.get(MessageKey::SearchPlaceholder).into_owned())
                .desired_width(200.0),
        );
        if search.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            let keywords = module.search_mut().trim().to_owned();
            module.on_keyword_change(ctx, &keywords);
        }

        if list.is_loading {
            ui.spinner();
        }
        if let Some(synced) = list.last_synced {
            ui.weak(format!("Synced {}", synced.format("%Y-%m-%d %H:%M:%S")));
        }
    });

    if let Some(error) = &list.error {
        ui.colored_label(COLOR_ERROR, format!("Error: {error}"));
    }
    ui.add_space(8.0);

    match permission_table(ui, &list.permissions, &messages) {
        Some(RowAction::Edit(id)) => module.on_edit(ctx, id),
        Some(RowAction::Delete(id)) => module.on_delete(ctx, id),
        None => {}
    }

    ui.add_space(8.0);
    match pagination(
        ui,
        list.page_number,
        list.page_count(),
        list.limit,
        list.total_items,
    ) {
        Some(PageEvent::Page(page)) => module.on_page_change(ctx, page),
        Some(PageEvent::Limit(limit)) => module.on_limit_change(ctx, limit),
        None => {}
    }

    permission_form_modal(ctx, module, &messages, ui);
    sync_confirmation(ctx, module, &messages, ui);
}
