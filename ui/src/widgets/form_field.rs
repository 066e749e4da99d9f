//! Labelled text input bound to a [`FormInstance`] field.

use egui::{Color32, RichText, TextEdit, Ui};
use truthy_business::FormInstance;

/// Red color for validation messages
pub const COLOR_ERROR: Color32 = Color32::from_rgb(220, 53, 69);

pub const LABEL_WIDTH: f32 = 130.0;

/// Renders `label`, the input and the field's first error under it.
///
/// Returns whether the value was edited this frame. Errors of an edited field
/// are dropped right away.
pub fn form_field(
    ui: &mut Ui,
    form: &mut FormInstance,
    name: &str,
    label: &str,
    password: bool,
) -> bool {
    let response = ui
        .horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
            ui.add(
                TextEdit::singleline(form.value_mut(name))
                    .password(password)
                    .desired_width(220.0),
            )
        })
        .inner;

    let changed = response.changed();
    if changed {
        form.touch(name);
    }
    field_error(ui, form.errors(name).first().map(String::as_str));

    changed
}

/// A validation message, or nothing.
pub fn field_error(ui: &mut Ui, error: Option<&str>) {
    if let Some(error) = error {
        ui.horizontal(|ui| {
            ui.add_space(LABEL_WIDTH + ui.spacing().item_spacing.x);
            ui.label(RichText::new(error).small().color(COLOR_ERROR));
        });
    }
}
