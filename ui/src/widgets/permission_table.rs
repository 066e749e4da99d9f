//! Permission list, Typora-like: clean borders and a shaded header row.

use egui::{Color32, Frame, InnerResponse, Margin, RichText, ScrollArea, Stroke, Ui};
use truthy_business::{MessageKey, Messages, PermissionItem};

/// Border color for the table frame (subtle gray)
const TABLE_BORDER_COLOR: Color32 = Color32::from_rgb(200, 200, 200);

/// Header background color (light gray)
const HEADER_BG_COLOR: Color32 = Color32::from_rgb(245, 245, 245);

const HEADERS: [&str; 6] = ["ID", "Resource", "Description", "Path", "Method", "Actions"];

/// What the user clicked in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit(u64),
    Delete(u64),
}

fn header_cell<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> InnerResponse<R> {
    Frame::NONE
        .fill(HEADER_BG_COLOR)
        .inner_margin(Margin::symmetric(8, 8))
        .show(ui, add_contents)
}

fn data_cell<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> InnerResponse<R> {
    Frame::NONE
        .inner_margin(Margin::symmetric(8, 6))
        .show(ui, add_contents)
}

/// Renders the rows; at most one action is reported per frame.
pub fn permission_table(
    ui: &mut Ui,
    permissions: &[PermissionItem],
    messages: &Messages,
) -> Option<RowAction> {
    let edit = messages.get(MessageKey::Edit).into_owned();
    let delete = messages.get(MessageKey::Delete).into_owned();
    let mut action = None;

    Frame::NONE
        .stroke(Stroke::new(1.0, TABLE_BORDER_COLOR))
        .inner_margin(Margin::ZERO)
        .show(ui, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                egui::Grid::new("permission_table")
                    .num_columns(HEADERS.len())
                    .striped(true)
                    .spacing([16.0, 0.0])
                    .min_col_width(40.0)
                    .show(ui, |ui| {
                        for label in HEADERS {
                            header_cell(ui, |ui| {
                                ui.strong(label);
                            });
                        }
                        ui.end_row();

                        for item in permissions {
                            data_cell(ui, |ui| {
                                ui.label(item.id.to_string());
                            });
                            data_cell(ui, |ui| {
                                ui.label(&item.resource);
                                if item.is_default {
                                    ui.label(RichText::new("default").small().weak());
                                }
                            });
                            data_cell(ui, |ui| {
                                ui.label(&item.description);
                            });
                            data_cell(ui, |ui| {
                                ui.label(RichText::new(&item.path).monospace());
                            });
                            data_cell(ui, |ui| {
                                ui.label(item.method.to_uppercase());
                            });
                            data_cell(ui, |ui| {
                                ui.horizontal(|ui| {
                                    if ui.button(edit.as_str()).clicked() {
                                        action = Some(RowAction::Edit(item.id));
                                    }
                                    if ui.button(delete.as_str()).clicked() {
                                        action = Some(RowAction::Delete(item.id));
                                    }
                                });
                            });
                            ui.end_row();
                        }
                    });

                if permissions.is_empty() {
                    ui.add_space(8.0);
                    ui.weak("No permissions");
                }
            });
        });

    action
}

#[cfg(test)]
mod tests {
    use egui_kittest::Harness;
    use kittest::Queryable;

    use super::*;

    fn item(id: u64, resource: &str) -> PermissionItem {
        PermissionItem {
            id,
            resource: resource.to_owned(),
            description: format!("{resource} permission"),
            path: format!("/{resource}"),
            method: "get".to_owned(),
            is_default: false,
        }
    }

    #[test]
    fn test_rows_and_headers_are_rendered() {
        let items = vec![item(1, "user"), item(2, "role")];
        let messages = Messages::default();
        let mut harness = Harness::new_ui(|ui| {
            permission_table(ui, &items, &messages);
        });
        harness.step();

        for header in HEADERS {
            assert!(harness.query_by_label(header).is_some(), "missing {header}");
        }
        assert!(harness.query_by_label("user").is_some());
        assert!(harness.query_by_label("/role").is_some());
        assert_eq!(harness.query_all_by_label("Edit").count(), 2);
        assert_eq!(harness.query_all_by_label("GET").count(), 2);
    }

    #[test]
    fn test_empty_table_says_so() {
        let messages = Messages::default();
        let mut harness = Harness::new_ui(|ui| {
            permission_table(ui, &[], &messages);
        });
        harness.step();

        assert!(harness.query_by_label("No permissions").is_some());
    }
}
