use egui::{Button, ComboBox, Ui};

/// Page sizes offered by the size selector.
pub const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Page(u32),
    Limit(u32),
}

/// Previous/next buttons, the page indicator and the page-size selector.
pub fn pagination(
    ui: &mut Ui,
    page: u32,
    page_count: u32,
    limit: u32,
    total_items: u64,
) -> Option<PageEvent> {
    let mut event = None;

    ui.horizontal(|ui| {
        if ui.add_enabled(page > 1, Button::new("< Prev")).clicked() {
            event = Some(PageEvent::Page(page - 1));
        }
        ui.label(format!("Page {page} / {page_count}"));
        if ui
            .add_enabled(page < page_count, Button::new("Next >"))
            .clicked()
        {
            event = Some(PageEvent::Page(page + 1));
        }

        ui.separator();

        let mut selected = limit;
        ComboBox::from_id_salt("permission_page_size")
            .selected_text(format!("{limit} / page"))
            .show_ui(ui, |ui| {
                for size in PAGE_SIZES {
                    ui.selectable_value(&mut selected, size, format!("{size} / page"));
                }
            });
        if selected != limit {
            event = Some(PageEvent::Limit(selected));
        }

        ui.weak(format!("{total_items} total"));
    });

    event
}

#[cfg(test)]
mod tests {
    use egui_kittest::Harness;
    use kittest::Queryable;

    use super::*;

    #[test]
    fn test_next_reports_following_page() {
        let mut event = None;
        {
            let mut harness = Harness::new_ui(|ui| {
                if let Some(e) = pagination(ui, 1, 3, 10, 25) {
                    event = Some(e);
                }
            });
            harness.step();
            assert!(harness.query_by_label("Page 1 / 3").is_some());

            harness.get_by_label("Next >").click();
            harness.run();
        }
        assert_eq!(event, Some(PageEvent::Page(2)));
    }
}
