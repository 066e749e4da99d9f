//! Four-step strength meter shown under the new-password input.

use egui::{Color32, ProgressBar, RichText, Ui};
use truthy_business::PasswordStrength;
use truthy_business::password_strength::STRENGTH_STEPS;

const COLOR_MET: Color32 = Color32::from_rgb(34, 139, 34);
const COLOR_UNMET: Color32 = Color32::from_rgb(160, 160, 160);

/// One caption per signal, in [`PasswordStrength::signals`] order.
const CAPTIONS: [&str; STRENGTH_STEPS] = ["a-z", "A-Z", "0-9", "#?!"];

fn bar_color(score: usize) -> Color32 {
    match score {
        0 | 1 => Color32::from_rgb(220, 53, 69),
        2 => Color32::from_rgb(255, 165, 0),
        3 => Color32::from_rgb(154, 205, 50),
        _ => COLOR_MET,
    }
}

pub fn strength_meter(ui: &mut Ui, strength: PasswordStrength) {
    ui.add(
        ProgressBar::new(strength.percent() / 100.0)
            .desired_width(220.0)
            .fill(bar_color(strength.score()))
            .text(format!("{}%", strength.percent())),
    );

    ui.horizontal(|ui| {
        for (met, caption) in strength.signals().into_iter().zip(CAPTIONS) {
            let color = if met { COLOR_MET } else { COLOR_UNMET };
            ui.label(RichText::new(caption).small().color(color));
        }
    });
}

#[cfg(test)]
mod tests {
    use egui_kittest::Harness;
    use kittest::Queryable;

    use super::*;

    #[test]
    fn test_meter_shows_every_caption() {
        let mut harness = Harness::new_ui(|ui| {
            strength_meter(ui, PasswordStrength::evaluate("abcdefg"));
        });
        harness.step();

        for caption in CAPTIONS {
            assert!(harness.query_by_label(caption).is_some(), "missing {caption}");
        }
    }

    #[test]
    fn test_bar_color_follows_score() {
        assert_eq!(bar_color(0), bar_color(1));
        assert_eq!(bar_color(STRENGTH_STEPS), COLOR_MET);
    }
}
