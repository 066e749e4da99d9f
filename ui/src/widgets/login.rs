//! Login form.
//!
//! Every keystroke is dispatched as `CHANGE_USERNAME`/`CHANGE_PASSWORD`; the
//! inputs render whatever [`LoginState`] holds.

use egui::{Align, Key, Layout, Response, TextEdit, Ui};
use truthy_business::login::{PASSWORD, USERNAME, submit_login};
use truthy_business::{LoginAction, LoginState};
use truthy_states::StateCtx;

use super::form_field::{COLOR_ERROR, LABEL_WIDTH, field_error};

pub fn login_widget(state_ctx: &mut StateCtx, ui: &mut Ui) -> Response {
    let state = state_ctx.state::<LoginState>();
    let mut username = state.username.clone();
    let mut password = state.password.clone();
    let is_loading = state.is_loading;
    let error = state.error.clone();
    let username_error = state.field_error(USERNAME).map(str::to_owned);
    let password_error = state.field_error(PASSWORD).map(str::to_owned);

    let mut should_login = false;

    let response = ui
        .with_layout(Layout::top_down(Align::Center), |ui| {
            ui.add_space(20.0);
            ui.heading("Truthy Admin");
            ui.add_space(40.0);

            if let Some(err) = &error {
                ui.colored_label(COLOR_ERROR, err);
                ui.add_space(8.0);
            }

            ui.with_layout(Layout::top_down(Align::Min), |ui| {
                ui.horizontal(|ui| {
                    ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Username"));
                    ui.add(TextEdit::singleline(&mut username).desired_width(220.0));
                });
                field_error(ui, username_error.as_deref());

                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Password"));
                    let password_response = ui.add(
                        TextEdit::singleline(&mut password)
                            .password(true)
                            .desired_width(220.0),
                    );

                    if password_response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                        should_login = true;
                    }
                });
                field_error(ui, password_error.as_deref());
            });

            ui.add_space(16.0);

            if is_loading {
                ui.spinner();
                ui.label("Signing in...");
            } else if ui.button("Login").clicked() {
                should_login = true;
            }
        })
        .response;

    let state = state_ctx.state::<LoginState>();
    let username_changed = state.username != username;
    let password_changed = state.password != password;
    if username_changed {
        state_ctx.dispatch_action(LoginAction::change_username(username));
    }
    if password_changed {
        state_ctx.dispatch_action(LoginAction::change_password(password));
    }

    if should_login && !is_loading {
        submit_login(state_ctx);
    }

    response
}

#[cfg(test)]
mod login_widget_tests {
    use egui_kittest::Harness;
    use kittest::Queryable;
    use truthy_business::{LoginAction, LoginState};

    use crate::state::State;

    use super::login_widget;

    fn harness<'a>() -> Harness<'a, State> {
        let state = State::test("http://127.0.0.1:9".to_owned());
        Harness::new_ui_state(
            |ui, state: &mut State| {
                state.begin_frame();
                login_widget(&mut state.ctx, ui);
            },
            state,
        )
    }

    #[test]
    fn test_login_form_displayed() {
        let mut harness = harness();
        harness.step();

        assert!(harness.query_by_label("Username").is_some());
        assert!(harness.query_by_label("Password").is_some());
        assert!(harness.query_by_label("Login").is_some());
    }

    #[test]
    fn test_blank_submit_shows_required_errors() {
        let mut harness = harness();
        harness.step();

        harness.get_by_label("Login").click();
        harness.run();

        assert!(
            harness
                .query_by_label_contains("Please input your username")
                .is_some()
        );
        assert!(
            harness
                .query_by_label_contains("Please input your password")
                .is_some()
        );
        assert_eq!(harness.state().ctx.queued_commands(), 0);
    }

    #[test]
    fn test_login_error_is_shown() {
        let mut harness = harness();
        harness
            .state_mut()
            .ctx
            .dispatch_action(LoginAction::login_error("Invalid username or password"));
        harness.run();

        assert!(
            harness
                .query_by_label_contains("Invalid username or password")
                .is_some()
        );
        assert!(!harness.state().ctx.state::<LoginState>().is_logged);
    }
}
