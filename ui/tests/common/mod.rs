use egui_kittest::Harness;
use truthy_business::AuthCompute;
use truthy_ui::TruthyApp;
use truthy_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test_token";

/// Upper bound of frame/task rounds [`TestCtx::settle`] waits for.
const SETTLE_ROUNDS: usize = 10;

/// Gives the helpers access to the [`State`] inside either harness flavour.
pub trait AppState {
    fn app_state(&mut self) -> &mut State;
}

impl AppState for State {
    fn app_state(&mut self) -> &mut State {
        self
    }
}

impl AppState for TruthyApp {
    fn app_state(&mut self) -> &mut State {
        self.state_mut()
    }
}

pub struct TestCtx<'a, T = State> {
    mock_server: MockServer,
    harness: Harness<'a, T>,
}

impl<'a, T: AppState> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, T> {
        &self.harness
    }

    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    pub fn state_mut(&mut self) -> &mut State {
        self.harness.state_mut().app_state()
    }

    /// Run frames until no command is queued or running.
    ///
    /// Each round renders a frame (which flushes what the frame queued), then
    /// waits for the spawned tasks so their results are applied by the next frame.
    pub async fn settle(&mut self) {
        for _ in 0..SETTLE_ROUNDS {
            self.harness.step();
            let ctx = &mut self.harness.state_mut().app_state().ctx;
            if ctx.task_count() == 0 && ctx.queued_commands() == 0 {
                break;
            }
            ctx.await_tasks().await;
        }
        self.harness.step();
    }

    #[allow(unused)]
    pub async fn requests_to(&self, http_method: &str, route: &str) -> Vec<wiremock::Request> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == route)
            .collect()
    }
}

impl<'a> TestCtx<'a, State> {
    /// Harness around a page function, framed the way the app frames it.
    #[allow(unused)]
    pub async fn new(app: impl FnMut(&mut egui::Ui, &mut State) + 'a) -> Self {
        let (mock_server, state) = setup_test_state().await;
        Self::with_state(mock_server, state, app)
    }

    /// Like [`Self::new`] with a signed-in session.
    #[allow(unused)]
    pub async fn new_authenticated(app: impl FnMut(&mut egui::Ui, &mut State) + 'a) -> Self {
        let (mock_server, mut state) = setup_test_state().await;
        authenticate(&mut state);
        Self::with_state(mock_server, state, app)
    }

    fn with_state(
        mock_server: MockServer,
        state: State,
        mut app: impl FnMut(&mut egui::Ui, &mut State) + 'a,
    ) -> Self {
        let harness = Harness::new_ui_state(
            move |ui, state: &mut State| {
                state.begin_frame();
                app(ui, state);
                state.end_frame(ui.ctx());
            },
            state,
        );

        Self {
            mock_server,
            harness,
        }
    }
}

impl<'a> TestCtx<'a, TruthyApp> {
    #[allow(unused)]
    pub async fn new_app() -> Self {
        let (mock_server, state) = setup_test_state().await;
        let app = TruthyApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }
}

pub fn authenticate(state: &mut State) {
    state
        .ctx
        .updater()
        .set(AuthCompute::authenticated("root", TEST_TOKEN));
    state.ctx.sync_computes();
}

async fn setup_test_state() -> (MockServer, State) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mock_server = MockServer::start().await;
    let state = State::test(mock_server.uri());
    (mock_server, state)
}

#[allow(unused)]
pub async fn mock_json(
    server: &MockServer,
    http_method: &str,
    route: &str,
    status: u16,
    body: serde_json::Value,
) {
    Mock::given(method(http_method))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// One page of the list endpoint, with ids `first..first + count`.
#[allow(unused)]
pub fn permission_page(first: u64, count: u64, total: u64) -> serde_json::Value {
    let results: Vec<serde_json::Value> = (first..first + count)
        .map(|id| {
            serde_json::json!({
                "id": id,
                "resource": format!("resource-{id}"),
                "description": format!("permission {id}"),
                "path": format!("/resource-{id}"),
                "method": "get",
                "isDefault": false
            })
        })
        .collect();

    serde_json::json!({
        "results": results,
        "pageSize": 10,
        "currentPage": 1,
        "totalItems": total,
        "next": null,
        "previous": null
    })
}
