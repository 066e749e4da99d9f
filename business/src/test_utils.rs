//! Mock-server harness for command tests.
//!
//! ```ignore
//! let mut t = TestContext::new().await;
//! t.mock_login_ok("jwt").await;
//! t.ctx.dispatch_action(LoginAction::enter_login());
//! t.flush_and_wait().await;
//! ```

use std::time::Duration;

use truthy_states::StateCtx;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::permission::PermissionItem;
use crate::{AuthCompute, BusinessConfig, build_state_ctx};

pub const TEST_TOKEN: &str = "test_token";

pub struct TestContext {
    pub mock_server: MockServer,
    pub ctx: StateCtx,
}

impl TestContext {
    pub async fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let mock_server = MockServer::start().await;
        let ctx = build_state_ctx(BusinessConfig::new(mock_server.uri()));
        Self { mock_server, ctx }
    }

    pub fn set_authenticated(&mut self) {
        self.ctx
            .updater()
            .set(AuthCompute::authenticated("root", TEST_TOKEN));
        self.ctx.sync_computes();
    }

    /// Flush queued commands and wait until every task, including the ones
    /// enqueued by results of earlier tasks, has finished.
    pub async fn flush_and_wait(&mut self) {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            self.ctx.sync_computes();
            self.ctx.flush_commands();
            if self.ctx.task_count() == 0 {
                break;
            }
            assert!(
                std::time::Instant::now() < deadline,
                "timed out with {} task(s) pending",
                self.ctx.task_count()
            );
            while self.ctx.task_set_mut().join_next().await.is_some() {
                self.ctx.sync_computes();
            }
        }
        self.ctx.sync_computes();
    }

    pub async fn mock_json(
        &self,
        http_method: &str,
        route: &str,
        status: u16,
        body: serde_json::Value,
    ) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    /// Like [`Self::mock_json`] but only for requests carrying the test token.
    pub async fn mock_authorized(
        &self,
        http_method: &str,
        route: &str,
        status: u16,
        body: serde_json::Value,
    ) {
        Mock::given(method(http_method))
            .and(path(route))
            .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

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

pub fn sample_permission(id: u64) -> PermissionItem {
    PermissionItem {
        id,
        resource: format!("resource-{id}"),
        description: format!("permission {id}"),
        path: format!("/resource-{id}"),
        method: "get".to_owned(),
        is_default: false,
    }
}

pub fn permission_page(items: Vec<PermissionItem>, total: u64) -> serde_json::Value {
    serde_json::json!({
        "results": items,
        "pageSize": 10,
        "currentPage": 1,
        "totalItems": total,
        "next": null,
        "previous": null
    })
}
