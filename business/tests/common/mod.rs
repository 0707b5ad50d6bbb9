//! Shared helpers for the business integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use people_business::{LoaderConfig, RecordingSurface, ReqwestFetcher, UserTableLoader};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USERS_PATH: &str = "/users";

/// A loader pointed at a fresh mock server, recording what it renders.
pub struct TestCtx {
    pub server: MockServer,
    pub surface: RecordingSurface,
    pub loader: UserTableLoader,
}

impl TestCtx {
    pub async fn new(timeout: Duration) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let server = MockServer::start().await;
        let surface = RecordingSurface::new();
        let loader = UserTableLoader::new(
            config_for(&server, timeout),
            Arc::new(ReqwestFetcher::default()),
            Arc::new(surface.clone()),
        );
        Self {
            server,
            surface,
            loader,
        }
    }

    pub async fn mount_users(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(USERS_PATH))
            .respond_with(response)
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

pub fn config_for(server: &MockServer, timeout: Duration) -> LoaderConfig {
    LoaderConfig::new(format!("{}{USERS_PATH}", server.uri()), timeout)
}

pub fn sample_users() -> Value {
    json!([
        {
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz"
        },
        {
            "id": 2,
            "name": "<b>Ervin</b>",
            "username": "Antonette",
            "email": "Shanna@melissa.tv"
        }
    ])
}
