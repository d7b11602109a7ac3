//! Common test utilities
//!
//! WireMock-based stand-in for the smart-home backend API.

#![allow(dead_code)]

use serde_json::{json, Value};
use smart_home_mcp::{DeviceGateway, ServerConfig};
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_TOKEN: &str = "test-token-7f3a";

/// Mock smart-home backend for testing
pub struct MockBackend {
    pub server: MockServer,
    pub base_url: String,
}

impl MockBackend {
    /// Start an empty mock backend; tests mount the endpoints they need
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Gateway pointed at this backend
    pub fn gateway(&self, token: &str) -> DeviceGateway {
        gateway_for(&self.base_url, token)
    }

    /// Mount `GET /api/v1/devices/overview/` returning `body`
    pub async fn mock_overview(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/devices/overview/"))
            .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Sample overview payload
    pub fn sample_overview() -> Value {
        json!({
            "success": true,
            "devices": [
                {"id": "5", "name": "客厅空调", "type": "air_conditioner", "status": "online"},
                {"id": "12", "name": "卧室灯", "type": "light", "status": "offline"}
            ]
        })
    }

    /// Fail the test if any request reaches the backend
    pub async fn expect_no_requests(&self) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}

/// Gateway for an arbitrary base URL with a short timeout
pub fn gateway_for(base_url: &str, token: &str) -> DeviceGateway {
    let mut config = ServerConfig::default();
    config.backend.url = base_url.parse().expect("valid mock URL");
    config.backend.auth_token = token.to_string();
    config.backend.timeout = Duration::from_millis(500);
    DeviceGateway::new(&config).expect("gateway builds")
}

/// Address nothing listens on
pub fn unreachable_backend() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
