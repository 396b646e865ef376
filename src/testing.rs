use std::net::SocketAddr;

use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;

use crate::config::Config;

/// A test application builder for integration testing.
///
/// Spins up the console on a random port with a throwaway SQLite event
/// store and a throwaway upload directory.
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_login_is_recorded() {
///     let app = TestApp::new().await;
///     let res = app.client.post_form(&app.url("/login"), &[("username", "admin"), ("password", "x")]).await;
///     assert_eq!(res.status, 200);
/// }
/// ```
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: TestClient,
    /// Handle to the event store; `None` when built without a sink.
    pub db: Option<DatabaseConnection>,
    pub config: Config,
}

impl TestApp {
    /// Create a test app with a working event sink.
    pub async fn new() -> Self {
        let tag = uuid::Uuid::new_v4();
        let config = Config {
            database_url: format!("sqlite:///tmp/canarygate_test_{}.db?mode=rwc", tag),
            server_host: "127.0.0.1".to_string(),
            server_port: 0, // OS assigns a random port
            environment: "test".to_string(),
            upload_dir: format!("/tmp/canarygate_test_uploads_{}", tag),
            max_upload_size: 1024 * 1024,
            brand_name: "Acme NetSecure Appliance".to_string(),
            app_slogan: "Unified edge security & telemetry".to_string(),
            brand_host: None,
        };

        Self::with_config(config).await
    }

    /// Create a test app whose event sink is unreachable.
    ///
    /// Every route must still answer normally; capture degrades to a
    /// no-op.
    pub async fn without_sink() -> Self {
        let tag = uuid::Uuid::new_v4();
        let config = Config {
            // A parent path that cannot exist makes the connect attempt fail.
            database_url: format!("sqlite:///tmp/no-such-dir-{}/events.db", tag),
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            environment: "test".to_string(),
            upload_dir: format!("/tmp/canarygate_test_uploads_{}", tag),
            max_upload_size: 1024 * 1024,
            brand_name: "Acme NetSecure Appliance".to_string(),
            app_slogan: "Unified edge security & telemetry".to_string(),
            brand_host: None,
        };

        Self::with_config(config).await
    }

    /// Create a test app with a custom config.
    pub async fn with_config(config: Config) -> Self {
        let app = crate::App::with_config(config.clone())
            .await
            .expect("Failed to create test app");

        let db = app.logger.connection().await;
        let router = app.router();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to get local addr");

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        let client = TestClient::new(addr);

        TestApp {
            addr,
            client,
            db,
            config: app.config,
        }
    }

    /// Get the base URL for the test server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// A simple HTTP test client with helper methods.
#[derive(Clone)]
pub struct TestClient {
    inner: reqwest::Client,
    base_addr: SocketAddr,
}

impl TestClient {
    /// Create a new test client pointing at the given address.
    pub fn new(addr: SocketAddr) -> Self {
        TestClient {
            inner: reqwest::Client::new(),
            base_addr: addr,
        }
    }

    /// Send a GET request.
    pub async fn get(&self, url: &str) -> TestResponse {
        let res = self.inner.get(url).send().await.expect("GET request failed");
        TestResponse::from_response(res).await
    }

    /// Send a GET request with an extra header.
    pub async fn get_with_header(&self, url: &str, name: &str, value: &str) -> TestResponse {
        let res = self
            .inner
            .get(url)
            .header(name, value)
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST request with url-encoded form fields.
    pub async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> TestResponse {
        let res = self
            .inner
            .post(url)
            .form(fields)
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST request with form fields and an extra header.
    pub async fn post_form_with_header(
        &self,
        url: &str,
        fields: &[(&str, &str)],
        name: &str,
        value: &str,
    ) -> TestResponse {
        let res = self
            .inner
            .post(url)
            .header(name, value)
            .form(fields)
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST request with a raw body and content type.
    pub async fn post_raw(&self, url: &str, content_type: &str, body: Vec<u8>) -> TestResponse {
        let res = self
            .inner
            .post(url)
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST request with a multipart form.
    pub async fn post_multipart(&self, url: &str, form: reqwest::multipart::Form) -> TestResponse {
        let res = self
            .inner
            .post(url)
            .multipart(form)
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Get the base URL.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.base_addr)
    }
}

/// A multipart form carrying a single named file part.
pub fn file_form(field_name: &str, filename: &str, bytes: Vec<u8>) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
    reqwest::multipart::Form::new().part(field_name.to_string(), part)
}

/// A simplified HTTP response for test assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        TestResponse { status, body }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Failed to parse response as JSON")
    }
}
