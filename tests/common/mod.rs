#![allow(dead_code)]

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use cashcard_api::config::AppConfig;

pub const SARAH: (&str, &str) = ("sarah1", "abc123");
pub const KUMAR: (&str, &str) = ("kumar2", "ghi789");
pub const TIM: (&str, &str) = ("tim-owns-no-cards", "def456");

/// A seeded, in-memory server running inside the test's runtime. Each test
/// gets its own so mutations never leak between tests.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str, (user, pass): (&str, &str)) -> reqwest::RequestBuilder {
        reqwest::Client::new().get(self.url(path)).basic_auth(user, Some(pass))
    }

    pub fn post(&self, path: &str, (user, pass): (&str, &str)) -> reqwest::RequestBuilder {
        reqwest::Client::new().post(self.url(path)).basic_auth(user, Some(pass))
    }

    pub fn put(&self, path: &str, (user, pass): (&str, &str)) -> reqwest::RequestBuilder {
        reqwest::Client::new().put(self.url(path)).basic_auth(user, Some(pass))
    }

    pub fn delete(&self, path: &str, (user, pass): (&str, &str)) -> reqwest::RequestBuilder {
        reqwest::Client::new().delete(self.url(path)).basic_auth(user, Some(pass))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let app = cashcard_api::build_app(&AppConfig::development())
        .await
        .context("failed to build app")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind {}", base_url))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server stopped: {}", e);
        }
    });

    Ok(TestServer { port, base_url, handle })
}
