//! Test application factory for integration tests.

use axum::{body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use blockswatch::assets::AssetLoader;
use blockswatch::models::AppConfig;
use blockswatch::server::{build_router, create_app_state, AppState};
use blockswatch::services::RenderContext;

use super::fixtures::Fixture;

/// Test application with router and direct access to shared state
pub struct TestApp {
    router: axum::Router,
    pub context: Arc<RenderContext>,
    /// Keeps the catalog and textures on disk for the app's lifetime
    pub fixture: Fixture,
}

impl TestApp {
    /// Create a new test application over the standard fixture
    pub fn new() -> Self {
        Self::from_fixture(Fixture::new())
    }

    /// Create a test application over a prepared fixture
    pub fn from_fixture(fixture: Fixture) -> Self {
        let config = fixture.config();
        Self::with_config(fixture, config)
    }

    /// Create a test application with a custom config
    pub fn with_config(fixture: Fixture, config: AppConfig) -> Self {
        let state = Self::create_state(&config);
        let context = state.context.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self {
            router,
            context,
            fixture,
        }
    }

    /// Create application state for custom router configuration
    pub fn create_state(config: &AppConfig) -> AppState {
        let asset_loader = AssetLoader::new(None, None);
        create_app_state(config, &asset_loader).expect("Failed to create app state")
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get a header as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a JPEG image
    pub fn is_jpeg(&self) -> bool {
        self.body.len() >= 3 && self.body[..3] == [0xFF, 0xD8, 0xFF]
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Decode the body as an RGB image
    pub fn image(&self) -> image::RgbImage {
        image::load_from_memory(&self.body)
            .expect("Failed to decode image")
            .to_rgb8()
    }
}
