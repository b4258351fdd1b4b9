//! In-process test client.
//!
//! Drives an [`App`] without any transport: requests go straight to
//! [`App::handle`] and the finished [`Response`] comes back wrapped in a
//! [`TestResponse`].
//!
//! ```
//! use gweb_core::testing::TestClient;
//! use gweb_core::{handlers, App, Context};
//!
//! let app = App::builder()
//!     .get("/ping", handlers![|c: &mut Context| c.string(200_u16, "pong")])
//!     .build()
//!     .unwrap();
//!
//! let client = TestClient::new(app);
//! let resp = client.get("/ping").send();
//! assert_eq!(resp.status_code(), 200);
//! assert_eq!(resp.text(), "pong");
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::app::App;
use crate::method;
use crate::request::Request;
use crate::response::{Response, StatusCode};

/// Sends requests to an [`App`] in-process.
#[derive(Debug, Clone)]
pub struct TestClient {
    app: Arc<App>,
}

impl TestClient {
    /// Wrap an app. Accepts an `App` or an `Arc<App>`.
    pub fn new(app: impl Into<Arc<App>>) -> Self {
        Self { app: app.into() }
    }

    /// The app under test.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Start a request; `target` may carry a query string.
    #[must_use]
    pub fn request(&self, method: &str, target: &str) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            request: Request::new(method, target),
        }
    }

    /// Start a `GET` request.
    #[must_use]
    pub fn get(&self, target: &str) -> RequestBuilder<'_> {
        self.request(method::GET, target)
    }

    /// Start a `POST` request.
    #[must_use]
    pub fn post(&self, target: &str) -> RequestBuilder<'_> {
        self.request(method::POST, target)
    }

    /// Start a `PUT` request.
    #[must_use]
    pub fn put(&self, target: &str) -> RequestBuilder<'_> {
        self.request(method::PUT, target)
    }

    /// Start a `DELETE` request.
    #[must_use]
    pub fn delete(&self, target: &str) -> RequestBuilder<'_> {
        self.request(method::DELETE, target)
    }

    /// Start a `PATCH` request.
    #[must_use]
    pub fn patch(&self, target: &str) -> RequestBuilder<'_> {
        self.request(method::PATCH, target)
    }

    /// Start a `HEAD` request.
    #[must_use]
    pub fn head(&self, target: &str) -> RequestBuilder<'_> {
        self.request(method::HEAD, target)
    }

    /// Start an `OPTIONS` request.
    #[must_use]
    pub fn options(&self, target: &str) -> RequestBuilder<'_> {
        self.request(method::OPTIONS, target)
    }
}

/// A request being assembled by a [`TestClient`].
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    client: &'a TestClient,
    request: Request,
}

impl RequestBuilder<'_> {
    /// Add a request header.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request.headers_mut().append(name, value);
        self
    }

    /// Set the raw request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.request.set_body(body);
        self
    }

    /// Send an already-encoded `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn form(self, encoded: &str) -> Self {
        self.header("Content-Type", "application/x-www-form-urlencoded")
            .body(encoded)
    }

    /// Dispatch the request.
    pub fn send(self) -> TestResponse {
        TestResponse {
            inner: self.client.app.handle(self.request),
        }
    }
}

/// A response returned by [`RequestBuilder::send`].
#[derive(Debug, Clone)]
pub struct TestResponse {
    inner: Response,
}

impl TestResponse {
    /// Response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Response status as a number.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// First value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)
    }

    /// Body decoded as UTF-8, lossily.
    #[must_use]
    pub fn text(&self) -> String {
        self.inner.text()
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.inner.body()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(self.inner.body())
    }

    /// The underlying response.
    #[must_use]
    pub fn into_inner(self) -> Response {
        self.inner
    }
}
