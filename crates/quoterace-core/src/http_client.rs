use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// HTTP request envelope used by source fetches.
///
/// Sources are plain cancellation-capable GETs; no body or auth is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: 3_000,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// HTTP response envelope returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Boxed future returned by [`HttpClient::execute`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// Transport contract for source fetches.
///
/// Dropping the returned future must abandon the request; the race
/// coordinator relies on this to cancel losing sources.
pub trait HttpClient: Send + Sync {
    fn execute(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// Production HTTP client using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("quoterace/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
        Box::pin(async move {
            let mut builder = self
                .client
                .get(&request.url)
                .timeout(Duration::from_millis(request.timeout_ms));

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::new(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {e}"))
                } else {
                    HttpError::new(format!("request failed: {e}"))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {e}")))?;

            Ok(HttpResponse { status, body })
        })
    }
}

/// Reply produced by a [`ScriptedHttpClient`] route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Response(HttpResponse),
    TransportError(String),
}

#[derive(Debug, Clone)]
struct ScriptedRoute {
    delay: Duration,
    reply: ScriptedReply,
}

/// Deterministic in-process transport keyed by URL.
///
/// Each route answers after a fixed delay. Requests whose future is dropped
/// before the delay elapses are counted as abandoned.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHttpClient {
    routes: HashMap<String, ScriptedRoute>,
    started: Arc<AtomicUsize>,
    abandoned: Arc<AtomicUsize>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, url: impl Into<String>, delay: Duration, reply: ScriptedReply) -> Self {
        self.routes.insert(url.into(), ScriptedRoute { delay, reply });
        self
    }

    pub fn with_json(self, url: impl Into<String>, delay: Duration, body: impl Into<String>) -> Self {
        self.with_reply(url, delay, ScriptedReply::Response(HttpResponse::ok_json(body)))
    }

    pub fn with_status(self, url: impl Into<String>, delay: Duration, status: u16) -> Self {
        self.with_reply(
            url,
            delay,
            ScriptedReply::Response(HttpResponse::with_status(status)),
        )
    }

    pub fn with_transport_error(
        self,
        url: impl Into<String>,
        delay: Duration,
        message: impl Into<String>,
    ) -> Self {
        self.with_reply(url, delay, ScriptedReply::TransportError(message.into()))
    }

    /// Number of requests issued so far.
    pub fn started_requests(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Number of requests dropped before their reply was produced.
    pub fn abandoned_requests(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }
}

struct AbandonGuard {
    counter: Arc<AtomicUsize>,
    armed: bool,
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if self.armed {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let route = self.routes.get(&request.url).cloned();
        let counter = Arc::clone(&self.abandoned);

        Box::pin(async move {
            let Some(route) = route else {
                return Err(HttpError::new(format!(
                    "connection failed: no scripted route for {}",
                    request.url
                )));
            };

            let mut guard = AbandonGuard {
                counter,
                armed: true,
            };
            tokio::time::sleep(route.delay).await;
            guard.armed = false;

            match route.reply {
                ScriptedReply::Response(response) => Ok(response),
                ScriptedReply::TransportError(message) => Err(HttpError::new(message)),
            }
        })
    }
}
