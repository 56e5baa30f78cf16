use async_trait::async_trait;
use reqwest::{Client, Url, cookie::Jar, redirect};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;

/// TransportError
///
/// Every way a GET against the authority can fail. The prober folds all of
/// these into a denial; the variants only feed diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("non-success status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

// 1. Transport Contract
/// Transport
///
/// The single capability the gate needs from the network: perform one GET
/// against the configured authority with session credentials attached.
/// Swapping the implementation (real HTTP client vs. scripted mock) never
/// touches the prober or the guard.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues exactly one request for `path` relative to the base endpoint.
    /// Resolves to the response body on a 2xx status.
    async fn perform_get(&self, path: &str) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn perform_get(&self, path: &str) -> Result<String, TransportError> {
        (**self).perform_get(path).await
    }
}

// 2. The Real Implementation (reqwest)
/// HttpTransport
///
/// reqwest-backed transport. The client owns a cookie jar, so any session
/// cookie the authority sets (or the one seeded from configuration) rides
/// along on every probe.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// new
    ///
    /// Builds the client from the immutable configuration: base endpoint,
    /// request timeout and optional seeded session cookie.
    pub fn new(config: &AppConfig) -> Result<Self, TransportError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", config.api_base_url)))?;

        let jar = Arc::new(Jar::default());
        if let Some(cookie) = &config.session_cookie {
            jar.add_cookie_str(cookie, &base_url);
        }

        // Redirects are not followed: a 3xx from the check path is its answer,
        // and it is not a success.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .cookie_provider(jar)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    // Appends rather than `Url::join`, which would drop a path prefix on the base.
    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| TransportError::InvalidUrl(format!("{path}: {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform_get(&self, path: &str) -> Result<String, TransportError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "probing authority");

        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response.text().await.map_err(classify)
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}

// 3. The Mock Implementation (For Tests)
/// MockTransport
///
/// Scripted transport for tests. Queued responses are served in order; once
/// the queue is empty every call gets the fallback. Counts calls and records
/// requested paths so tests can assert on network activity.
pub struct MockTransport {
    script: Mutex<VecDeque<Result<String, TransportError>>>,
    fallback: Result<String, TransportError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    paths: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Every call succeeds with an empty body.
    pub fn new() -> Self {
        Self::with_fallback(Ok(String::new()))
    }

    /// Every call fails with `error`.
    pub fn new_failing(error: TransportError) -> Self {
        Self::with_fallback(Err(error))
    }

    pub fn with_fallback(fallback: Result<String, TransportError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            delay: None,
            calls: AtomicUsize::new(0),
            paths: Mutex::new(Vec::new()),
        }
    }

    /// Queue one response ahead of the fallback.
    pub fn push(self, response: Result<String, TransportError>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(response);
        }
        self
    }

    /// Sleep before answering, simulating a slow authority.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.paths.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn perform_get(&self, path: &str) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.to_string());
        }

        // Take the scripted answer before suspending so concurrent callers
        // receive responses in call order.
        let response = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| self.fallback.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        response
    }
}
