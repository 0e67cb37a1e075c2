//! HTTP transport seam for geocoding lookups.
//!
//! The resolver only needs a single GET with query parameters and one header,
//! so the trait is kept that narrow. [`UreqTransport`] is the production
//! implementation; tests swap in a fake.

use std::future::Future;
use std::pin::Pin;

/// A single outbound geocoding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub user_agent: String,
}

impl GeocodeRequest {
    /// Value of the first query parameter named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a completed HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The exchange never produced a response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),

    #[error("request task failed: {0}")]
    Task(String),
}

pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + 'a>>;

/// Performs a geocoding GET and returns the response, whatever its status.
pub trait Transport: Send + Sync {
    fn get<'a>(&'a self, request: &'a GeocodeRequest) -> TransportFuture<'a>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get<'a>(&'a self, request: &'a GeocodeRequest) -> TransportFuture<'a> {
        (**self).get(request)
    }
}

// ─── ureq ───────────────────────────────────────────────────────

/// Blocking `ureq` client driven from Tokio's blocking pool.
///
/// A fresh agent is built for every request and dropped when the request
/// finishes, so no connection outlives a single lookup. Must be awaited
/// inside a Tokio runtime; elsewhere every call fails with
/// [`TransportError::Task`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub const fn new() -> Self {
        Self
    }
}

impl Transport for UreqTransport {
    fn get<'a>(&'a self, request: &'a GeocodeRequest) -> TransportFuture<'a> {
        let request = request.clone();
        Box::pin(async move {
            // spawn_blocking panics without a runtime; report it like any other failure.
            let handle = match tokio::runtime::Handle::try_current() {
                Ok(handle) => handle,
                Err(e) => return Err(TransportError::Task(e.to_string())),
            };
            match handle.spawn_blocking(move || blocking_get(&request)).await {
                Ok(result) => result,
                Err(e) => Err(TransportError::Task(e.to_string())),
            }
        })
    }
}

fn blocking_get(request: &GeocodeRequest) -> Result<TransportResponse, TransportError> {
    let agent = ureq::AgentBuilder::new().build();

    let mut call = agent
        .get(&request.url)
        .set("User-Agent", &request.user_agent);
    for (key, value) in &request.query {
        call = call.query(key, value);
    }

    let response = match call.call() {
        Ok(response) => response,
        // ureq reports 4xx/5xx as errors but still hands back the response.
        Err(ureq::Error::Status(_, response)) => response,
        Err(ureq::Error::Transport(e)) => return Err(TransportError::Network(e.to_string())),
    };

    let status = response.status();
    let body = response.into_string()?;
    Ok(TransportResponse { status, body })
}

// ─── Test double ────────────────────────────────────────────────
