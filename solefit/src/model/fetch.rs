//! Asset transport abstraction.
//!
//! The cache reaches the network only through the [`AssetFetcher`] trait,
//! which allows dependency injection and mock transports in tests. The
//! production implementation is a thin async reqwest wrapper with a fixed
//! request timeout - a stuck fetch resolves to an error (and so to the
//! fallback geometry) instead of stalling its cache entry forever.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of the lightweight existence probe that precedes a full fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetProbe {
    /// Whether the asset exists on the host.
    pub exists: bool,
    /// Advertised size in bytes, when the host reports one.
    pub size: Option<u64>,
}

/// Errors from the transport layer.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Failed to construct the HTTP client.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// Request failed below the HTTP layer (DNS, TLS, timeout).
    #[error("request failed for {url}: {reason}")]
    Transport { url: String, reason: String },

    /// The host answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

/// Transport operations the model loader needs.
///
/// # Dyn Compatibility
///
/// Uses [`BoxFuture`] so the cache can hold an `Arc<dyn AssetFetcher>` and
/// tests can inject mocks.
pub trait AssetFetcher: Send + Sync {
    /// Probe an asset's existence and size without downloading it.
    ///
    /// A missing asset is a successful probe with `exists == false`; only
    /// transport problems are errors.
    fn probe<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<AssetProbe, FetchError>>;

    /// Download the asset body.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Bytes, FetchError>>;
}

/// Default fetch timeout, covering connect through body completion.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Production fetcher backed by an async reqwest client.
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    /// Create a fetcher with the default 30 second timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;
        Ok(Self { client })
    }
}

impl AssetFetcher for HttpAssetFetcher {
    fn probe<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<AssetProbe, FetchError>> {
        Box::pin(async move {
            let response = self.client.head(url).send().await.map_err(|e| {
                FetchError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            })?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Ok(AssetProbe {
                    exists: false,
                    size: None,
                });
            }
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let size = response
                .headers()
                .get(reqwest::header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());

            Ok(AssetProbe { exists: true, size })
        })
    }

    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Bytes, FetchError>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await.map_err(|e| {
                FetchError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            response.bytes().await.map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status {
            status: 503,
            url: "http://host/models/1.glb".into(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("models/1.glb"));
    }

    #[test]
    fn test_client_builds_with_custom_timeout() {
        assert!(HttpAssetFetcher::with_timeout(Duration::from_secs(5)).is_ok());
    }
}
