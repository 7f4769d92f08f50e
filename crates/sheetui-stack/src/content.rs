#![forbid(unsafe_code)]

//! Content acquisition for sheets opened from a URL.
//!
//! The stack never performs I/O itself. A [`ContentLoader`] turns a URL into
//! an HTML string (the browser binding uses `fetch`); the stack only awaits
//! it. Loaders report non-success responses and transport failures as
//! [`ContentLoadError`]. Nothing is retried here: retrying a failed load is
//! the caller's decision.
//!
//! Loaded HTML is trusted. It is inserted verbatim; sanitizing it is the
//! host's responsibility.

use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;

/// Failure to acquire sheet content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentLoadError {
    /// The server answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The request never produced a response, or its body was unreadable.
    #[error("failed to load {url}: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying cause as reported by the transport.
        message: String,
    },
}

impl ContentLoadError {
    /// Build a status error.
    #[must_use]
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Build a transport error.
    #[must_use]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// URL whose load failed.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } => url,
        }
    }

    /// HTTP status, if the server answered.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

/// Asynchronous source of sheet HTML.
///
/// Implementations must map any non-2xx response to
/// [`ContentLoadError::Status`].
pub trait ContentLoader {
    /// Fetch the HTML at `url`.
    fn load(&self, url: &str) -> impl Future<Output = Result<String, ContentLoadError>>;
}

impl<L: ContentLoader + ?Sized> ContentLoader for &L {
    fn load(&self, url: &str) -> impl Future<Output = Result<String, ContentLoadError>> {
        (**self).load(url)
    }
}

/// Returns `true` for HTTP 2xx.
#[inline]
#[must_use]
pub const fn is_success_status(status: u16) -> bool {
    status >= 200 && status < 300
}

/// Load `url` through `loader`, logging failures.
///
/// This is the only suspension point of opening a sheet from a URL.
pub async fn load_content<L: ContentLoader + ?Sized>(
    loader: &L,
    url: &str,
) -> Result<String, ContentLoadError> {
    tracing::debug!(message = "content.load", url);
    match loader.load(url).await {
        Ok(html) => {
            tracing::debug!(message = "content.loaded", url, bytes = html.len());
            Ok(html)
        }
        Err(err) => {
            tracing::warn!(message = "content.load_failed", url, error = %err);
            Err(err)
        }
    }
}

#[derive(Debug, Clone)]
enum Fragment {
    Html(String),
    Status(u16),
    Unreachable(String),
}

/// Loader backed by a table of pre-rendered fragments.
///
/// Unknown URLs answer `404`. Useful for static pages that ship their sheet
/// bodies inline, and for tests.
#[derive(Debug, Clone, Default)]
pub struct FragmentLoader {
    fragments: HashMap<String, Fragment>,
}

impl FragmentLoader {
    /// Create an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` at `url`.
    #[must_use]
    pub fn with_fragment(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    /// Answer `url` with an HTTP status and no body.
    #[must_use]
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.fragments.insert(url.into(), Fragment::Status(status));
        self
    }

    /// Make `url` fail at the transport level.
    #[must_use]
    pub fn with_unreachable(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.fragments
            .insert(url.into(), Fragment::Unreachable(message.into()));
        self
    }

    /// Serve `html` at `url`, replacing any previous entry.
    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.fragments.insert(url.into(), Fragment::Html(html.into()));
    }

    /// Number of configured URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether no URLs are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn resolve(&self, url: &str) -> Result<String, ContentLoadError> {
        match self.fragments.get(url) {
            Some(Fragment::Html(html)) => Ok(html.clone()),
            Some(Fragment::Status(status)) if is_success_status(*status) => Ok(String::new()),
            Some(Fragment::Status(status)) => Err(ContentLoadError::status(url, *status)),
            Some(Fragment::Unreachable(message)) => {
                Err(ContentLoadError::transport(url, message.clone()))
            }
            None => Err(ContentLoadError::status(url, 404)),
        }
    }
}

impl ContentLoader for FragmentLoader {
    fn load(&self, url: &str) -> impl Future<Output = Result<String, ContentLoadError>> {
        std::future::ready(self.resolve(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn status_error_message_matches_http_wording() {
        let err = ContentLoadError::status("/x", 500);
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert_eq!(err.url(), "/x");
        assert_eq!(err.http_status(), Some(500));
    }

    #[test]
    fn transport_error_keeps_cause() {
        let err = ContentLoadError::transport("/y", "connection refused");
        assert_eq!(err.to_string(), "failed to load /y: connection refused");
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn success_range() {
        assert!(is_success_status(200));
        assert!(is_success_status(204));
        assert!(!is_success_status(199));
        assert!(!is_success_status(302));
        assert!(!is_success_status(500));
    }

    #[test]
    fn fragment_loader_serves_and_fails() {
        let loader = FragmentLoader::new()
            .with_fragment("/simple", "<p>Hi</p>")
            .with_status("/broken", 500)
            .with_status("/empty", 204)
            .with_unreachable("/offline", "dns failure");
        assert_eq!(loader.len(), 4);

        assert_eq!(block_on(loader.load("/simple")).unwrap(), "<p>Hi</p>");
        assert_eq!(block_on(loader.load("/empty")).unwrap(), "");
        assert_eq!(
            block_on(loader.load("/broken")).unwrap_err(),
            ContentLoadError::status("/broken", 500)
        );
        assert_eq!(
            block_on(loader.load("/missing")).unwrap_err().http_status(),
            Some(404)
        );
        assert!(matches!(
            block_on(loader.load("/offline")),
            Err(ContentLoadError::Transport { .. })
        ));
    }

    #[test]
    fn load_content_passes_through() {
        let loader = FragmentLoader::new().with_fragment("/a", "A");
        assert_eq!(block_on(load_content(&loader, "/a")).unwrap(), "A");
        assert!(block_on(load_content(&loader, "/b")).is_err());
    }
}
