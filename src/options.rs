//! Per-call options and cancellation.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Cancellation signal for a single call.
///
/// Clones share state, so one handle can be given to the call and another
/// kept to cancel it from elsewhere. An optional deadline makes the token
/// cancel itself once it passes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Create a token that is only cancelled explicitly
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token that cancels itself after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Create a token that cancels itself at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        CancelToken {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Cancel the call this token (or any clone of it) was given to
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once `cancel` was called or the deadline has passed
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the token is cancelled or its deadline passes
    pub(crate) async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {},
                    _ = tokio::time::sleep_until(deadline.into()) => {},
                }
            }
            None => self.token.cancelled().await,
        }
    }
}

/// Options scoped to exactly one call. Never stored on the client.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Replaces the client's default API key for this call
    pub api_key: Option<String>,
    /// Replaces same-named headers
    pub headers: HeaderMap,
    /// Headers to drop entirely
    pub remove_headers: Vec<HeaderName>,
    /// Aborts the call when fired, before dispatch or while waiting on the
    /// reply
    pub cancel: Option<CancelToken>,
}

impl CallOptions {
    /// Options that change nothing: client key, client headers, no cancellation
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different API key for this call
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override a header. Calling it twice for the same name sends both values.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Suppress a header the client would otherwise send
    pub fn without_header(mut self, name: HeaderName) -> Self {
        self.remove_headers.push(name);
        self
    }

    /// Make the call abort when `cancel` fires
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_shared_between_clones() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());

        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_deadline_expires() {
        let token = CancelToken::with_deadline(Instant::now());
        assert!(token.is_cancelled());

        let token = CancelToken::with_timeout(Duration::from_secs(60));
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_on_cancel() {
        let token = CancelToken::new();
        let handle = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });
        tokio::time::timeout(Duration::from_secs(5), token.cancelled())
            .await
            .expect("token never fired");
    }

    #[tokio::test]
    async fn test_cancelled_wakes_at_deadline() {
        let token = CancelToken::with_timeout(Duration::from_millis(20));
        tokio::time::timeout(Duration::from_secs(5), token.cancelled())
            .await
            .expect("deadline never fired");
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_options_cancel_state() {
        assert!(!CallOptions::new().is_cancelled());

        let token = CancelToken::new();
        let opts = CallOptions::new().with_cancel(token.clone());
        assert!(!opts.is_cancelled());
        token.cancel();
        assert!(opts.is_cancelled());
    }
}
