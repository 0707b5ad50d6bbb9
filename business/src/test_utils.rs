//! Test doubles for the business layer.
//!
//! [`MockFetcher`] stands in for the HTTP client. It records every requested
//! URL, hands out scripted replies in order, and counts requests that were
//! dropped before they settled (an aborted connection, from the loader's point
//! of view).
//!
//! # Example
//!
//! ```ignore
//! use people_business::test_utils::MockFetcher;
//!
//! let fetcher = MockFetcher::json(200, serde_json::json!([]));
//! let loader = UserTableLoader::new(config, Arc::new(fetcher.clone()), surface);
//! loader.load().await;
//! assert_eq!(fetcher.requests().len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;

use crate::fetch_service::{FetchFuture, FetchService};
use crate::http::{HttpError, HttpErrorKind, HttpResult, Response};

/// A scripted reply for one request.
#[derive(Debug)]
pub enum MockReply {
    /// Settles on first poll.
    Ready(HttpResult<Response>),
    /// Never settles.
    Never,
    /// Settles when the paired sender fires.
    Deferred(oneshot::Receiver<HttpResult<Response>>),
}

#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<String>>>,
    aborted: Arc<AtomicUsize>,
}

impl MockFetcher {
    /// A fetcher with no scripted replies; requests fail until one is pushed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.push_reply(reply);
        self
    }

    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self::body(status, value.to_string())
    }

    pub fn body(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new().with_reply(MockReply::Ready(Ok(Response::new(status, body))))
    }

    pub fn failing(err: HttpError) -> Self {
        Self::new().with_reply(MockReply::Ready(Err(err)))
    }

    pub fn never() -> Self {
        Self::new().with_reply(MockReply::Never)
    }

    pub fn push_reply(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Queues a reply that settles when the returned sender is used.
    pub fn push_deferred(&self) -> oneshot::Sender<HttpResult<Response>> {
        let (tx, rx) = oneshot::channel();
        self.push_reply(MockReply::Deferred(rx));
        tx
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many requests were dropped before settling.
    pub fn aborted(&self) -> usize {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// Counts a request as aborted unless it is disarmed on completion.
struct AbortGuard {
    counter: Arc<AtomicUsize>,
    armed: bool,
}

impl AbortGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for AbortGuard {
    fn drop(&mut self) {
        if self.armed {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl FetchService for MockFetcher {
    fn get(&self, url: &str) -> FetchFuture {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_owned());

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                MockReply::Ready(Err(HttpError::new(
                    HttpErrorKind::Other,
                    "MockFetcher: no response set",
                )))
            });

        let guard = AbortGuard {
            counter: Arc::clone(&self.aborted),
            armed: true,
        };

        Box::pin(async move {
            let mut guard = guard;
            let result = match reply {
                MockReply::Ready(result) => result,
                MockReply::Never => std::future::pending().await,
                MockReply::Deferred(rx) => rx.await.unwrap_or_else(|_| {
                    Err(HttpError::new(
                        HttpErrorKind::Other,
                        "MockFetcher: deferred reply dropped",
                    ))
                }),
            };
            guard.disarm();
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settled_request_is_not_aborted() {
        let fetcher = MockFetcher::body(200, "[]");
        let request = fetcher.get("http://users.test");
        assert_eq!(fetcher.aborted(), 0, "pending request counted as aborted");

        let response = request.await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(fetcher.aborted(), 0);
    }

    #[tokio::test]
    async fn test_dropped_request_is_aborted() {
        let fetcher = MockFetcher::never();
        let request = fetcher.get("http://users.test");
        assert_eq!(fetcher.aborted(), 0);
        drop(request);
        assert_eq!(fetcher.aborted(), 1);
    }

    #[tokio::test]
    async fn test_missing_reply_is_an_error() {
        let fetcher = MockFetcher::new();
        let err = fetcher.get("http://users.test").await.unwrap_err();
        assert_eq!(err.kind, HttpErrorKind::Other);
        assert_eq!(fetcher.requests(), vec!["http://users.test".to_owned()]);
    }
}
