//! Request state container: uniform lifecycle around async reads and writes.
//!
//! A [`Query`] wraps a read against the backend: it retries with backoff,
//! supersedes any in-flight attempt when re-run (last request wins), and
//! cancels its task when dropped so nothing updates state after a screen
//! is torn down. A [`Mutation`] wraps a write: exactly one attempt, and
//! its completion can be observed at most once.

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{ApiError, ErrorInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Observable state of one logical request
#[derive(Debug)]
pub struct RequestState<T> {
    pub status: RequestStatus,
    pub data: Option<T>,
    pub error: Option<ErrorInfo>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            status: RequestStatus::Idle,
            data: None,
            error: None,
        }
    }
}

/// Options for one query run
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// Additional attempts after the first failure
    pub retries: u32,
    /// Delay before the second attempt, doubled per further attempt
    pub backoff_base: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff_base: Duration::from_millis(200),
        }
    }
}

/// Async read with retry, supersession, and cancellation
pub struct Query<T> {
    state: RequestState<T>,
    // Replacing the receiver on re-run is what discards stale results:
    // a superseded task's send lands in a dropped channel.
    rx: Option<oneshot::Receiver<Result<T, ErrorInfo>>>,
    cancel: CancellationToken,
    label: &'static str,
}

impl<T: Send + 'static> Query<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            state: RequestState::default(),
            rx: None,
            cancel: CancellationToken::new(),
            label,
        }
    }

    /// Start (or restart) the query. Any in-flight attempt is cancelled and
    /// its result will never be applied.
    pub fn run<F, Fut>(&mut self, options: QueryOptions, make_request: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();

        self.state.status = RequestStatus::Loading;
        self.state.error = None;

        let (tx, rx) = oneshot::channel();
        self.rx = Some(rx);

        let token = self.cancel.clone();
        let label = self.label;
        tokio::spawn(async move {
            let mut attempt: u32 = 0;
            let outcome = loop {
                let request = make_request();
                let result = tokio::select! {
                    _ = token.cancelled() => return,
                    result = request => result,
                };

                match result {
                    Ok(data) => break Ok(data),
                    Err(err) => {
                        let info = ErrorInfo::from(&err);
                        if attempt >= options.retries || !info.retryable {
                            break Err(info);
                        }
                        let delay = options.backoff_base * 2u32.saturating_pow(attempt);
                        debug!(
                            "query '{}' attempt {} failed ({}), retrying in {:?}",
                            label, attempt + 1, info.message, delay
                        );
                        attempt += 1;
                        tokio::select! {
                            _ = token.cancelled() => return,
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                }
            };
            // Receiver may already be superseded or dropped; that result
            // must be discarded, so the failed send is intentional.
            let _ = tx.send(outcome);
        });
    }

    /// Apply a settled result, if one arrived. Called once per UI tick.
    pub fn poll(&mut self) {
        let Some(rx) = self.rx.as_mut() else { return };
        match rx.try_recv() {
            Ok(Ok(data)) => {
                self.rx = None;
                self.state.status = RequestStatus::Success;
                self.state.data = Some(data);
                self.state.error = None;
            }
            Ok(Err(info)) => {
                self.rx = None;
                self.state.status = RequestStatus::Error;
                self.state.error = Some(info);
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                // Task cancelled between runs; state stays as-is.
                self.rx = None;
            }
        }
    }

    pub fn status(&self) -> RequestStatus {
        self.state.status
    }

    pub fn is_loading(&self) -> bool {
        self.state.status == RequestStatus::Loading
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.state.error.as_ref()
    }
}

impl<T> Drop for Query<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Async write: exactly one attempt, completion observable at most once
pub struct Mutation<T> {
    in_flight: bool,
    rx: Option<oneshot::Receiver<Result<T, ErrorInfo>>>,
    cancel: CancellationToken,
    label: &'static str,
}

impl<T: Send + 'static> Mutation<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            in_flight: false,
            rx: None,
            cancel: CancellationToken::new(),
            label,
        }
    }

    /// Start the write. Returns false (and does nothing) while a previous
    /// write is still in flight, so writes are never silently duplicated.
    pub fn start<Fut>(&mut self, request: Fut) -> bool
    where
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        if self.in_flight {
            debug!("mutation '{}' already in flight, ignoring start", self.label);
            return false;
        }

        self.in_flight = true;
        let (tx, rx) = oneshot::channel();
        self.rx = Some(rx);

        let token = self.cancel.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = request => result,
            };
            let _ = tx.send(result.map_err(|e| ErrorInfo::from(&e)));
        });
        true
    }

    /// Take the settled result. Yields `Some` exactly once per started
    /// write, and only after the server responded.
    pub fn take_result(&mut self) -> Option<Result<T, ErrorInfo>> {
        let rx = self.rx.as_mut()?;
        match rx.try_recv() {
            Ok(result) => {
                self.rx = None;
                self.in_flight = false;
                Some(result)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.rx = None;
                self.in_flight = false;
                None
            }
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

impl<T> Drop for Mutation<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn settle<T: Send + 'static>(query: &mut Query<T>) {
        for _ in 0..200 {
            query.poll();
            if !query.is_loading() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("query did not settle");
    }

    fn no_retry() -> QueryOptions {
        QueryOptions {
            retries: 0,
            backoff_base: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_query_success() {
        let mut query: Query<u32> = Query::new("test");
        query.run(no_retry(), || async { Ok(7) });
        assert!(query.is_loading());
        settle(&mut query).await;
        assert_eq!(query.status(), RequestStatus::Success);
        assert_eq!(query.data(), Some(&7));
        assert!(query.error().is_none());
    }

    #[tokio::test]
    async fn test_query_error_message_is_preserved() {
        let mut query: Query<u32> = Query::new("test");
        query.run(no_retry(), || async {
            Err(ApiError::Status {
                status: 404,
                message: "booking not found".to_string(),
            })
        });
        settle(&mut query).await;
        assert_eq!(query.status(), RequestStatus::Error);
        let error = query.error().unwrap();
        assert!(error.message.contains("booking not found"));
    }

    #[tokio::test]
    async fn test_query_retries_then_succeeds() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let mut query: Query<u32> = Query::new("test");
        query.run(
            QueryOptions {
                retries: 2,
                backoff_base: Duration::from_millis(1),
            },
            move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(ApiError::Status {
                            status: 503,
                            message: "unavailable".to_string(),
                        })
                    } else {
                        Ok(42)
                    }
                }
            },
        );
        settle(&mut query).await;
        assert_eq!(query.status(), RequestStatus::Success);
        assert_eq!(query.data(), Some(&42));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_query_does_not_retry_client_errors() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let mut query: Query<u32> = Query::new("test");
        query.run(
            QueryOptions {
                retries: 5,
                backoff_base: Duration::from_millis(1),
            },
            move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(ApiError::Status {
                        status: 400,
                        message: "bad request".to_string(),
                    })
                }
            },
        );
        settle(&mut query).await;
        assert_eq!(query.status(), RequestStatus::Error);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_run_supersedes_first() {
        let mut query: Query<&'static str> = Query::new("test");
        // Slow first request; even after its delay passes, its result must
        // never be applied.
        query.run(no_retry(), || async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok("first")
        });
        query.run(no_retry(), || async { Ok("second") });
        settle(&mut query).await;
        assert_eq!(query.data(), Some(&"second"));

        tokio::time::sleep(Duration::from_millis(60)).await;
        query.poll();
        assert_eq!(query.data(), Some(&"second"));
        assert_eq!(query.status(), RequestStatus::Success);
    }

    #[tokio::test]
    async fn test_manual_retry_reenters_loading() {
        let mut query: Query<u32> = Query::new("test");
        query.run(no_retry(), || async {
            Err(ApiError::Status {
                status: 500,
                message: "boom".to_string(),
            })
        });
        settle(&mut query).await;
        assert_eq!(query.status(), RequestStatus::Error);

        query.run(no_retry(), || async { Ok(1) });
        assert_eq!(query.status(), RequestStatus::Loading);
        assert!(query.error().is_none());
        settle(&mut query).await;
        assert_eq!(query.data(), Some(&1));
    }

    #[tokio::test]
    async fn test_mutation_result_taken_once() {
        let mut mutation: Mutation<u32> = Mutation::new("test");
        assert!(mutation.start(async { Ok(9) }));
        let mut taken = None;
        for _ in 0..200 {
            if let Some(result) = mutation.take_result() {
                taken = Some(result);
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(taken.unwrap().unwrap(), 9);
        assert!(mutation.take_result().is_none());
        assert!(!mutation.is_in_flight());
    }

    #[tokio::test]
    async fn test_mutation_rejects_overlapping_start() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let mut mutation: Mutation<u32> = Mutation::new("test");

        let counter = attempts.clone();
        assert!(mutation.start(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok(1)
        }));
        let counter = attempts.clone();
        assert!(!mutation.start(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(2)
        }));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(mutation.take_result().unwrap().unwrap(), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
