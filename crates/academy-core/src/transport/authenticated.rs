//! Transport that refreshes a rejected credential once and retries.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::traits::Transport;
use crate::wire::{self, ApiRequest, ApiResponse};

use super::single_flight::SingleFlight;

/// Outcome of a credential refresh, shared by every caller that waited on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The service issued a new ambient credential.
    Refreshed,
    /// The service refused, or never answered.
    Rejected,
}

/// Wraps a [`Transport`] and recovers from credential expiry.
///
/// A 401 triggers at most one refresh call no matter how many requests
/// were rejected at once: every rejected caller awaits the same refresh.
/// On success each caller re-issues its request exactly once and returns
/// whatever that retry produced. On failure each caller gets its original
/// 401 back. Every other status passes through untouched.
///
/// The transport never touches session state; interpreting a final 401 is
/// up to the caller.
pub struct AuthenticatedTransport<T> {
    inner: Arc<T>,
    refresh: Arc<SingleFlight<RefreshOutcome>>,
    refresh_request: ApiRequest,
}

impl<T: Transport> AuthenticatedTransport<T> {
    /// Wrap `inner`, refreshing through the standard refresh endpoint.
    pub fn new(inner: Arc<T>) -> Self {
        Self::with_refresh_request(inner, ApiRequest::post(wire::REFRESH))
    }

    /// Wrap `inner`, refreshing with a custom request.
    pub fn with_refresh_request(inner: Arc<T>, refresh_request: ApiRequest) -> Self {
        Self {
            inner,
            refresh: Arc::new(SingleFlight::new()),
            refresh_request,
        }
    }

    /// Send `request`, refreshing the credential and retrying once on 401.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response arrived for the original
    /// request or for its retry.
    #[instrument(skip(self), fields(method = %request.method(), path = %request.path()))]
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let response = self.inner.execute(request).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        debug!("credential rejected");
        match self.refresh().await {
            RefreshOutcome::Refreshed => {
                debug!("retrying after refresh");
                self.inner.execute(request).await
            }
            RefreshOutcome::Rejected => Ok(response),
        }
    }

    /// Refresh the ambient credential, joining a refresh already in flight.
    ///
    /// Fails closed: a transport error counts as a rejected refresh.
    pub async fn refresh(&self) -> RefreshOutcome {
        let inner = Arc::clone(&self.inner);
        let request = self.refresh_request.clone();

        self.refresh
            .run(move || async move {
                info!("Refreshing credential");
                match inner.execute(&request).await {
                    Ok(response) if response.is_success() => {
                        debug!("Credential refreshed successfully");
                        RefreshOutcome::Refreshed
                    }
                    Ok(response) => {
                        warn!(status = response.status(), "Credential refresh rejected");
                        RefreshOutcome::Rejected
                    }
                    Err(e) => {
                        warn!(error = %e, "Credential refresh failed");
                        RefreshOutcome::Rejected
                    }
                }
            })
            .await
    }

    /// Number of refresh calls issued so far.
    pub async fn refreshes_started(&self) -> u64 {
        self.refresh.started().await
    }
}

impl<T> Clone for AuthenticatedTransport<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            refresh: Arc::clone(&self.refresh),
            refresh_request: self.refresh_request.clone(),
        }
    }
}

impl<T> std::fmt::Debug for AuthenticatedTransport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedTransport")
            .field("refresh", &self.refresh)
            .field("refresh_request", &self.refresh_request)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, TransportError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::watch;

    /// Scripted service: `/auth/me` answers 401 until a refresh succeeds.
    struct ScriptedService {
        refresh_status: Option<u16>,
        retry_status: u16,
        refreshed: AtomicBool,
        refresh_calls: AtomicUsize,
        rejected_calls: AtomicUsize,
        log: Mutex<Vec<&'static str>>,
        gate: watch::Receiver<bool>,
    }

    impl ScriptedService {
        fn new(refresh_status: Option<u16>, gate: watch::Receiver<bool>) -> Self {
            Self {
                refresh_status,
                retry_status: 200,
                refreshed: AtomicBool::new(false),
                refresh_calls: AtomicUsize::new(0),
                rejected_calls: AtomicUsize::new(0),
                log: Mutex::new(Vec::new()),
                gate,
            }
        }

        fn log(&self) -> Vec<&'static str> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedService {
        async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
            match request.path() {
                wire::REFRESH => {
                    self.refresh_calls.fetch_add(1, Ordering::SeqCst);
                    self.log.lock().unwrap().push("refresh");
                    let mut gate = self.gate.clone();
                    let _ = gate.wait_for(|open| *open).await;
                    self.log.lock().unwrap().push("refresh-done");
                    match self.refresh_status {
                        Some(status) => {
                            if (200..300).contains(&status) {
                                self.refreshed.store(true, Ordering::SeqCst);
                            }
                            Ok(ApiResponse::new(status, "{}"))
                        }
                        None => Err(Error::from(TransportError::Connection {
                            message: "connection refused".into(),
                        })),
                    }
                }
                wire::WHO_AM_I if self.refreshed.load(Ordering::SeqCst) => {
                    self.log.lock().unwrap().push("retry");
                    Ok(ApiResponse::new(self.retry_status, "{\"retried\":true}"))
                }
                wire::WHO_AM_I => {
                    self.rejected_calls.fetch_add(1, Ordering::SeqCst);
                    self.log.lock().unwrap().push("401");
                    Ok(ApiResponse::new(401, "{\"message\":\"expired\"}"))
                }
                _ => Ok(ApiResponse::new(404, "")),
            }
        }
    }

    fn open_gate() -> watch::Receiver<bool> {
        watch::channel(true).1
    }

    #[tokio::test]
    async fn concurrent_rejections_share_one_refresh() {
        const CALLERS: usize = 6;
        let (open, gate) = watch::channel(false);
        let service = Arc::new(ScriptedService::new(Some(200), gate));
        let transport = AuthenticatedTransport::new(Arc::clone(&service));

        let mut handles = Vec::new();
        for _ in 0..CALLERS {
            let transport = transport.clone();
            handles.push(tokio::spawn(async move {
                transport.send(&ApiRequest::get(wire::WHO_AM_I)).await
            }));
        }

        while service.rejected_calls.load(Ordering::SeqCst) < CALLERS {
            tokio::task::yield_now().await;
        }
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
        assert_eq!(service.refresh_calls.load(Ordering::SeqCst), 1);
        open.send_replace(true);

        for handle in handles {
            let response = handle.await.unwrap().unwrap();
            assert_eq!(response.status(), 200);
        }

        assert_eq!(service.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.refreshes_started().await, 1);

        // Every retry happened after the single refresh settled.
        let log = service.log();
        let settled = log.iter().position(|e| *e == "refresh-done").unwrap();
        let retries: Vec<_> = log
            .iter()
            .enumerate()
            .filter(|(_, e)| **e == "retry")
            .map(|(i, _)| i)
            .collect();
        assert_eq!(retries.len(), CALLERS);
        assert!(retries.iter().all(|i| *i > settled));
    }

    #[tokio::test]
    async fn retry_result_is_returned_even_when_it_fails() {
        let mut service = ScriptedService::new(Some(200), open_gate());
        service.retry_status = 500;
        let service = Arc::new(service);
        let transport = AuthenticatedTransport::new(Arc::clone(&service));

        let response = transport.send(&ApiRequest::get(wire::WHO_AM_I)).await.unwrap();
        assert_eq!(response.status(), 500);
        assert_eq!(service.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.log(), ["401", "refresh", "refresh-done", "retry"]);
    }

    #[tokio::test]
    async fn rejected_refresh_returns_original_401() {
        let service = Arc::new(ScriptedService::new(Some(401), open_gate()));
        let transport = AuthenticatedTransport::new(Arc::clone(&service));

        let response = transport.send(&ApiRequest::get(wire::WHO_AM_I)).await.unwrap();
        assert_eq!(response.status(), 401);
        assert_eq!(response.body(), b"{\"message\":\"expired\"}");
        assert_eq!(service.refresh_calls.load(Ordering::SeqCst), 1);
        assert!(!service.log().contains(&"retry"));

        // A later, unrelated 401 is a new trigger and gets its own refresh.
        let response = transport.send(&ApiRequest::get(wire::WHO_AM_I)).await.unwrap();
        assert_eq!(response.status(), 401);
        assert_eq!(service.refresh_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unreachable_refresh_fails_closed() {
        let service = Arc::new(ScriptedService::new(None, open_gate()));
        let transport = AuthenticatedTransport::new(Arc::clone(&service));

        assert_eq!(transport.refresh().await, RefreshOutcome::Rejected);
        let response = transport.send(&ApiRequest::get(wire::WHO_AM_I)).await.unwrap();
        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn other_statuses_pass_through_without_refresh() {
        let service = Arc::new(ScriptedService::new(Some(200), open_gate()));
        let transport = AuthenticatedTransport::new(Arc::clone(&service));

        let response = transport.send(&ApiRequest::get("/subjects")).await.unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(service.refresh_calls.load(Ordering::SeqCst), 0);
    }
}
