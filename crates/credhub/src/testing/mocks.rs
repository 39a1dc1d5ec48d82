use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use http::header::AUTHORIZATION;
use parking_lot::Mutex;

use crate::auth::{AuthError, Authenticator, bearer_header};
use crate::core::SecureString;
use crate::transport::{ApiRequest, ApiResponse, HttpClient, TransportError};

enum Outcome {
    Respond(ApiResponse),
    Unreachable,
}

/// Recording HTTP client with queued responses
///
/// Responses are served in the order they were queued. Once the queue is empty
/// every request gets `200` with an empty body.
pub struct MockHttpClient {
    outcomes: Mutex<VecDeque<Outcome>>,
    requests: Mutex<Vec<ApiRequest>>,
    send_count: AtomicU32,
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHttpClient {
    /// Create new mock client
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            send_count: AtomicU32::new(0),
        }
    }

    /// Queue a response
    pub fn respond_with(&self, status: StatusCode, body: impl Into<Bytes>) -> &Self {
        self.outcomes
            .lock()
            .push_back(Outcome::Respond(ApiResponse::new(status, body)));
        self
    }

    /// Queue a `200` with a JSON body
    pub fn respond_ok(&self, body: impl Into<Bytes>) -> &Self {
        self.respond_with(StatusCode::OK, body)
    }

    /// Make the next send fail as if the server were unreachable
    pub fn fail_next_send(&self) -> &Self {
        self.outcomes.lock().push_back(Outcome::Unreachable);
        self
    }

    /// Every request sent so far, as the server would have seen it
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// Most recent request
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().last().cloned()
    }

    /// Body of the most recent request, parsed as JSON
    pub fn last_body_json(&self) -> Option<serde_json::Value> {
        self.last_request()
            .and_then(|r| r.body)
            .and_then(|b| serde_json::from_slice(&b).ok())
    }

    /// Get number of send operations
    pub fn send_count(&self) -> u32 {
        self.send_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);
        let url = format!("mock://credhub{}", request.path);
        self.requests.lock().push(request);

        match self.outcomes.lock().pop_front() {
            Some(Outcome::Respond(response)) => Ok(response),
            Some(Outcome::Unreachable) => Err(TransportError::Connect {
                url,
                source: "connection refused".into(),
            }),
            None => Ok(ApiResponse::new(StatusCode::OK, Bytes::new())),
        }
    }
}

/// Deterministic authenticator double
///
/// Attaches `Bearer mock-token-<n>`, where `n` is the number of successful
/// refreshes so far.
#[derive(Default)]
pub struct MockAuthenticator {
    authorize_count: AtomicU32,
    refresh_count: AtomicU32,
    generation: AtomicU32,
    fail_on_authorize: AtomicBool,
    fail_on_refresh: AtomicBool,
    refresh_unreachable: AtomicBool,
}

impl MockAuthenticator {
    /// Create new mock authenticator
    pub fn new() -> Self {
        Self::default()
    }

    /// Make next authorize fail with [`AuthError::MissingToken`]
    pub fn fail_next_authorize(&self) {
        self.fail_on_authorize.store(true, Ordering::SeqCst);
    }

    /// Make next refresh fail with [`AuthError::Rejected`]
    pub fn fail_next_refresh(&self) {
        self.fail_on_refresh.store(true, Ordering::SeqCst);
    }

    /// Make next refresh fail as if the token endpoint were unreachable
    pub fn fail_next_refresh_unreachable(&self) {
        self.refresh_unreachable.store(true, Ordering::SeqCst);
    }

    /// Get number of authorize calls
    pub fn authorize_count(&self) -> u32 {
        self.authorize_count.load(Ordering::SeqCst)
    }

    /// Get number of refresh calls, failed ones included
    pub fn refresh_count(&self) -> u32 {
        self.refresh_count.load(Ordering::SeqCst)
    }

    /// Token the next authorize will attach
    pub fn current_token(&self) -> String {
        format!("mock-token-{}", self.generation.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn authorize(&self, mut request: ApiRequest) -> Result<ApiRequest, AuthError> {
        self.authorize_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_authorize.swap(false, Ordering::SeqCst) {
            return Err(AuthError::MissingToken);
        }
        let header = bearer_header(&SecureString::new(self.current_token()))?;
        request.headers.insert(AUTHORIZATION, header);
        Ok(request)
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        self.refresh_count.fetch_add(1, Ordering::SeqCst);
        if self.refresh_unreachable.swap(false, Ordering::SeqCst) {
            return Err(AuthError::Network(TransportError::Connect {
                url: "mock://uaa/oauth/token".into(),
                source: "connection refused".into(),
            }));
        }
        if self.fail_on_refresh.swap(false, Ordering::SeqCst) {
            return Err(AuthError::Rejected { status: 401 });
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
