//! Transport layer abstraction for fetching maindata.

use crate::error::{SyncError, SyncResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A transport fetches raw maindata bodies from the remote.
///
/// This trait abstracts the network layer so the poller can run against
/// HTTP, a recorded session or a mock.
pub trait MainDataTransport: Send + Sync {
    /// Authenticates against the remote.
    fn login(&self) -> SyncResult<()>;

    /// Fetches the changes since `rid`. A rid of 0 asks for a full snapshot.
    fn fetch_maindata(&self, rid: i64) -> SyncResult<Vec<u8>>;

    /// Returns true if the transport holds a session.
    fn is_authenticated(&self) -> bool;
}

/// A scripted response served by [`MockTransport`].
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A response body.
    Body(Vec<u8>),
    /// The remote dropped the session.
    SessionExpired,
    /// The remote could not be reached.
    Unavailable(String),
}

/// A mock transport for testing.
///
/// Serves queued responses in order; once the queue is empty it keeps
/// serving the fallback, if any.
#[derive(Debug, Default)]
pub struct MockTransport {
    authenticated: AtomicBool,
    reject_login: AtomicBool,
    logins: AtomicUsize,
    responses: Mutex<VecDeque<MockResponse>>,
    fallback: Mutex<Option<MockResponse>>,
    requested_rids: Mutex<Vec<i64>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn push_response(&self, response: MockResponse) {
        self.responses.lock().push_back(response);
    }

    /// Queues a response body.
    pub fn push_body(&self, body: impl Into<Vec<u8>>) {
        self.push_response(MockResponse::Body(body.into()));
    }

    /// Sets the response served once the queue is drained.
    pub fn set_fallback(&self, response: MockResponse) {
        *self.fallback.lock() = Some(response);
    }

    /// Makes every login attempt fail.
    pub fn set_reject_login(&self, reject: bool) {
        self.reject_login.store(reject, Ordering::SeqCst);
    }

    /// Returns the number of successful logins.
    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    /// Returns the rids requested so far.
    pub fn requested_rids(&self) -> Vec<i64> {
        self.requested_rids.lock().clone()
    }
}

impl MainDataTransport for MockTransport {
    fn login(&self) -> SyncResult<()> {
        if self.reject_login.load(Ordering::SeqCst) {
            return Err(SyncError::AuthenticationFailed("credentials rejected".into()));
        }
        self.authenticated.store(true, Ordering::SeqCst);
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn fetch_maindata(&self, rid: i64) -> SyncResult<Vec<u8>> {
        if !self.is_authenticated() {
            return Err(SyncError::NotConnected);
        }
        self.requested_rids.lock().push(rid);

        let response = self
            .responses
            .lock()
            .pop_front()
            .or_else(|| self.fallback.lock().clone())
            .ok_or_else(|| SyncError::transport_fatal("no mock response queued"))?;

        match response {
            MockResponse::Body(body) => Ok(body),
            MockResponse::SessionExpired => {
                self.authenticated.store(false, Ordering::SeqCst);
                Err(SyncError::SessionExpired)
            }
            MockResponse::Unavailable(message) => Err(SyncError::transport_retryable(message)),
        }
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}
