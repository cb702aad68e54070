//! qBittorrent WebUI transport.
//!
//! The HTTP library itself is abstracted behind [`HttpClient`] so that the
//! transport logic (endpoints, session cookie, status mapping) can be used
//! with any client, or with a scripted one in tests.

use crate::config::PollerConfig;
use crate::error::{SyncError, SyncResult};
use crate::transport::MainDataTransport;
use parking_lot::RwLock;
use tracing::{debug, warn};

const LOGIN_PATH: &str = "/api/v2/auth/login";
const MAINDATA_PATH: &str = "/api/v2/sync/maindata";

/// A response returned by an [`HttpClient`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
    /// Value of the `Set-Cookie` header, if any.
    pub set_cookie: Option<String>,
}

impl HttpResponse {
    /// Creates a response with the given status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            set_cookie: None,
        }
    }

    /// Sets the `Set-Cookie` header.
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookie = Some(cookie.into());
        self
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Errors are connection-level failures; HTTP error statuses come back as
/// regular responses.
pub trait HttpClient: Send + Sync {
    /// Sends a GET request, with the given `Cookie` header if any.
    fn get(&self, url: &str, cookie: Option<&str>) -> Result<HttpResponse, String>;

    /// Sends a form-encoded POST request.
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse, String>;

    /// Checks if the client is healthy.
    fn is_healthy(&self) -> bool;
}

impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    fn get(&self, url: &str, cookie: Option<&str>) -> Result<HttpResponse, String> {
        (**self).get(url, cookie)
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse, String> {
        (**self).post_form(url, form)
    }

    fn is_healthy(&self) -> bool {
        (**self).is_healthy()
    }
}

/// Transport speaking to the qBittorrent WebUI API.
pub struct HttpTransport<C: HttpClient> {
    base_url: String,
    username: String,
    password: String,
    client: C,
    /// `SID=...` cookie of the current session.
    session: RwLock<Option<String>>,
    last_error: RwLock<Option<String>>,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a new transport.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        client: C,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            client,
            session: RwLock::new(None),
            last_error: RwLock::new(None),
        }
    }

    /// Creates a transport from a poller configuration.
    pub fn from_config(config: &PollerConfig, client: C) -> Self {
        Self::new(
            config.base_url.as_str(),
            config.username.as_str(),
            config.password.as_str(),
            client,
        )
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Forgets the current session.
    pub fn logout(&self) {
        *self.session.write() = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn connection_error(&self, err: String) -> SyncError {
        warn!(error = %err, "request to {} failed", self.base_url);
        *self.last_error.write() = Some(err.clone());
        SyncError::transport_retryable(err)
    }

    fn clear_error(&self) {
        *self.last_error.write() = None;
    }
}

/// Extracts `SID=<value>` from a `Set-Cookie` header.
fn session_cookie(set_cookie: &str) -> Option<String> {
    set_cookie
        .split(';')
        .map(str::trim)
        .find(|part| part.starts_with("SID="))
        .filter(|part| part.len() > "SID=".len())
        .map(str::to_string)
}

impl<C: HttpClient> MainDataTransport for HttpTransport<C> {
    fn login(&self) -> SyncResult<()> {
        if !self.client.is_healthy() {
            return Err(SyncError::NotConnected);
        }

        let response = self
            .client
            .post_form(
                &self.url(LOGIN_PATH),
                &[
                    ("username", self.username.as_str()),
                    ("password", self.password.as_str()),
                ],
            )
            .map_err(|e| self.connection_error(e))?;
        self.clear_error();

        match response.status {
            200 => {}
            403 => {
                return Err(SyncError::AuthenticationFailed(
                    "client address banned after too many failed logins".into(),
                ))
            }
            status => {
                return Err(SyncError::Http {
                    endpoint: LOGIN_PATH.into(),
                    status,
                })
            }
        }

        if String::from_utf8_lossy(&response.body).trim() != "Ok." {
            return Err(SyncError::AuthenticationFailed("invalid username or password".into()));
        }

        let cookie = response
            .set_cookie
            .as_deref()
            .and_then(session_cookie)
            .ok_or_else(|| {
                SyncError::AuthenticationFailed("login response carried no session cookie".into())
            })?;

        *self.session.write() = Some(cookie);
        debug!(base_url = %self.base_url, "logged in");
        Ok(())
    }

    fn fetch_maindata(&self, rid: i64) -> SyncResult<Vec<u8>> {
        let cookie = self.session.read().clone().ok_or(SyncError::NotConnected)?;
        let url = format!("{}?rid={}", self.url(MAINDATA_PATH), rid);

        let response = self
            .client
            .get(&url, Some(&cookie))
            .map_err(|e| self.connection_error(e))?;
        self.clear_error();

        if response.is_success() {
            return Ok(response.body);
        }
        match response.status {
            403 => {
                self.logout();
                Err(SyncError::SessionExpired)
            }
            status => Err(SyncError::Http {
                endpoint: MAINDATA_PATH.into(),
                status,
            }),
        }
    }

    fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }
}
