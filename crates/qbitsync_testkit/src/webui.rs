//! In-process stand-in for the qBittorrent WebUI.
//!
//! [`FakeWebUi`] implements [`HttpClient`] and answers the login and
//! maindata endpoints from a list of published messages, the way the real
//! WebUI answers from its update history:
//! - `rid=0` returns the most recent published full snapshot
//! - any other rid returns the first published message after it, or an
//!   empty delta echoing the rid when nothing newer exists

use parking_lot::Mutex;
use qbitsync_engine::{HttpClient, HttpResponse};
use qbitsync_model::MainData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct WebUiState {
    messages: Vec<MainData>,
    session: Option<String>,
    sessions_issued: usize,
    requested_rids: Vec<i64>,
}

/// A fake WebUI serving published maindata messages.
#[derive(Debug)]
pub struct FakeWebUi {
    username: String,
    password: String,
    state: Mutex<WebUiState>,
    reachable: AtomicBool,
    logins: AtomicUsize,
}

impl FakeWebUi {
    /// Creates a fake accepting the given credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            state: Mutex::new(WebUiState::default()),
            reachable: AtomicBool::new(true),
            logins: AtomicUsize::new(0),
        }
    }

    /// Publishes a message. Messages must be published in rid order.
    pub fn publish(&self, message: MainData) {
        self.state.lock().messages.push(message);
    }

    /// Invalidates the current session, as a WebUI restart would.
    pub fn expire_session(&self) {
        self.state.lock().session = None;
    }

    /// Makes every request fail at the connection level.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Returns the number of successful logins.
    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    /// Returns the rids requested from the maindata endpoint.
    pub fn requested_rids(&self) -> Vec<i64> {
        self.state.lock().requested_rids.clone()
    }

    fn check_reachable(&self) -> Result<(), String> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err("connection refused".into())
        }
    }
}

fn query_rid(url: &str) -> Option<i64> {
    url.split_once('?')?
        .1
        .split('&')
        .find_map(|pair| pair.strip_prefix("rid="))?
        .parse()
        .ok()
}

fn json_response(message: &MainData) -> HttpResponse {
    let body = serde_json::to_vec(message).expect("Failed to encode maindata");
    HttpResponse::new(200, body)
}

impl HttpClient for FakeWebUi {
    fn get(&self, url: &str, cookie: Option<&str>) -> Result<HttpResponse, String> {
        self.check_reachable()?;
        if !url.contains("/api/v2/sync/maindata") {
            return Ok(HttpResponse::new(404, "Not Found"));
        }

        let mut state = self.state.lock();
        if state.session.is_none() || state.session.as_deref() != cookie {
            return Ok(HttpResponse::new(403, "Forbidden"));
        }
        let Some(rid) = query_rid(url) else {
            return Ok(HttpResponse::new(400, "Bad Request"));
        };
        state.requested_rids.push(rid);

        let message = if rid == 0 {
            state.messages.iter().rev().find(|m| m.full_update)
        } else {
            state.messages.iter().find(|m| m.rid > rid)
        };

        Ok(match message {
            Some(message) => json_response(message),
            None => json_response(&MainData::incremental(rid)),
        })
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse, String> {
        self.check_reachable()?;
        if !url.ends_with("/api/v2/auth/login") {
            return Ok(HttpResponse::new(404, "Not Found"));
        }

        let field = |name: &str| form.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);
        if field("username") != Some(self.username.as_str())
            || field("password") != Some(self.password.as_str())
        {
            return Ok(HttpResponse::new(200, "Fails."));
        }

        let mut state = self.state.lock();
        state.sessions_issued += 1;
        let sid = format!("SID=session{}", state.sessions_issued);
        state.session = Some(sid.clone());
        self.logins.fetch_add(1, Ordering::SeqCst);

        Ok(HttpResponse::new(200, "Ok.").with_cookie(format!("{sid}; HttpOnly; path=/")))
    }

    fn is_healthy(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }
}
