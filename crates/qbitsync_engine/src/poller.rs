//! Poller state machine.
//!
//! The poller drives the transport and feeds the store: log in when needed,
//! fetch the changes since the store's rid, decode them and apply them.
//! When the remote drops the session the store is reset, so that the next
//! successful fetch (at rid 0) rebuilds the mirror from a full snapshot.

use crate::config::PollerConfig;
use crate::error::{SyncError, SyncResult};
use crate::store::{ApplyKind, ApplyOutcome, SyncStore};
use crate::transport::MainDataTransport;
use parking_lot::RwLock;
use qbitsync_model::MainData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Upper bound on a single sleep slice while waiting between polls.
const CANCEL_CHECK_SLICE: Duration = Duration::from_millis(50);

/// The current state of the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Poller is idle, not polling.
    Idle,
    /// Poller is logging in.
    Authenticating,
    /// Poller is fetching maindata.
    Fetching,
    /// Poller is applying a message to the store.
    Applying,
    /// Poller has completed a poll.
    Synced,
    /// Poller encountered an error.
    Error,
    /// Poller is waiting before retrying.
    RetryWait,
}

impl PollerState {
    /// Returns true if a poll is in progress.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PollerState::Authenticating | PollerState::Fetching | PollerState::Applying
        )
    }

    /// Returns true if a new poll can start.
    pub fn can_start_poll(&self) -> bool {
        matches!(
            self,
            PollerState::Idle | PollerState::Synced | PollerState::Error | PollerState::RetryWait
        )
    }
}

/// Statistics about polling.
#[derive(Debug, Clone, Default)]
pub struct PollStats {
    /// Polls that ended with an applied message.
    pub polls_completed: u64,
    /// Messages applied as a full replace.
    pub full_updates: u64,
    /// Messages merged incrementally.
    pub incremental_updates: u64,
    /// Polls that failed.
    pub failures: u64,
    /// Retries performed.
    pub retries: u64,
    /// Times the store was reset after the session expired.
    pub session_resets: u64,
    /// Time of the last completed poll.
    pub last_poll_time: Option<Instant>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Result of a completed poll.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// What the store did with the message.
    pub apply: ApplyOutcome,
    /// Time spent on the poll.
    pub duration: Duration,
}

/// Polls a remote and mirrors its maindata into a [`SyncStore`].
pub struct MainDataPoller<T: MainDataTransport> {
    config: PollerConfig,
    transport: Arc<T>,
    store: Arc<SyncStore>,
    state: RwLock<PollerState>,
    stats: RwLock<PollStats>,
    cancelled: AtomicBool,
}

impl<T: MainDataTransport> MainDataPoller<T> {
    /// Creates a new poller feeding `store`.
    ///
    /// Fails with [`SyncError::InvalidConfig`] if the configuration does not
    /// pass [`PollerConfig::validate`].
    pub fn new(config: PollerConfig, transport: T, store: Arc<SyncStore>) -> SyncResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            transport: Arc::new(transport),
            store,
            state: RwLock::new(PollerState::Idle),
            stats: RwLock::new(PollStats::default()),
            cancelled: AtomicBool::new(false),
        })
    }

    /// Returns the store fed by this poller.
    pub fn store(&self) -> &Arc<SyncStore> {
        &self.store
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Gets the current state.
    pub fn state(&self) -> PollerState {
        *self.state.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> PollStats {
        self.stats.read().clone()
    }

    /// Stops [`run`](Self::run) and any retry loop in progress.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Clears the cancelled flag.
    pub fn reset_cancel(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    /// Returns true if polling was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn check_cancelled(&self) -> SyncResult<()> {
        if self.is_cancelled() {
            Err(SyncError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn set_state(&self, state: PollerState) {
        *self.state.write() = state;
    }

    /// Performs one poll: login if needed, fetch, decode, apply.
    pub fn poll_once(&self) -> SyncResult<PollOutcome> {
        let start = Instant::now();

        let current = self.state();
        if !current.can_start_poll() {
            return Err(SyncError::InvalidStateTransition {
                from: format!("{:?}", current),
                to: "poll".into(),
            });
        }

        match self.fetch_and_apply() {
            Ok(apply) => {
                self.set_state(PollerState::Synced);

                let mut stats = self.stats.write();
                stats.polls_completed += 1;
                match apply.kind {
                    ApplyKind::Full => stats.full_updates += 1,
                    ApplyKind::Incremental => stats.incremental_updates += 1,
                }
                stats.last_poll_time = Some(Instant::now());
                stats.last_error = None;

                Ok(PollOutcome {
                    apply,
                    duration: start.elapsed(),
                })
            }
            Err(e) => {
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    fn fetch_and_apply(&self) -> SyncResult<ApplyOutcome> {
        if !self.transport.is_authenticated() {
            self.set_state(PollerState::Authenticating);
            self.transport.login()?;
            info!(base_url = %self.config.base_url, "authenticated");
        }
        self.check_cancelled()?;

        self.set_state(PollerState::Fetching);
        let rid = self.store.current_rid();
        let body = match self.transport.fetch_maindata(rid) {
            Ok(body) => body,
            Err(SyncError::SessionExpired) => {
                warn!(rid, "session expired, resetting mirror");
                self.store.reset();
                self.stats.write().session_resets += 1;
                return Err(SyncError::SessionExpired);
            }
            Err(e) => return Err(e),
        };

        let data = MainData::from_json(&body)?;
        if !data.full_update && rid != 0 && data.rid < rid {
            warn!(
                current_rid = rid,
                received_rid = data.rid,
                "received rid is older than the mirror"
            );
        }
        self.check_cancelled()?;

        self.set_state(PollerState::Applying);
        Ok(self.store.apply(&data))
    }

    /// Performs a poll, retrying retryable errors per the retry configuration.
    pub fn poll_with_retry(&self) -> SyncResult<PollOutcome> {
        let retry_config = &self.config.retry;
        let mut last_error = None;

        for attempt in 0..retry_config.max_attempts {
            if attempt > 0 {
                self.set_state(PollerState::RetryWait);
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(attempt, ?delay, "retrying poll");
                self.sleep_unless_cancelled(delay)?;

                self.stats.write().retries += 1;
            }

            self.check_cancelled()?;

            match self.poll_once() {
                Ok(outcome) => return Ok(outcome),
                Err(e) => {
                    if e.is_retryable() && attempt + 1 < retry_config.max_attempts {
                        warn!(error = %e, attempt, "poll failed, will retry");
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or(SyncError::InvalidConfig("no poll attempts configured".into())))
    }

    /// Polls until [`cancel`](Self::cancel) is called.
    ///
    /// Errors are logged and counted in the stats; they never stop the loop.
    pub fn run(&self) -> PollStats {
        info!(
            base_url = %self.config.base_url,
            interval = ?self.config.poll_interval,
            "poller started"
        );

        while !self.is_cancelled() {
            match self.poll_with_retry() {
                Ok(_) | Err(SyncError::Cancelled) => {}
                Err(e) => warn!(error = %e, "poll failed"),
            }
            if self.sleep_unless_cancelled(self.config.poll_interval).is_err() {
                break;
            }
        }

        self.set_state(PollerState::Idle);
        info!("poller stopped");
        self.stats()
    }

    fn sleep_unless_cancelled(&self, duration: Duration) -> SyncResult<()> {
        let deadline = Instant::now() + duration;
        loop {
            self.check_cancelled()?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            std::thread::sleep((deadline - now).min(CANCEL_CHECK_SLICE));
        }
    }

    fn handle_error(&self, error: &SyncError) {
        self.set_state(PollerState::Error);
        let mut stats = self.stats.write();
        stats.failures += 1;
        stats.last_error = Some(error.to_string());
    }
}
