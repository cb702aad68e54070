//! Configuration for the maindata poller.

use crate::error::{SyncError, SyncResult};
use std::time::Duration;

/// Configuration for polling a qBittorrent instance.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// WebUI base URL (e.g. `http://localhost:8080`).
    pub base_url: String,
    /// WebUI username.
    pub username: String,
    /// WebUI password.
    pub password: String,
    /// Delay between two successful polls.
    pub poll_interval: Duration,
    /// Retry configuration.
    pub retry: RetryConfig,
}

impl PollerConfig {
    /// Creates a new poller configuration.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: "admin".into(),
            password: String::new(),
            poll_interval: Duration::from_secs(2),
            retry: RetryConfig::default(),
        }
    }

    /// Sets the WebUI credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Checks the configuration for values the poller cannot work with.
    pub fn validate(&self) -> SyncResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SyncError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(SyncError::InvalidConfig("poll interval must be non-zero".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(SyncError::InvalidConfig("retry max_attempts must be at least 1".into()));
        }
        let multiplier = self.retry.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(SyncError::InvalidConfig(format!(
                "retry backoff multiplier must be finite and at least 1.0, got {multiplier}"
            )));
        }
        Ok(())
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included.
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
    /// Whether to add jitter to delays.
    pub add_jitter: bool,
}

impl RetryConfig {
    /// Creates a new retry configuration.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            add_jitter: true,
        }
    }

    /// Creates a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            add_jitter: false,
        }
    }

    /// Sets the initial delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the backoff multiplier.
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Disables jitter.
    pub fn without_jitter(mut self) -> Self {
        self.add_jitter = false;
        self
    }

    /// Calculates the delay for a given attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base_delay = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);

        let delay_secs = if base_delay.is_nan() {
            0.0
        } else {
            base_delay.clamp(0.0, self.max_delay.as_secs_f64())
        };

        if self.add_jitter {
            // Up to 25% on top of the capped delay.
            let jitter = delay_secs * 0.25 * rand::random::<f64>();
            Duration::from_secs_f64(delay_secs + jitter)
        } else {
            Duration::from_secs_f64(delay_secs)
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poller_config_builder() {
        let config = PollerConfig::new("http://qbittorrent:8080")
            .with_credentials("exporter", "secret")
            .with_poll_interval(Duration::from_secs(10))
            .with_retry(RetryConfig::no_retry());

        assert_eq!(config.base_url, "http://qbittorrent:8080");
        assert_eq!(config.username, "exporter");
        assert_eq!(config.password, "secret");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.retry.max_attempts, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = PollerConfig::new("qbittorrent:8080");
        assert!(matches!(config.validate(), Err(SyncError::InvalidConfig(_))));

        let config = PollerConfig::default().with_poll_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(SyncError::InvalidConfig(_))));

        let config = PollerConfig::default().with_retry(RetryConfig::new(0));
        assert!(matches!(config.validate(), Err(SyncError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_bad_backoff_multiplier() {
        for multiplier in [-1.0, 0.5, f64::NAN, f64::INFINITY] {
            let config = PollerConfig::default()
                .with_retry(RetryConfig::new(3).with_backoff_multiplier(multiplier));
            assert!(
                matches!(config.validate(), Err(SyncError::InvalidConfig(_))),
                "multiplier {multiplier} accepted"
            );
        }

        let config =
            PollerConfig::default().with_retry(RetryConfig::new(3).with_backoff_multiplier(1.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn retry_delay_never_negative() {
        for multiplier in [-1.0, f64::NAN] {
            let config = RetryConfig::new(4)
                .with_initial_delay(Duration::from_millis(100))
                .with_backoff_multiplier(multiplier);
            for attempt in 1..4 {
                assert!(config.delay_for_attempt(attempt) <= Duration::from_millis(125));
            }
        }
    }

    #[test]
    fn retry_delay_calculation() {
        let config = RetryConfig::new(5)
            .with_initial_delay(Duration::from_millis(100))
            .with_backoff_multiplier(2.0);

        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);

        let delay1 = config.delay_for_attempt(1);
        assert!(delay1 >= Duration::from_millis(100));
        assert!(delay1 <= Duration::from_millis(125));

        let delay2 = config.delay_for_attempt(2);
        assert!(delay2 >= Duration::from_millis(200));
    }

    #[test]
    fn retry_delay_without_jitter_is_exact() {
        let config = RetryConfig::new(4)
            .with_initial_delay(Duration::from_millis(100))
            .without_jitter();

        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(400));
    }

    #[test]
    fn retry_delay_respects_max() {
        let config = RetryConfig::new(10)
            .with_initial_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(5))
            .with_backoff_multiplier(10.0);

        let delay = config.delay_for_attempt(5);
        assert!(delay <= Duration::from_millis(6250));
    }
}
