//! Reconnect supervisor
//!
//! Retries forever at a fixed interval. There is no exponential growth and
//! no attempt cap: the feed is expected to come back.

use embedded_hal_async::delay::DelayNs;
use iot_screen_hal::{Link, LinkError};

/// Result of one supervisor step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SupervisorOutcome {
    /// Link was already up; nothing attempted
    Healthy,
    /// Link came up on this step
    Reconnected {
        /// Attempts it took, counting this one
        attempts: u32,
    },
    /// Connect failed and the backoff has elapsed
    RetryScheduled {
        /// Consecutive failures so far
        failures: u32,
        error: LinkError,
        backoff_ms: u32,
    },
}

impl SupervisorOutcome {
    /// Whether the link is up after this step
    pub fn is_connected(&self) -> bool {
        !matches!(self, SupervisorOutcome::RetryScheduled { .. })
    }
}

/// Paces reconnect attempts across loop iterations
///
/// Connection state lives in the [`Link`]; the supervisor only counts
/// attempts and failures.
#[derive(Debug, Clone)]
pub struct LinkSupervisor {
    backoff_ms: u32,
    consecutive_failures: u32,
    total_attempts: u32,
}

impl LinkSupervisor {
    pub fn new(backoff_ms: u32) -> Self {
        Self {
            backoff_ms,
            consecutive_failures: 0,
            total_attempts: 0,
        }
    }

    /// Make a single connect attempt without backing off
    ///
    /// Used once at startup, before the loop begins pacing retries.
    pub async fn connect_once<L: Link>(&mut self, link: &mut L) -> Result<(), LinkError> {
        self.total_attempts = self.total_attempts.saturating_add(1);
        let result = link.connect().await;
        match result {
            Ok(()) => self.consecutive_failures = 0,
            Err(_) => self.consecutive_failures = self.consecutive_failures.saturating_add(1),
        }
        result
    }

    /// Run one supervisor step
    ///
    /// If the link is down, makes exactly one connect attempt. On failure
    /// waits the fixed backoff before returning.
    pub async fn poll<L, D>(&mut self, link: &mut L, delay: &mut D) -> SupervisorOutcome
    where
        L: Link,
        D: DelayNs,
    {
        if link.is_connected() {
            return SupervisorOutcome::Healthy;
        }

        let failures_before = self.consecutive_failures;
        match self.connect_once(link).await {
            Ok(()) => SupervisorOutcome::Reconnected {
                attempts: failures_before.saturating_add(1),
            },
            Err(error) => {
                delay.delay_ms(self.backoff_ms).await;
                SupervisorOutcome::RetryScheduled {
                    failures: self.consecutive_failures,
                    error,
                    backoff_ms: self.backoff_ms,
                }
            }
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Connect attempts since power-on
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn backoff_ms(&self) -> u32 {
        self.backoff_ms
    }
}
