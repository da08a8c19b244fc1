// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bounded retry of a boolean predicate
//!
//! Blocking and time-bounded: the predicate runs on the calling thread,
//! with a sleep of `period` between attempts, until it returns true or
//! `timeout` has elapsed. No background task is spawned.
//!
//! # Rules
//! - The predicate is checked at least once, even with a zero timeout
//! - `Ok(false)` from the predicate is retried; `Err` aborts at once
//! - The last sleep is shortened so the final check lands on the deadline
//! - A raised cancel flag ends the wait with `Ok(false)` before the next
//!   attempt

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::errors::ComputeResult;

/// Timeout and polling period of one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub period: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, period: Duration) -> Self {
        Self { timeout, period }
    }
}

/// Retry `predicate` until true or `timeout`
pub fn retry<P>(predicate: P, timeout: Duration, period: Duration) -> ComputeResult<bool>
where
    P: FnMut() -> ComputeResult<bool>,
{
    BoundedRetryPoller::new(RetryPolicy::new(timeout, period)).poll(predicate)
}

/// Reusable retry configuration with a log label and optional cancel flag
#[derive(Debug, Clone)]
pub struct BoundedRetryPoller {
    policy: RetryPolicy,
    label: String,
    cancel: Option<Arc<AtomicBool>>,
}

impl BoundedRetryPoller {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            label: "predicate".to_string(),
            cancel: None,
        }
    }

    /// Name used in log lines
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Abandon the wait once `flag` is set
    pub fn cancel_on(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Run `predicate` under this policy
    pub fn poll<P>(&self, mut predicate: P) -> ComputeResult<bool>
    where
        P: FnMut() -> ComputeResult<bool>,
    {
        let RetryPolicy { timeout, period } = self.policy;
        let label = self.label.as_str();
        let start = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            if self.is_cancelled() {
                debug!(attempt, "{} wait cancelled", label);
                return Ok(false);
            }

            attempt += 1;
            let satisfied = predicate().inspect_err(|e| {
                debug!(attempt, error = %e, "{} aborted", label);
            })?;
            if satisfied {
                debug!(
                    attempt,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "{} satisfied",
                    label
                );
                return Ok(true);
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                warn!(
                    attempt,
                    elapsed_ms = elapsed.as_millis() as u64,
                    timeout_ms = timeout.as_millis() as u64,
                    "{} not satisfied before timeout",
                    label
                );
                return Ok(false);
            }

            let delay = period.min(timeout - elapsed);
            debug!(
                attempt,
                elapsed_ms = elapsed.as_millis() as u64,
                delay_ms = delay.as_millis() as u64,
                "{} not yet satisfied, retrying",
                label
            );
            thread::sleep(delay);
        }
    }
}
