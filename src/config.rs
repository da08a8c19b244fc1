// Copyright (c) 2025 - Cowboy AI, Inc.
//! Polling timeouts
//!
//! Defaults can be overridden from the environment:
//!
//! | Variable | Default |
//! |---|---|
//! | `COMPUTE_TIMEOUT_NODE_RUNNING` | 1200 s |
//! | `COMPUTE_TIMEOUT_NODE_TERMINATED` | 30 s |
//! | `COMPUTE_TIMEOUT_NODE_SUSPENDED` | 30 s |
//! | `COMPUTE_TIMEOUT_IMAGE_AVAILABLE` | 1200 s |
//! | `COMPUTE_TIMEOUT_IMAGE_DELETED` | 30 s |
//! | `COMPUTE_TIMEOUT_PORT_OPEN` | 600 s |
//! | `COMPUTE_POLL_PERIOD_MS` | 1000 ms |

use std::time::Duration;

use crate::errors::{ComputeError, ComputeResult};
use crate::polling::RetryPolicy;

/// Per-operation wait limits and the shared polling period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputeTimeouts {
    /// Node becomes RUNNING
    pub node_running: Duration,
    /// Node becomes TERMINATED or disappears
    pub node_terminated: Duration,
    /// Node becomes SUSPENDED
    pub node_suspended: Duration,
    /// Image becomes AVAILABLE
    pub image_available: Duration,
    /// Image becomes DELETED or disappears
    pub image_deleted: Duration,
    /// TCP port accepts connections
    pub port_open: Duration,
    /// Sleep between attempts
    pub poll_period: Duration,
}

impl Default for ComputeTimeouts {
    fn default() -> Self {
        Self {
            node_running: Duration::from_secs(1200),
            node_terminated: Duration::from_secs(30),
            node_suspended: Duration::from_secs(30),
            image_available: Duration::from_secs(1200),
            image_deleted: Duration::from_secs(30),
            port_open: Duration::from_secs(600),
            poll_period: Duration::from_millis(1000),
        }
    }
}

impl ComputeTimeouts {
    /// Load from the process environment
    pub fn from_env() -> ComputeResult<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment
    ///
    /// Unset variables keep their defaults. A set variable that is not a
    /// whole number is a `Configuration` error naming the variable.
    pub fn from_env_with<F>(lookup: F) -> ComputeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let seconds = |key: &str, default: Duration| -> ComputeResult<Duration> {
            parse_u64(&lookup, key).map(|v| v.map(Duration::from_secs).unwrap_or(default))
        };

        Ok(Self {
            node_running: seconds("COMPUTE_TIMEOUT_NODE_RUNNING", defaults.node_running)?,
            node_terminated: seconds("COMPUTE_TIMEOUT_NODE_TERMINATED", defaults.node_terminated)?,
            node_suspended: seconds("COMPUTE_TIMEOUT_NODE_SUSPENDED", defaults.node_suspended)?,
            image_available: seconds("COMPUTE_TIMEOUT_IMAGE_AVAILABLE", defaults.image_available)?,
            image_deleted: seconds("COMPUTE_TIMEOUT_IMAGE_DELETED", defaults.image_deleted)?,
            port_open: seconds("COMPUTE_TIMEOUT_PORT_OPEN", defaults.port_open)?,
            poll_period: parse_u64(&lookup, "COMPUTE_POLL_PERIOD_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_period),
        })
    }

    pub fn node_running_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.node_running, self.poll_period)
    }

    pub fn node_terminated_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.node_terminated, self.poll_period)
    }

    pub fn node_suspended_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.node_suspended, self.poll_period)
    }

    pub fn image_available_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.image_available, self.poll_period)
    }

    pub fn image_deleted_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.image_deleted, self.poll_period)
    }

    pub fn port_open_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.port_open, self.poll_period)
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> ComputeResult<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ComputeError::Configuration(format!("{} must be a whole number, got {:?}", key, raw))
        }),
    }
}
