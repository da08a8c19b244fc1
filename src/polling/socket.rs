// Copyright (c) 2025 - Cowboy AI, Inc.
//! TCP endpoint readiness
//!
//! [`SocketOpen`] answers "does this endpoint accept connections yet?"
//! with a single bounded connect attempt. Refused or timed-out connects
//! are `false` so they can be retried; nothing here is fatal.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use tracing::trace;

use super::retry::{BoundedRetryPoller, RetryPolicy};
use crate::errors::ComputeResult;

/// Connect timeout used when none is configured
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Single-attempt TCP connect predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketOpen {
    connect_timeout: Duration,
}

impl Default for SocketOpen {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl SocketOpen {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Whether a TCP connection to `addr` succeeds right now
    pub fn check(&self, addr: &SocketAddr) -> bool {
        match TcpStream::connect_timeout(addr, self.connect_timeout) {
            Ok(_) => {
                trace!("{} accepting connections", addr);
                true
            }
            Err(e) => {
                trace!("{} not reachable: {}", addr, e);
                false
            }
        }
    }

    /// Retry [`check`](Self::check) under `policy`
    pub fn wait(&self, addr: SocketAddr, policy: RetryPolicy) -> ComputeResult<bool> {
        BoundedRetryPoller::new(policy)
            .label(format!("socket {}", addr))
            .poll(|| Ok(self.check(&addr)))
    }
}
