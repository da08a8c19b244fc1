// Copyright (c) 2025 - Cowboy AI, Inc.
//! Blocking Pollers
//!
//! Everything here runs on the calling thread and sleeps between attempts.
//!
//! - [`retry`] - bounded retry of any boolean predicate
//! - [`convergence`] - refresh a node or image until it reaches a status
//! - [`socket`] - TCP endpoint readiness
//!
//! A sleeping poller cannot be interrupted mid-sleep. Callers that need
//! early cancellation hand a flag to [`BoundedRetryPoller::cancel_on`]; the
//! wait then ends as a failure (`Ok(false)`) before the next attempt.

pub mod convergence;
pub mod retry;
pub mod socket;

pub use convergence::{
    image_available, image_deleted, node_running, node_suspended, node_terminated, refresh_fn,
    AbsentPolicy, ConvergenceCell, RefreshStrategy, StateConvergencePoller,
};
pub use retry::{retry, BoundedRetryPoller, RetryPolicy};
pub use socket::SocketOpen;
