// Copyright (c) 2025 - Cowboy AI, Inc.
//! State Convergence Polling
//!
//! Re-fetches a node or image until it reports an intended status, or
//! fails fast when it reports a status the caller declared fatal.
//!
//! # Invariants
//!
//! - Each poller owns exactly one [`ConvergenceCell`]; cells are never
//!   shared between pollers, so two observers of one resource refresh
//!   independently
//! - The last refresh wins, including a refresh that found nothing
//!
//! # Rules for `check`
//!
//! 1. Cached snapshot already in the intended status → true, no refresh
//! 2. Otherwise refresh and store the result in the cell
//! 3. Resource absent → decided by the poller's [`AbsentPolicy`]
//! 4. Status in the invalid set → `InvalidState`, never retried
//! 5. Otherwise → whether the status is the intended one

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, trace, warn};

use super::retry::{BoundedRetryPoller, RetryPolicy};
use crate::domain::{Image, ImageStatus, NodeMetadata, NodeStatus, ResourceSnapshot, StatusSet};
use crate::errors::{ComputeError, ComputeResult};

/// Fetches a fresh snapshot of a resource by id
///
/// `Ok(None)` means the resource no longer exists. This is where the
/// network call lives; any `Fn(&str) -> ComputeResult<Option<S>>` works.
pub trait RefreshStrategy<S> {
    fn refresh(&self, id: &str) -> ComputeResult<Option<S>>;
}

impl<S, F> RefreshStrategy<S> for F
where
    F: Fn(&str) -> ComputeResult<Option<S>>,
{
    fn refresh(&self, id: &str) -> ComputeResult<Option<S>> {
        self(id)
    }
}

/// Pin a closure's signature so it can serve as a [`RefreshStrategy`]
///
/// ```
/// use cim_compute::domain::NodeMetadata;
/// use cim_compute::polling::refresh_fn;
///
/// let gone = refresh_fn(|_id: &str| Ok::<Option<NodeMetadata>, _>(None));
/// ```
pub fn refresh_fn<S, F>(f: F) -> F
where
    F: Fn(&str) -> ComputeResult<Option<S>>,
{
    f
}

/// Last known snapshot of one resource
#[derive(Debug, Clone)]
pub struct ConvergenceCell<S> {
    snapshot: Option<S>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl<S> Default for ConvergenceCell<S> {
    fn default() -> Self {
        Self {
            snapshot: None,
            refreshed_at: None,
        }
    }
}

impl<S> ConvergenceCell<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell holding the snapshot an action already returned
    pub fn seeded(snapshot: S) -> Self {
        Self {
            snapshot: Some(snapshot),
            refreshed_at: None,
        }
    }

    pub fn get(&self) -> Option<&S> {
        self.snapshot.as_ref()
    }

    /// Overwrite with a refresh result
    pub fn store(&mut self, snapshot: Option<S>) {
        self.snapshot = snapshot;
        self.refreshed_at = Some(Utc::now());
    }

    /// When the cell was last refreshed; `None` if only seeded
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn into_inner(self) -> Option<S> {
        self.snapshot
    }
}

/// What a vanished resource means for convergence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbsentPolicy {
    /// Gone is the goal (termination, deletion)
    Converged,
    /// Gone is not the goal; keep waiting
    #[default]
    NotConverged,
}

/// Polls one resource towards an intended status
pub struct StateConvergencePoller<S: ResourceSnapshot, R> {
    id: String,
    intended: S::Status,
    invalid: StatusSet<S::Status>,
    absent: AbsentPolicy,
    refresh: R,
    cell: ConvergenceCell<S>,
}

impl<S, R> StateConvergencePoller<S, R>
where
    S: ResourceSnapshot,
    R: RefreshStrategy<S>,
{
    /// Poller with an empty cell, no invalid statuses and absence = not converged
    pub fn new(id: impl Into<String>, intended: S::Status, refresh: R) -> Self {
        Self {
            id: id.into(),
            intended,
            invalid: StatusSet::new(),
            absent: AbsentPolicy::default(),
            refresh,
            cell: ConvergenceCell::new(),
        }
    }

    /// Poller whose cell starts with `snapshot`; the id is taken from it
    pub fn seeded(snapshot: S, intended: S::Status, refresh: R) -> Self {
        let mut poller = Self::new(snapshot.id().to_string(), intended, refresh);
        poller.cell = ConvergenceCell::seeded(snapshot);
        poller
    }

    pub fn invalid_statuses(mut self, statuses: impl IntoIterator<Item = S::Status>) -> Self {
        self.invalid = statuses.into_iter().collect();
        self
    }

    pub fn absent_means(mut self, policy: AbsentPolicy) -> Self {
        self.absent = policy;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn intended(&self) -> S::Status {
        self.intended
    }

    pub fn invalid(&self) -> &StatusSet<S::Status> {
        &self.invalid
    }

    /// Last known snapshot
    pub fn snapshot(&self) -> Option<&S> {
        self.cell.get()
    }

    pub fn cell(&self) -> &ConvergenceCell<S> {
        &self.cell
    }

    /// One convergence check (see module docs)
    pub fn check(&mut self) -> ComputeResult<bool> {
        if self
            .cell
            .get()
            .is_some_and(|snapshot| snapshot.status() == self.intended)
        {
            trace!("{} {} already {}, skipping refresh", S::KIND, self.id, self.intended);
            return Ok(true);
        }

        let fresh = self.refresh.refresh(&self.id)?;
        self.cell.store(fresh);

        let Some(snapshot) = self.cell.get() else {
            let converged = self.absent == AbsentPolicy::Converged;
            debug!("{} {} no longer exists (converged: {})", S::KIND, self.id, converged);
            return Ok(converged);
        };

        let status = snapshot.status();
        if self.invalid.contains(&status) {
            let location = snapshot
                .location()
                .map(|l| l.id().to_string())
                .unwrap_or_else(|| "none".to_string());
            warn!(
                kind = S::KIND,
                id = %self.id,
                location = %location,
                status = %status,
                "Resource reached invalid status"
            );
            return Err(ComputeError::InvalidState(format!(
                "{} {} (location {}) reached invalid status {}",
                S::KIND,
                self.id,
                location,
                status
            )));
        }

        debug!("{} {} is {}, waiting for {}", S::KIND, self.id, status, self.intended);
        Ok(status == self.intended)
    }

    /// Repeat [`check`](Self::check) under `policy`
    pub fn wait(&mut self, policy: RetryPolicy) -> ComputeResult<bool> {
        let poller = BoundedRetryPoller::new(policy)
            .label(format!("{} {} {}", S::KIND, self.id, self.intended));
        poller.poll(|| self.check())
    }
}

impl<S, R> fmt::Debug for StateConvergencePoller<S, R>
where
    S: ResourceSnapshot + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateConvergencePoller")
            .field("id", &self.id)
            .field("intended", &self.intended)
            .field("invalid", &self.invalid)
            .field("absent", &self.absent)
            .field("snapshot", &self.cell.get())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Ready-made pollers
// ============================================================================

/// Node becomes RUNNING; ERROR or TERMINATED is fatal
pub fn node_running<R>(node: NodeMetadata, refresh: R) -> StateConvergencePoller<NodeMetadata, R>
where
    R: RefreshStrategy<NodeMetadata>,
{
    StateConvergencePoller::seeded(node, NodeStatus::Running, refresh)
        .invalid_statuses([NodeStatus::Error, NodeStatus::Terminated])
}

/// Node becomes TERMINATED or disappears
pub fn node_terminated<R>(node: NodeMetadata, refresh: R) -> StateConvergencePoller<NodeMetadata, R>
where
    R: RefreshStrategy<NodeMetadata>,
{
    StateConvergencePoller::seeded(node, NodeStatus::Terminated, refresh)
        .absent_means(AbsentPolicy::Converged)
}

/// Node becomes SUSPENDED; ERROR or TERMINATED is fatal
pub fn node_suspended<R>(node: NodeMetadata, refresh: R) -> StateConvergencePoller<NodeMetadata, R>
where
    R: RefreshStrategy<NodeMetadata>,
{
    StateConvergencePoller::seeded(node, NodeStatus::Suspended, refresh)
        .invalid_statuses([NodeStatus::Error, NodeStatus::Terminated])
}

/// Image becomes AVAILABLE; ERROR or DELETED is fatal
pub fn image_available<R>(image: Image, refresh: R) -> StateConvergencePoller<Image, R>
where
    R: RefreshStrategy<Image>,
{
    StateConvergencePoller::seeded(image, ImageStatus::Available, refresh)
        .invalid_statuses([ImageStatus::Error, ImageStatus::Deleted])
}

/// Image becomes DELETED or disappears
pub fn image_deleted<R>(image: Image, refresh: R) -> StateConvergencePoller<Image, R>
where
    R: RefreshStrategy<Image>,
{
    StateConvergencePoller::seeded(image, ImageStatus::Deleted, refresh)
        .absent_means(AbsentPolicy::Converged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, LocationScope};
    use std::cell::Cell;

    fn node(status: NodeStatus) -> NodeMetadata {
        NodeMetadata::new("n-1", status)
    }

    #[test]
    fn test_cached_intended_status_skips_refresh() {
        let refreshes = Cell::new(0);
        let mut poller = node_running(node(NodeStatus::Running), refresh_fn(|_: &str| {
            refreshes.set(refreshes.get() + 1);
            Ok(Some(node(NodeStatus::Running)))
        }));
        assert!(poller.check().unwrap());
        assert_eq!(refreshes.get(), 0);
        assert!(poller.cell().refreshed_at().is_none());
    }

    #[test]
    fn test_invalid_status_fails_after_one_refresh() {
        let provider = Location::provider("p", "");
        let zone = Location::child_of(
            &Location::child_of(&provider, LocationScope::Region, "r", ""),
            LocationScope::Zone,
            "z1",
            "",
        );
        let refreshes = Cell::new(0);
        let mut poller = node_running(node(NodeStatus::Pending), refresh_fn(|_: &str| {
            refreshes.set(refreshes.get() + 1);
            Ok(Some(node(NodeStatus::Error).with_location(zone.clone())))
        }));
        let err = poller.check().unwrap_err();
        assert_eq!(
            err,
            ComputeError::InvalidState("node n-1 (location z1) reached invalid status ERROR".to_string())
        );
        assert_eq!(refreshes.get(), 1);
    }

    #[test]
    fn test_pending_then_running() {
        let statuses = [NodeStatus::Pending, NodeStatus::Running];
        let refreshes = Cell::new(0usize);
        let mut poller = node_running(node(NodeStatus::Pending), refresh_fn(|_: &str| {
            let status = statuses[refreshes.get().min(1)];
            refreshes.set(refreshes.get() + 1);
            Ok(Some(node(status)))
        }));
        assert!(!poller.check().unwrap());
        assert!(poller.check().unwrap());
        // cached now
        assert!(poller.check().unwrap());
        assert_eq!(refreshes.get(), 2);
    }

    #[test]
    fn test_absent_resource_follows_policy() {
        let mut gone = node_terminated(node(NodeStatus::Running), refresh_fn(|_: &str| Ok::<Option<NodeMetadata>, _>(None)));
        assert!(gone.check().unwrap());
        assert!(gone.snapshot().is_none());

        let mut missing = node_running(node(NodeStatus::Pending), refresh_fn(|_: &str| Ok::<Option<NodeMetadata>, _>(None)));
        assert!(!missing.check().unwrap());
    }

    #[test]
    fn test_refresh_error_propagates() {
        let mut poller = node_suspended(node(NodeStatus::Running), refresh_fn(|_: &str| {
            Err(ComputeError::NotFound("node n-1".to_string()))
        }));
        assert!(matches!(poller.check(), Err(ComputeError::NotFound(_))));
    }

    #[test]
    fn test_wait_stops_on_invalid_status() {
        let refreshes = Cell::new(0);
        let image = Image::builder("img", Default::default())
            .status(ImageStatus::Pending)
            .build();
        let mut poller = image_available(image.clone(), refresh_fn(|_: &str| {
            refreshes.set(refreshes.get() + 1);
            Ok(Some(image.clone().with_status(ImageStatus::Deleted)))
        }));
        let result = poller.wait(RetryPolicy::new(
            std::time::Duration::from_secs(5),
            std::time::Duration::from_millis(1),
        ));
        assert!(matches!(result, Err(ComputeError::InvalidState(_))));
        assert_eq!(refreshes.get(), 1);
    }
}
