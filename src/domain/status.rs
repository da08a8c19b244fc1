// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Status Vocabulary
//!
//! Nodes and images report different status sets, but the convergence
//! poller treats them uniformly through [`ResourceSnapshot`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

use super::location::Location;

/// Lifecycle status of a running node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
    /// Node is being created or is transitioning
    Pending,

    /// Node is up
    Running,

    /// Node is stopped but keeps its resources
    Suspended,

    /// Node is gone or being removed
    Terminated,

    /// Provider reports a failure
    Error,

    /// Provider returned a status this crate does not map
    Unrecognized,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Suspended => "SUSPENDED",
            Self::Terminated => "TERMINATED",
            Self::Error => "ERROR",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Statuses a node cannot leave on its own
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::Error)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageStatus {
    Unrecognized,
    Pending,
    Available,
    Deleted,
    Error,
}

impl ImageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unrecognized => "UNRECOGNIZED",
            Self::Pending => "PENDING",
            Self::Available => "AVAILABLE",
            Self::Deleted => "DELETED",
            Self::Error => "ERROR",
        }
    }
}

impl Default for ImageStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-in-time view of a remote resource whose status can be polled
pub trait ResourceSnapshot {
    /// Resource kind used in diagnostics ("node", "image")
    const KIND: &'static str;

    /// Status vocabulary of this kind
    type Status: Copy + Eq + Ord + Hash + fmt::Display + fmt::Debug;

    fn id(&self) -> &str;

    fn location(&self) -> Option<&Location>;

    fn status(&self) -> Self::Status;
}

/// Set of statuses a poller treats as fatal
pub type StatusSet<S> = BTreeSet<S>;

/// Snapshot of a node as reported by its provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    pub status: NodeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public_addresses: Vec<String>,
}

impl NodeMetadata {
    pub fn new(id: impl Into<String>, status: NodeStatus) -> Self {
        Self {
            id: id.into(),
            name: None,
            location: None,
            status,
            image_id: None,
            hardware_id: None,
            public_addresses: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_public_address(mut self, address: impl Into<String>) -> Self {
        self.public_addresses.push(address.into());
        self
    }
}

impl ResourceSnapshot for NodeMetadata {
    const KIND: &'static str = "node";
    type Status = NodeStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    fn status(&self) -> NodeStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert_eq!(NodeStatus::Running.to_string(), "RUNNING");
        assert_eq!(ImageStatus::Deleted.to_string(), "DELETED");
        assert_eq!(
            serde_json::to_string(&NodeStatus::Suspended).unwrap(),
            "\"SUSPENDED\""
        );
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(NodeStatus::Terminated.is_terminal());
        assert!(NodeStatus::Error.is_terminal());
        assert!(!NodeStatus::Pending.is_terminal());
    }

    #[test]
    fn test_node_snapshot() {
        let node = NodeMetadata::new("n-1", NodeStatus::Pending).with_status(NodeStatus::Running);
        assert_eq!(ResourceSnapshot::id(&node), "n-1");
        assert_eq!(ResourceSnapshot::status(&node), NodeStatus::Running);
        assert_eq!(NodeMetadata::KIND, "node");
    }
}
