// Copyright (c) 2025 - Cowboy AI, Inc.
//! Location Hierarchy
//!
//! Locations form a strict rooted tree: PROVIDER → REGION → ZONE → HOST.
//! Catalog resources (images, hardware profiles) may be bound to a location,
//! and a caller targets one location when resolving a template.
//!
//! # Invariants
//!
//! - A location with scope ≠ PROVIDER has a parent
//! - A PROVIDER location never has a parent
//! - Locations are immutable once constructed
//!
//! Construction does not reject orphans: providers return whatever their
//! APIs return, and the violation surfaces in [`is_compatible`] as an error
//! attributed to whichever side supplied the malformed location.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::invariants::validate_location;
use crate::errors::{ComputeError, ComputeResult};

/// Scope of a location, ordered from widest to narrowest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationScope {
    /// The provider itself (tree root)
    Provider,
    /// Geographic region
    Region,
    /// Availability zone within a region
    Zone,
    /// Physical host within a zone
    Host,
}

impl LocationScope {
    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provider => "PROVIDER",
            Self::Region => "REGION",
            Self::Zone => "ZONE",
            Self::Host => "HOST",
        }
    }

    /// Whether this scope covers strictly more ground than `other`
    pub fn is_wider_than(&self, other: LocationScope) -> bool {
        *self < other
    }
}

impl fmt::Display for LocationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scoped location in a provider's topology
///
/// Equality and hashing use `(scope, id)` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    id: String,
    scope: LocationScope,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<Box<Location>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

impl Location {
    /// Create a location; orphans are representable (see module docs)
    pub fn new(
        scope: LocationScope,
        id: impl Into<String>,
        description: impl Into<String>,
        parent: Option<Location>,
    ) -> Self {
        Self {
            id: id.into(),
            scope,
            description: description.into(),
            parent: parent.map(Box::new),
            metadata: BTreeMap::new(),
        }
    }

    /// Root location for a provider
    pub fn provider(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(LocationScope::Provider, id, description, None)
    }

    /// Location nested under `parent`
    pub fn child_of(
        parent: &Location,
        scope: LocationScope,
        id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(scope, id, description, Some(parent.clone()))
    }

    /// Attach a metadata entry (consumes and returns self)
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scope(&self) -> LocationScope {
        self.scope
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parent(&self) -> Option<&Location> {
        self.parent.as_deref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Non-root scope without a parent
    pub fn is_orphaned(&self) -> bool {
        self.scope != LocationScope::Provider && self.parent.is_none()
    }

    /// Parent, grandparent, ... up to the root
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Whether `self` is `other` or one of its ancestors
    pub fn contains(&self, other: &Location) -> bool {
        self == other || other.ancestors().any(|a| a == self)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.scope == other.scope && self.id == other.id
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scope.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.scope, self.id)
    }
}

/// Iterator over a location's ancestors, nearest first
pub struct Ancestors<'a> {
    next: Option<&'a Location>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Location;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// Is `candidate` acceptable when the caller targets `reference`?
///
/// # Rules
/// - Both locations are validated first, on every call. An orphaned
///   `candidate` came from the catalog and is an `InvalidState`; an orphaned
///   `reference` came from the caller and is an `InvalidArgument`.
/// - An absent `reference` or absent `candidate` is always compatible.
/// - Otherwise `candidate` must equal `reference`, its parent, or its
///   grandparent. The search stops at depth 2.
pub fn is_compatible(
    candidate: Option<&Location>,
    reference: Option<&Location>,
) -> ComputeResult<bool> {
    if let Some(candidate) = candidate {
        validate_location(candidate).map_err(|e| ComputeError::InvalidState(e.to_string()))?;
    }
    if let Some(reference) = reference {
        validate_location(reference).map_err(|e| ComputeError::InvalidArgument(e.to_string()))?;
    }

    let (Some(candidate), Some(reference)) = (candidate, reference) else {
        return Ok(true);
    };

    Ok(candidate == reference || reference.ancestors().take(2).any(|a| a == candidate))
}

/// Flat catalog of locations with id lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationHierarchy {
    locations: Vec<Location>,
}

impl LocationHierarchy {
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    /// First location with the given id, in catalog order
    pub fn find(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id() == id)
    }

    /// Like [`find`](Self::find), but absence is a `NotFound` error
    pub fn require(&self, id: &str) -> ComputeResult<&Location> {
        self.find(id)
            .ok_or_else(|| ComputeError::NotFound(format!("locationId({}) not found", id)))
    }

    /// Direct children of `parent`
    pub fn children<'a>(&'a self, parent: &'a Location) -> impl Iterator<Item = &'a Location> {
        self.locations
            .iter()
            .filter(move |l| l.parent().is_some_and(|p| p == parent))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl From<Vec<Location>> for LocationHierarchy {
    fn from(locations: Vec<Location>) -> Self {
        Self::new(locations)
    }
}
