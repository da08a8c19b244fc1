// Copyright (c) 2025 - Cowboy AI, Inc.
//! Compute Domain Models
//!
//! Catalog snapshots a provider hands to the resolver, the status vocabulary
//! the convergence pollers observe, and the resolved [`Template`].
//!
//! # Value Objects with Invariants
//!
//! - [`Location`] - Scoped node in the PROVIDER → REGION → ZONE → HOST tree
//! - [`OperatingSystem`] - Family plus free-text descriptors of an image OS
//! - [`Image`] - Bootable image with composite `location/provider` id
//! - [`Hardware`] - Sizing offer with an image support rule
//!
//! # Pure Functions
//!
//! - [`is_compatible`] - Location ancestor compatibility (depth 2)
//! - [`os_capabilities`] - Unix and package-manager classification
//! - [`invariants`] - Catalog validation

pub mod hardware;
pub mod image;
pub mod invariants;
pub mod location;
pub mod operating_system;
pub mod os_capabilities;
pub mod status;
pub mod template;

pub use hardware::{Hardware, HardwareBuilder, ImageSupport, Volume};
pub use image::{Image, ImageBuilder, ImagePredicate};
pub use invariants::{ValidationError, ValidationResult};
pub use location::{is_compatible, Location, LocationHierarchy, LocationScope};
pub use operating_system::{OperatingSystem, OsFamily};
pub use os_capabilities::PackageManager;
pub use status::{ImageStatus, NodeMetadata, NodeStatus, ResourceSnapshot, StatusSet};
pub use template::{Template, TemplateOptions};
