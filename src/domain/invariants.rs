// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Catalog Invariants
//!
//! Provider catalogs are external input. These functions check the
//! structural rules the resolver relies on and report violations as
//! [`ValidationError`] values. They never panic and never mutate.
//!
//! # Invariant Categories
//!
//! 1. **Topology**: every non-root location has a parent, roots have none
//! 2. **Identity**: location-scoped images carry a composite id
//! 3. **Capacity**: hardware never reports negative cores, speed or disk

use super::hardware::Hardware;
use super::image::Image;
use super::location::{Location, LocationScope};

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error with context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Non-provider location without a parent
    #[error("location {scope}({id}) has no parent")]
    OrphanedLocation { id: String, scope: LocationScope },

    /// Provider location that claims a parent
    #[error("provider location {id} must not have a parent")]
    ProviderWithParent { id: String },

    /// Identifier is blank
    #[error("{kind} id must not be empty")]
    EmptyId { kind: String },

    /// Location-scoped image whose id is not `locationId/providerId`
    #[error("image id {id} does not match {expected}")]
    CompositeImageId { id: String, expected: String },

    /// Negative capacity on a hardware profile
    #[error("hardware {hardware_id} reports negative {field}")]
    NegativeCapacity { hardware_id: String, field: String },
}

/// Validate a location and every ancestor
///
/// # Rules
/// - Scope ≠ PROVIDER requires a parent
/// - Scope = PROVIDER forbids a parent
pub fn validate_location(location: &Location) -> ValidationResult {
    std::iter::once(location)
        .chain(location.ancestors())
        .try_for_each(validate_location_node)
}

fn validate_location_node(location: &Location) -> ValidationResult {
    match (location.scope(), location.parent()) {
        (LocationScope::Provider, Some(_)) => Err(ValidationError::ProviderWithParent {
            id: location.id().to_string(),
        }),
        (scope, None) if scope != LocationScope::Provider => {
            Err(ValidationError::OrphanedLocation {
                id: location.id().to_string(),
                scope,
            })
        }
        _ => Ok(()),
    }
}

/// Validate an image identifier
///
/// # Rules
/// - Provider id must not be empty
/// - A location-scoped image has id `"<locationId>/<providerId>"`
/// - An unscoped image has id equal to its provider id
pub fn validate_image_id(image: &Image) -> ValidationResult {
    if image.provider_id().trim().is_empty() {
        return Err(ValidationError::EmptyId {
            kind: "image".to_string(),
        });
    }
    let expected = Image::composite_id(image.location(), image.provider_id());
    if image.id() != expected {
        return Err(ValidationError::CompositeImageId {
            id: image.id().to_string(),
            expected,
        });
    }
    Ok(())
}

/// Validate hardware capacity figures
///
/// # Rules
/// - Id must not be empty
/// - Cores, processor speed and every volume size are ≥ 0 (NaN is rejected)
pub fn validate_hardware(hardware: &Hardware) -> ValidationResult {
    if hardware.id().trim().is_empty() {
        return Err(ValidationError::EmptyId {
            kind: "hardware".to_string(),
        });
    }

    let negative = |field: &str| ValidationError::NegativeCapacity {
        hardware_id: hardware.id().to_string(),
        field: field.to_string(),
    };

    if !non_negative(hardware.cpu_cores()) {
        return Err(negative("cpu_cores"));
    }
    if !non_negative(hardware.processor_speed()) {
        return Err(negative("processor_speed"));
    }
    if hardware.volumes().iter().any(|v| !non_negative(v.size_gb)) {
        return Err(negative("volume size"));
    }
    Ok(())
}

fn non_negative(value: f64) -> bool {
    value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OperatingSystem, Volume};

    #[test]
    fn test_orphaned_location_rejected() {
        let zone = Location::new(LocationScope::Zone, "z", "", None);
        assert_eq!(
            validate_location(&zone),
            Err(ValidationError::OrphanedLocation {
                id: "z".to_string(),
                scope: LocationScope::Zone,
            })
        );
    }

    #[test]
    fn test_orphan_deep_in_ancestry_rejected() {
        let region = Location::new(LocationScope::Region, "r", "", None);
        let zone = Location::child_of(&region, LocationScope::Zone, "z", "");
        assert!(matches!(
            validate_location(&zone),
            Err(ValidationError::OrphanedLocation { .. })
        ));
    }

    #[test]
    fn test_provider_with_parent_rejected() {
        let root = Location::provider("a", "");
        let bad = Location::new(LocationScope::Provider, "b", "", Some(root));
        assert!(matches!(
            validate_location(&bad),
            Err(ValidationError::ProviderWithParent { .. })
        ));
    }

    #[test]
    fn test_well_formed_tree_accepted() {
        let root = Location::provider("p", "");
        let region = Location::child_of(&root, LocationScope::Region, "r", "");
        assert!(validate_location(&root).is_ok());
        assert!(validate_location(&region).is_ok());
    }

    #[test]
    fn test_composite_image_id() {
        let root = Location::provider("p", "");
        let region = Location::child_of(&root, LocationScope::Region, "r", "");
        let image = Image::builder("ami-1", OperatingSystem::default())
            .location(region)
            .build();
        assert_eq!(image.id(), "r/ami-1");
        assert!(validate_image_id(&image).is_ok());
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let hardware = Hardware::builder("m1")
            .cores(2.0, 1.0)
            .volume(Volume::new(-1.0))
            .build();
        assert_eq!(
            validate_hardware(&hardware),
            Err(ValidationError::NegativeCapacity {
                hardware_id: "m1".to_string(),
                field: "volume size".to_string(),
            })
        );
    }
}
