// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Selection Criteria Groups
//!
//! Random setter sequences are applied to a fresh [`SelectionCriteria`] and
//! checked against the last-write-wins rule of each group.

use cim_compute::domain::OsFamily;
use cim_compute::selection::{HardwareSelection, ImageDescriptors, ImageSelection};
use cim_compute::SelectionCriteria;
use proptest::prelude::*;

// ============================================================================
// Setter Generators
// ============================================================================

#[derive(Debug, Clone)]
enum Setter {
    ImageId(String),
    ImageName(String),
    OsFamily(OsFamily),
    Os64Bit(bool),
    HardwareId(String),
    Hypervisor(String),
    MinRam(u32),
    Location(String),
}

impl Setter {
    fn apply(&self, criteria: SelectionCriteria) -> SelectionCriteria {
        match self {
            Setter::ImageId(v) => criteria.image_id(v.clone()),
            Setter::ImageName(v) => criteria.image_name_matches(v.clone()),
            Setter::OsFamily(v) => criteria.os_family(*v),
            Setter::Os64Bit(v) => criteria.os_64_bit(*v),
            Setter::HardwareId(v) => criteria.hardware_id(v.clone()),
            Setter::Hypervisor(v) => criteria.hypervisor_matches(v.clone()),
            Setter::MinRam(v) => criteria.min_ram(*v),
            Setter::Location(v) => criteria.location_id(v.clone()),
        }
    }

    /// Descriptor setters, applied directly to a descriptor set
    fn describe(&self, descriptors: &mut ImageDescriptors) {
        match self {
            Setter::ImageName(v) => descriptors.name = Some(v.clone()),
            Setter::OsFamily(v) => descriptors.os_family = Some(*v),
            Setter::Os64Bit(v) => descriptors.os_64_bit = Some(*v),
            _ => {}
        }
    }

    fn is_descriptor(&self) -> bool {
        matches!(self, Setter::ImageName(_) | Setter::OsFamily(_) | Setter::Os64Bit(_))
    }
}

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}"
}

fn family() -> impl Strategy<Value = OsFamily> {
    prop::sample::select(OsFamily::ALL.to_vec())
}

fn setter() -> impl Strategy<Value = Setter> {
    prop_oneof![
        ident().prop_map(Setter::ImageId),
        ident().prop_map(Setter::ImageName),
        family().prop_map(Setter::OsFamily),
        any::<bool>().prop_map(Setter::Os64Bit),
        ident().prop_map(Setter::HardwareId),
        ident().prop_map(Setter::Hypervisor),
        (1u32..65536).prop_map(Setter::MinRam),
        ident().prop_map(Setter::Location),
    ]
}

fn setters() -> impl Strategy<Value = Vec<Setter>> {
    prop::collection::vec(setter(), 0..24)
}

fn build(setters: &[Setter]) -> SelectionCriteria {
    setters
        .iter()
        .fold(SelectionCriteria::new(), |criteria, s| s.apply(criteria))
}

proptest! {
    /// The image group ends in whichever mode was written last
    #[test]
    fn prop_image_group_is_last_write_wins(setters in setters()) {
        let criteria = build(&setters);
        let last_id = setters.iter().rposition(|s| matches!(s, Setter::ImageId(_)));
        let last_descriptor = setters.iter().rposition(Setter::is_descriptor);

        match (last_id, last_descriptor) {
            (Some(i), d) if d.map_or(true, |d| d < i) => {
                let Setter::ImageId(id) = &setters[i] else { unreachable!() };
                prop_assert_eq!(criteria.image, ImageSelection::ById(id.clone()));
            }
            _ => {
                // Only descriptor writes after the last id survive
                let start = last_id.map_or(0, |i| i + 1);
                let mut expected = ImageDescriptors::default();
                for s in &setters[start..] {
                    s.describe(&mut expected);
                }
                prop_assert_eq!(criteria.image, ImageSelection::ByDescriptors(expected));
            }
        }
    }

    /// A trailing image id discards every descriptor
    #[test]
    fn prop_image_id_clears_descriptors(setters in setters(), id in ident()) {
        let criteria = build(&setters).image_id(id.clone());
        prop_assert_eq!(criteria.image.id(), Some(id.as_str()));
        prop_assert!(criteria.image.descriptors().is_none());
        prop_assert_eq!(criteria.image_description(), None);
        prop_assert_eq!(criteria.os_64_bit_constraint(), None);
    }

    /// Hardware id and hypervisor pattern replace each other
    #[test]
    fn prop_hardware_group_is_last_write_wins(setters in setters()) {
        let criteria = build(&setters);
        let expected = setters
            .iter()
            .rev()
            .find_map(|s| match s {
                Setter::HardwareId(v) => Some(HardwareSelection::ById(v.clone())),
                Setter::Hypervisor(v) => Some(HardwareSelection::ByHypervisor(v.clone())),
                _ => None,
            })
            .unwrap_or_default();
        prop_assert_eq!(criteria.hardware, expected);
    }

    /// Setters outside a group never clear anything
    #[test]
    fn prop_scalar_setters_are_independent(setters in setters()) {
        let criteria = build(&setters);
        let min_ram = setters
            .iter()
            .rev()
            .find_map(|s| match s {
                Setter::MinRam(v) => Some(*v),
                _ => None,
            })
            .unwrap_or(0);
        let location = setters.iter().rev().find_map(|s| match s {
            Setter::Location(v) => Some(v.clone()),
            _ => None,
        });
        prop_assert_eq!(criteria.min_ram, min_ram);
        prop_assert_eq!(criteria.location_id, location);
    }

    /// Any written constraint makes the criteria constrained
    #[test]
    fn prop_non_empty_setters_constrain(setters in prop::collection::vec(setter(), 1..8)) {
        prop_assert!(!build(&setters).is_unconstrained());
    }
}
