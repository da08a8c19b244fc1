// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Location Compatibility
//!
//! Every location is drawn from one fixed chain
//! `PROVIDER > REGION > ZONE > HOST` plus a sibling region, so the expected
//! answer can be computed from chain depth alone.

use cim_compute::domain::{is_compatible, Location, LocationScope};
use cim_compute::ComputeError;
use proptest::prelude::*;

// ============================================================================
// Location Generators
// ============================================================================

/// The chain, widest first
fn chain() -> Vec<Location> {
    let provider = Location::provider("p", "provider");
    let region = Location::child_of(&provider, LocationScope::Region, "r", "region");
    let zone = Location::child_of(&region, LocationScope::Zone, "z", "zone");
    let host = Location::child_of(&zone, LocationScope::Host, "h", "host");
    vec![provider, region, zone, host]
}

fn sibling_region() -> Location {
    Location::child_of(&chain()[0], LocationScope::Region, "r2", "other region")
}

fn depth() -> impl Strategy<Value = usize> {
    0usize..4
}

fn non_provider_scope() -> impl Strategy<Value = LocationScope> {
    prop_oneof![
        Just(LocationScope::Region),
        Just(LocationScope::Zone),
        Just(LocationScope::Host),
    ]
}

fn orphan(scope: LocationScope) -> Location {
    Location::new(scope, "orphan", "no parent", None)
}

proptest! {
    /// An absent candidate fits every target
    #[test]
    fn prop_absent_candidate_is_compatible(d in depth()) {
        let chain = chain();
        prop_assert!(is_compatible(None, Some(&chain[d])).unwrap());
    }

    /// An absent target admits every candidate
    #[test]
    fn prop_absent_reference_is_compatible(d in depth()) {
        let chain = chain();
        prop_assert!(is_compatible(Some(&chain[d]), None).unwrap());
    }

    /// Every location fits itself
    #[test]
    fn prop_compatibility_is_reflexive(d in depth()) {
        let chain = chain();
        prop_assert!(is_compatible(Some(&chain[d]), Some(&chain[d])).unwrap());
    }

    /// A candidate fits when it is the target or one of its two nearest ancestors
    #[test]
    fn prop_compatibility_follows_ancestry(candidate in depth(), reference in depth()) {
        let chain = chain();
        let expected = candidate <= reference && reference - candidate <= 2;
        prop_assert_eq!(
            is_compatible(Some(&chain[candidate]), Some(&chain[reference])).unwrap(),
            expected,
            "candidate depth {} reference depth {}", candidate, reference
        );
    }

    /// Nothing below the provider crosses into a sibling region
    #[test]
    fn prop_sibling_branches_are_incompatible(d in 1usize..4) {
        let chain = chain();
        let sibling = sibling_region();
        prop_assert!(!is_compatible(Some(&chain[d]), Some(&sibling)).unwrap());
        prop_assert!(!is_compatible(Some(&sibling), Some(&chain[d])).unwrap());
    }

    /// Orphaned catalog data is an invalid state
    #[test]
    fn prop_orphan_candidate_is_invalid_state(scope in non_provider_scope(), d in depth()) {
        let chain = chain();
        let err = is_compatible(Some(&orphan(scope)), Some(&chain[d])).unwrap_err();
        prop_assert!(matches!(err, ComputeError::InvalidState(_)), "got {:?}", err);
    }

    /// An orphaned target is the caller's mistake
    #[test]
    fn prop_orphan_reference_is_invalid_argument(scope in non_provider_scope(), d in depth()) {
        let chain = chain();
        let err = is_compatible(Some(&chain[d]), Some(&orphan(scope))).unwrap_err();
        prop_assert!(matches!(err, ComputeError::InvalidArgument(_)), "got {:?}", err);

        let err = is_compatible(None, Some(&orphan(scope))).unwrap_err();
        prop_assert!(matches!(err, ComputeError::InvalidArgument(_)), "got {:?}", err);
    }
}
