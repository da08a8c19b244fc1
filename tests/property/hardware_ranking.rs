// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Hardware Ranking
//!
//! Rankings are checked against a brute-force scan of the same catalog.
//! Small value ranges force frequent ties so the first-wins rule is
//! exercised.

use std::cmp::Ordering;

use cim_compute::domain::{Hardware, Volume};
use cim_compute::resolver::{by_size, by_speed, rank_hardware};
use cim_compute::selection::HardwareRanking;
use proptest::prelude::*;

// ============================================================================
// Catalog Generators
// ============================================================================

fn profile() -> impl Strategy<Value = (u8, u8, u8, u8)> {
    (1u8..4, 1u8..3, 1u8..3, 1u8..3)
}

fn catalog() -> impl Strategy<Value = Vec<Hardware>> {
    prop::collection::vec(profile(), 1..12).prop_map(|profiles| {
        profiles
            .into_iter()
            .enumerate()
            .map(|(i, (cores, speed, ram, disk))| {
                Hardware::builder(format!("hw-{}", i))
                    .cores(f64::from(cores), f64::from(speed))
                    .ram(u32::from(ram) * 1024)
                    .volume(Volume::new(f64::from(disk) * 10.0))
                    .build()
            })
            .collect()
    })
}

/// Index of the first element no other element beats under `cmp`
fn first_best(catalog: &[Hardware], cmp: impl Fn(&Hardware, &Hardware) -> Ordering) -> usize {
    (0..catalog.len())
        .find(|&i| catalog.iter().all(|other| cmp(other, &catalog[i]) != Ordering::Greater))
        .unwrap_or(0)
}

fn chosen_index(catalog: &[Hardware], ranking: HardwareRanking) -> usize {
    let chosen = rank_hardware(catalog, ranking).unwrap();
    catalog.iter().position(|h| h.id() == chosen.id()).unwrap()
}

proptest! {
    /// Without a ranking, catalog order decides
    #[test]
    fn prop_no_ranking_takes_first(catalog in catalog()) {
        prop_assert_eq!(chosen_index(&catalog, HardwareRanking::None), 0);
    }

    /// Smallest is the first profile nothing is smaller than
    #[test]
    fn prop_smallest_is_first_minimum(catalog in catalog()) {
        let expected = first_best(&catalog, |a, b| by_size(b, a));
        prop_assert_eq!(chosen_index(&catalog, HardwareRanking::Smallest), expected);
    }

    /// Biggest is the first profile nothing is bigger than
    #[test]
    fn prop_biggest_is_first_maximum(catalog in catalog()) {
        let expected = first_best(&catalog, by_size);
        prop_assert_eq!(chosen_index(&catalog, HardwareRanking::Biggest), expected);
    }

    /// Fastest is the first profile nothing is faster than
    #[test]
    fn prop_fastest_is_first_maximum(catalog in catalog()) {
        let expected = first_best(&catalog, by_speed);
        prop_assert_eq!(chosen_index(&catalog, HardwareRanking::Fastest), expected);
    }

    /// An empty catalog yields nothing under any ranking
    #[test]
    fn prop_empty_catalog_yields_none(ranking in prop_oneof![
        Just(HardwareRanking::None),
        Just(HardwareRanking::Smallest),
        Just(HardwareRanking::Biggest),
        Just(HardwareRanking::Fastest),
    ]) {
        prop_assert!(rank_hardware(&[], ranking).is_none());
    }
}
