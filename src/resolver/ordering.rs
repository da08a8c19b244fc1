// Copyright (c) 2025 - Cowboy AI, Inc.
//! Image choice and hardware ranking
//!
//! Both choices are deterministic for a given catalog order. Among equal
//! candidates the one seen first always wins.

use std::cmp::Ordering;

use crate::domain::{Hardware, Image};
use crate::selection::HardwareRanking;

/// Compare by (cores, ram, total disk)
pub fn by_size(left: &Hardware, right: &Hardware) -> Ordering {
    left.cpu_cores()
        .total_cmp(&right.cpu_cores())
        .then(left.ram().cmp(&right.ram()))
        .then(left.total_disk().total_cmp(&right.total_disk()))
}

/// Compare by cores × speed, then by size
pub fn by_speed(left: &Hardware, right: &Hardware) -> Ordering {
    left.cores_and_speed()
        .total_cmp(&right.cores_and_speed())
        .then_with(|| by_size(left, right))
}

/// Greatest element under `cmp`; the first one wins among equals
fn first_max<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Option<&'a T>
where
    T: 'a,
{
    items.into_iter().reduce(|best, item| {
        if cmp(item, best) == Ordering::Greater {
            item
        } else {
            best
        }
    })
}

/// Pick one hardware profile from `candidates` (catalog order)
pub fn rank_hardware<'a>(
    candidates: impl IntoIterator<Item = &'a Hardware>,
    ranking: HardwareRanking,
) -> Option<&'a Hardware> {
    match ranking {
        HardwareRanking::None => candidates.into_iter().next(),
        HardwareRanking::Smallest => first_max(candidates, |a, b| by_size(b, a)),
        HardwareRanking::Biggest => first_max(candidates, by_size),
        HardwareRanking::Fastest => first_max(candidates, by_speed),
    }
}

/// Pick one image from `candidates` (catalog order)
///
/// Unless 64-bit was explicitly refused, the first 64-bit image wins;
/// otherwise the first image wins.
pub fn choose_image<'a>(candidates: &[&'a Image], os_64_bit: Option<bool>) -> Option<&'a Image> {
    let prefer_64_bit = os_64_bit != Some(false);
    let preferred = candidates
        .iter()
        .find(|image| prefer_64_bit && image.operating_system().is_64_bit);
    preferred.or_else(|| candidates.first()).copied()
}
