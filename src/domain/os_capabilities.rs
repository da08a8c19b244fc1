// Copyright (c) 2025 - Cowboy AI, Inc.
//! Operating System Capability Predicates
//!
//! Pure, total classification of an [`OperatingSystem`]. Each predicate
//! uses two tiers:
//!
//! 1. A recognised [`OsFamily`] decides the answer with an exhaustive match.
//! 2. [`OsFamily::Unrecognized`] falls back to a case-insensitive substring
//!    search over the name and description for marker tokens.

use super::operating_system::{OperatingSystem, OsFamily};

/// Package manager family an image ships with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Apt,
    Yum,
    Zypper,
}

/// Whether the name or description mentions any of `tokens`
///
/// Tokens are lowercase. Text is compared lowercased, and once more with
/// whitespace removed so `"Red Hat"` matches `"redhat"`.
fn mentions(os: &OperatingSystem, tokens: &[&str]) -> bool {
    [os.name.as_deref(), os.description.as_deref()]
        .into_iter()
        .flatten()
        .any(|text| {
            let lower = text.to_lowercase();
            let compact: String = lower.chars().filter(|c| !c.is_whitespace()).collect();
            tokens
                .iter()
                .any(|token| lower.contains(token) || compact.contains(token))
        })
}

/// False only for Windows (by family or by name); true otherwise
pub fn is_unix(os: &OperatingSystem) -> bool {
    match os.family {
        OsFamily::Windows => false,
        OsFamily::Unrecognized => !mentions(os, &["windows"]),
        _ => true,
    }
}

pub fn supports_apt(os: &OperatingSystem) -> bool {
    match os.family {
        OsFamily::Debian | OsFamily::Ubuntu => true,
        OsFamily::Unrecognized => mentions(os, &["ubuntu", "debian"]),
        _ => false,
    }
}

pub fn supports_yum(os: &OperatingSystem) -> bool {
    match os.family {
        OsFamily::Centos | OsFamily::AmznLinux | OsFamily::Fedora | OsFamily::Rhel => true,
        OsFamily::Unrecognized => {
            mentions(os, &["centos", "amzn", "amazon linux", "fedora", "rhel", "redhat"])
        }
        _ => false,
    }
}

pub fn supports_zypper(os: &OperatingSystem) -> bool {
    match os.family {
        OsFamily::Suse => true,
        OsFamily::Unrecognized => mentions(os, &["suse", "sles"]),
        _ => false,
    }
}

pub fn is_64_bit(os: &OperatingSystem) -> bool {
    os.is_64_bit
}

/// First package manager the OS supports, checked apt → yum → zypper
pub fn package_manager(os: &OperatingSystem) -> Option<PackageManager> {
    if supports_apt(os) {
        Some(PackageManager::Apt)
    } else if supports_yum(os) {
        Some(PackageManager::Yum)
    } else if supports_zypper(os) {
        Some(PackageManager::Zypper)
    } else {
        None
    }
}
