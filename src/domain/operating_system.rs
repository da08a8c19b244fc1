// Copyright (c) 2025 - Cowboy AI, Inc.
//! Operating System Domain Model
//!
//! Describes the operating system an image boots. Provider catalogs are
//! inconsistent: some report a family, others only a free-text name or
//! description. Both are kept so capability checks can fall back to text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system family taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OsFamily {
    /// Family missing or not recognised by the catalog
    Unrecognized,

    // Windows
    Windows,

    // Debian lineage
    Debian,
    Ubuntu,

    // Red Hat lineage
    Rhel,
    Centos,
    Fedora,
    AmznLinux,
    Oel,
    Scientific,
    CloudLinux,

    // SUSE lineage
    Suse,

    // Other Unix-like
    Gentoo,
    Arch,
    Coreos,
    Freebsd,
    Netbsd,
    Openbsd,
    Solaris,
    Darwin,
    Esx,
}

impl OsFamily {
    /// Every family, in declaration order
    pub const ALL: [OsFamily; 21] = [
        Self::Unrecognized,
        Self::Windows,
        Self::Debian,
        Self::Ubuntu,
        Self::Rhel,
        Self::Centos,
        Self::Fedora,
        Self::AmznLinux,
        Self::Oel,
        Self::Scientific,
        Self::CloudLinux,
        Self::Suse,
        Self::Gentoo,
        Self::Arch,
        Self::Coreos,
        Self::Freebsd,
        Self::Netbsd,
        Self::Openbsd,
        Self::Solaris,
        Self::Darwin,
        Self::Esx,
    ];

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unrecognized => "UNRECOGNIZED",
            Self::Windows => "WINDOWS",
            Self::Debian => "DEBIAN",
            Self::Ubuntu => "UBUNTU",
            Self::Rhel => "RHEL",
            Self::Centos => "CENTOS",
            Self::Fedora => "FEDORA",
            Self::AmznLinux => "AMZN_LINUX",
            Self::Oel => "OEL",
            Self::Scientific => "SCIENTIFIC",
            Self::CloudLinux => "CLOUD_LINUX",
            Self::Suse => "SUSE",
            Self::Gentoo => "GENTOO",
            Self::Arch => "ARCH",
            Self::Coreos => "COREOS",
            Self::Freebsd => "FREEBSD",
            Self::Netbsd => "NETBSD",
            Self::Openbsd => "OPENBSD",
            Self::Solaris => "SOLARIS",
            Self::Darwin => "DARWIN",
            Self::Esx => "ESX",
        }
    }

    /// Parse a family name, tolerating case and common aliases
    ///
    /// Returns `None` for names that are not a family. The literal
    /// `"unrecognized"` parses to [`OsFamily::Unrecognized`].
    pub fn parse(s: &str) -> Option<Self> {
        let family = match s.trim().to_lowercase().replace('-', "_").as_str() {
            "unrecognized" => Self::Unrecognized,
            "windows" | "win" => Self::Windows,
            "debian" => Self::Debian,
            "ubuntu" => Self::Ubuntu,
            "rhel" | "redhat" | "red_hat" => Self::Rhel,
            "centos" => Self::Centos,
            "fedora" => Self::Fedora,
            "amzn_linux" | "amazon_linux" | "amzn" => Self::AmznLinux,
            "oel" | "oracle_linux" => Self::Oel,
            "scientific" => Self::Scientific,
            "cloud_linux" | "cloudlinux" => Self::CloudLinux,
            "suse" | "sles" | "opensuse" => Self::Suse,
            "gentoo" => Self::Gentoo,
            "arch" => Self::Arch,
            "coreos" => Self::Coreos,
            "freebsd" => Self::Freebsd,
            "netbsd" => Self::Netbsd,
            "openbsd" => Self::Openbsd,
            "solaris" => Self::Solaris,
            "darwin" | "macos" => Self::Darwin,
            "esx" | "esxi" => Self::Esx,
            _ => return None,
        };
        Some(family)
    }

    /// Parse leniently; anything unknown becomes [`OsFamily::Unrecognized`]
    pub fn from_name(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Unrecognized)
    }

    pub fn is_recognized(&self) -> bool {
        *self != Self::Unrecognized
    }
}

impl Default for OsFamily {
    fn default() -> Self {
        Self::Unrecognized
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OsFamily {
    fn from(s: &str) -> Self {
        Self::from_name(s)
    }
}

/// Operating system descriptor of an image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingSystem {
    #[serde(default)]
    pub family: OsFamily,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,

    #[serde(default)]
    pub is_64_bit: bool,
}

impl OperatingSystem {
    pub fn new(family: OsFamily) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn is_64_bit(mut self, is_64_bit: bool) -> Self {
        self.is_64_bit = is_64_bit;
        self
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family)?;
        if let Some(version) = &self.version {
            write!(f, " {}", version)?;
        }
        if let Some(arch) = &self.arch {
            write!(f, " ({})", arch)?;
        }
        Ok(())
    }
}
