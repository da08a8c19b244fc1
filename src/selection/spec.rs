// Copyright (c) 2025 - Cowboy AI, Inc.
//! Template Spec Text Form
//!
//! A compact `key=value,key=value` rendering of [`SelectionCriteria`],
//! suitable for configuration files and command lines:
//!
//! ```text
//! hardwareId=m1.small,osFamily=UBUNTU,osVersionMatches=22\.04,os64Bit=true
//! ```
//!
//! # Rules
//!
//! - Pairs are separated by `,` and trimmed; keys are case-sensitive
//! - A comma starts a new pair only when a `key=` follows it, so values
//!   may hold commas (`osVersionMatches=\d{1,2}`); a value can never hold
//!   `=`
//! - `minCores` and `minDisk` must be finite and not negative
//! - Empty text is a valid spec with no entries
//! - Entries are applied in text order, so the last-write-wins rules of
//!   [`SelectionCriteria`] apply (a later `imageId` drops earlier
//!   descriptors)

use std::fmt;
use std::str::FromStr;

use super::criteria::{check_minimum, SelectionCriteria};
use crate::domain::OsFamily;
use crate::errors::{ComputeError, ComputeResult};

/// One parsed `key=value` pair
#[derive(Debug, Clone, PartialEq)]
pub enum SpecEntry {
    HardwareId(String),
    MinCores(f64),
    MinRam(u32),
    MinDisk(f64),
    HypervisorMatches(String),
    ImageId(String),
    ImageNameMatches(String),
    OsFamily(OsFamily),
    OsVersionMatches(String),
    Os64Bit(bool),
    OsArchMatches(String),
    OsDescriptionMatches(String),
    LocationId(String),
}

impl SpecEntry {
    pub fn key(&self) -> &'static str {
        match self {
            Self::HardwareId(_) => "hardwareId",
            Self::MinCores(_) => "minCores",
            Self::MinRam(_) => "minRam",
            Self::MinDisk(_) => "minDisk",
            Self::HypervisorMatches(_) => "hypervisorMatches",
            Self::ImageId(_) => "imageId",
            Self::ImageNameMatches(_) => "imageNameMatches",
            Self::OsFamily(_) => "osFamily",
            Self::OsVersionMatches(_) => "osVersionMatches",
            Self::Os64Bit(_) => "os64Bit",
            Self::OsArchMatches(_) => "osArchMatches",
            Self::OsDescriptionMatches(_) => "osDescriptionMatches",
            Self::LocationId(_) => "locationId",
        }
    }

    fn parse(key: &str, value: &str) -> ComputeResult<Self> {
        let text = || value.to_string();
        let entry = match key {
            "hardwareId" => Self::HardwareId(text()),
            "minCores" => Self::MinCores(check_minimum(key, parse_number(key, value)?)?),
            "minRam" => Self::MinRam(parse_number(key, value)?),
            "minDisk" => Self::MinDisk(check_minimum(key, parse_number(key, value)?)?),
            "hypervisorMatches" => Self::HypervisorMatches(text()),
            "imageId" => Self::ImageId(text()),
            "imageNameMatches" => Self::ImageNameMatches(text()),
            "osFamily" => Self::OsFamily(OsFamily::parse(value).ok_or_else(|| {
                ComputeError::InvalidArgument(format!("osFamily {} is not a known family", value))
            })?),
            "osVersionMatches" => Self::OsVersionMatches(text()),
            "os64Bit" => Self::Os64Bit(parse_number(key, value)?),
            "osArchMatches" => Self::OsArchMatches(text()),
            "osDescriptionMatches" => Self::OsDescriptionMatches(text()),
            "locationId" => Self::LocationId(text()),
            unknown => {
                return Err(ComputeError::InvalidArgument(format!(
                    "unknown key {}",
                    unknown
                )))
            }
        };
        Ok(entry)
    }

    fn apply(&self, criteria: SelectionCriteria) -> SelectionCriteria {
        match self {
            Self::HardwareId(v) => criteria.hardware_id(v.as_str()),
            Self::MinCores(v) => criteria.min_cores(*v),
            Self::MinRam(v) => criteria.min_ram(*v),
            Self::MinDisk(v) => criteria.min_disk(*v),
            Self::HypervisorMatches(v) => criteria.hypervisor_matches(v.as_str()),
            Self::ImageId(v) => criteria.image_id(v.as_str()),
            Self::ImageNameMatches(v) => criteria.image_name_matches(v.as_str()),
            Self::OsFamily(v) => criteria.os_family(*v),
            Self::OsVersionMatches(v) => criteria.os_version_matches(v.as_str()),
            Self::Os64Bit(v) => criteria.os_64_bit(*v),
            Self::OsArchMatches(v) => criteria.os_arch_matches(v.as_str()),
            Self::OsDescriptionMatches(v) => criteria.os_description_matches(v.as_str()),
            Self::LocationId(v) => criteria.location_id(v.as_str()),
        }
    }
}

impl fmt::Display for SpecEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.key())?;
        match self {
            Self::MinCores(v) | Self::MinDisk(v) => write!(f, "{}", v),
            Self::MinRam(v) => write!(f, "{}", v),
            Self::OsFamily(v) => write!(f, "{}", v),
            Self::Os64Bit(v) => write!(f, "{}", v),
            Self::HardwareId(v)
            | Self::HypervisorMatches(v)
            | Self::ImageId(v)
            | Self::ImageNameMatches(v)
            | Self::OsVersionMatches(v)
            | Self::OsArchMatches(v)
            | Self::OsDescriptionMatches(v)
            | Self::LocationId(v) => f.write_str(v),
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> ComputeResult<T> {
    value.parse().map_err(|_| {
        ComputeError::InvalidArgument(format!("value {} of key {} is not valid", value, key))
    })
}

/// Split on the commas that begin a new pair; other commas stay in the value
fn split_pairs(text: &str) -> Vec<String> {
    let mut pairs: Vec<String> = Vec::new();
    for piece in text.split(',') {
        match pairs.last_mut() {
            Some(last) if !starts_pair(piece) => {
                last.push(',');
                last.push_str(piece);
            }
            _ => pairs.push(piece.to_string()),
        }
    }
    pairs
}

/// Blank, or `key=...` with an alphanumeric key
fn starts_pair(piece: &str) -> bool {
    let piece = piece.trim_start();
    piece.is_empty()
        || piece.split_once('=').is_some_and(|(key, _)| {
            let key = key.trim_end();
            !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

/// Parsed template spec, kept in text order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSpec {
    entries: Vec<SpecEntry>,
}

impl TemplateSpec {
    /// Parse `key=value` pairs separated by commas
    pub fn parse(text: &str) -> ComputeResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let entries = split_pairs(text)
            .iter()
            .map(|pair| {
                let pair = pair.trim();
                if pair.is_empty() {
                    return Err(ComputeError::InvalidArgument(format!(
                        "blank key-value pair in {}",
                        text
                    )));
                }
                let parts: Vec<&str> = pair.split('=').collect();
                let [key, value] = parts.as_slice() else {
                    return Err(ComputeError::InvalidArgument(format!(
                        "key-value pair {} does not have exactly one '='",
                        pair
                    )));
                };
                let (key, value) = (key.trim(), value.trim());
                if value.is_empty() {
                    return Err(ComputeError::InvalidArgument(format!(
                        "value of key {} is missing",
                        key
                    )));
                }
                SpecEntry::parse(key, value)
            })
            .collect::<ComputeResult<Vec<_>>>()?;

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SpecEntry] {
        &self.entries
    }

    /// Apply every entry to `criteria`, in text order
    pub fn apply_to(&self, criteria: SelectionCriteria) -> SelectionCriteria {
        self.entries
            .iter()
            .fold(criteria, |criteria, entry| entry.apply(criteria))
    }

    pub fn to_criteria(&self) -> SelectionCriteria {
        self.apply_to(SelectionCriteria::new())
    }
}

impl FromStr for TemplateSpec {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TemplateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.entries.iter().map(ToString::to_string).collect();
        f.write_str(&pairs.join(","))
    }
}
