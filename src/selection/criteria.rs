// Copyright (c) 2025 - Cowboy AI, Inc.
//! Selection Criteria
//!
//! Declarative constraints a caller accumulates before resolution.
//!
//! # Invariants
//!
//! - Images are chosen either by exact id or by descriptors, never both.
//!   [`ImageSelection`] makes the two modes alternatives of one enum.
//! - Hardware is chosen by exact id, by hypervisor pattern, or not at all
//!   ([`HardwareSelection`]).
//!
//! # Rules
//!
//! Every setter is last-write-wins within its group:
//! - `image_id` replaces the whole descriptor set
//! - any descriptor setter while an id is active drops the id and starts
//!   from an empty descriptor set
//! - `hardware_id` and `hypervisor_matches` replace each other
//!
//! No other setter clears anything.

use std::fmt;

use crate::domain::{Hardware, Image, ImagePredicate, OsFamily, Template, TemplateOptions};
use crate::errors::{ComputeError, ComputeResult};

/// Image descriptor constraints, combined with logical AND
///
/// Text fields hold regular expressions. A field matches when the value
/// equals the pattern, contains it, or fully matches it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageDescriptors {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub os_family: Option<OsFamily>,
    pub os_name: Option<String>,
    pub os_description: Option<String>,
    pub os_version: Option<String>,
    pub os_arch: Option<String>,
    pub os_64_bit: Option<bool>,
    pub predicate: Option<ImagePredicate>,
}

impl ImageDescriptors {
    /// No descriptor is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// How the image is selected
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSelection {
    /// Exact image id
    ById(String),
    /// Conjunction of descriptors (possibly empty)
    ByDescriptors(ImageDescriptors),
}

impl Default for ImageSelection {
    fn default() -> Self {
        Self::ByDescriptors(ImageDescriptors::default())
    }
}

impl ImageSelection {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::ById(id) => Some(id),
            Self::ByDescriptors(_) => None,
        }
    }

    pub fn descriptors(&self) -> Option<&ImageDescriptors> {
        match self {
            Self::ById(_) => None,
            Self::ByDescriptors(descriptors) => Some(descriptors),
        }
    }
}

/// How the hardware profile is selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HardwareSelection {
    #[default]
    Any,
    /// Exact hardware id
    ById(String),
    /// Hypervisor regular expression
    ByHypervisor(String),
}

impl HardwareSelection {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::ById(id) => Some(id),
            _ => None,
        }
    }

    pub fn hypervisor(&self) -> Option<&str> {
        match self {
            Self::ByHypervisor(pattern) => Some(pattern),
            _ => None,
        }
    }
}

/// Ordering applied to the surviving hardware profiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HardwareRanking {
    /// First compatible profile in catalog order
    #[default]
    None,
    /// Minimum by (cores, ram, disk)
    Smallest,
    /// Maximum by (cores, ram, disk)
    Biggest,
    /// Maximum by cores × speed, then by size
    Fastest,
}

impl HardwareRanking {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Smallest => "smallest",
            Self::Biggest => "biggest",
            Self::Fastest => "fastest",
        }
    }
}

impl fmt::Display for HardwareRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated request for a template
///
/// Built with consuming setters:
///
/// ```
/// use cim_compute::selection::SelectionCriteria;
/// use cim_compute::domain::OsFamily;
///
/// let criteria = SelectionCriteria::new()
///     .os_family(OsFamily::Ubuntu)
///     .os_64_bit(true)
///     .min_ram(2048)
///     .smallest();
/// assert!(!criteria.is_unconstrained());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionCriteria {
    pub image: ImageSelection,
    pub hardware: HardwareSelection,
    pub location_id: Option<String>,
    /// Inclusive lower bound in megabytes
    pub min_ram: u32,
    /// Inclusive lower bound on core count
    pub min_cores: f64,
    /// Inclusive lower bound on total disk in gigabytes
    pub min_disk: f64,
    pub ranking: HardwareRanking,
    /// Launch options; never a constraint on the catalog
    pub options: Option<TemplateOptions>,
}

impl SelectionCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `set` to the descriptor set, leaving id mode if it was active
    fn with_descriptor(mut self, set: impl FnOnce(&mut ImageDescriptors)) -> Self {
        let mut descriptors = match std::mem::take(&mut self.image) {
            ImageSelection::ByDescriptors(descriptors) => descriptors,
            ImageSelection::ById(_) => ImageDescriptors::default(),
        };
        set(&mut descriptors);
        self.image = ImageSelection::ByDescriptors(descriptors);
        self
    }

    // ========================================================================
    // Image group
    // ========================================================================

    /// Select the image by exact id, discarding every descriptor
    pub fn image_id(mut self, id: impl Into<String>) -> Self {
        self.image = ImageSelection::ById(id.into());
        self
    }

    pub fn image_name_matches(self, pattern: impl Into<String>) -> Self {
        self.with_descriptor(|d| d.name = Some(pattern.into()))
    }

    pub fn image_description_matches(self, pattern: impl Into<String>) -> Self {
        self.with_descriptor(|d| d.description = Some(pattern.into()))
    }

    pub fn image_version_matches(self, pattern: impl Into<String>) -> Self {
        self.with_descriptor(|d| d.version = Some(pattern.into()))
    }

    pub fn os_family(self, family: OsFamily) -> Self {
        self.with_descriptor(|d| d.os_family = Some(family))
    }

    pub fn os_name_matches(self, pattern: impl Into<String>) -> Self {
        self.with_descriptor(|d| d.os_name = Some(pattern.into()))
    }

    pub fn os_description_matches(self, pattern: impl Into<String>) -> Self {
        self.with_descriptor(|d| d.os_description = Some(pattern.into()))
    }

    pub fn os_version_matches(self, pattern: impl Into<String>) -> Self {
        self.with_descriptor(|d| d.os_version = Some(pattern.into()))
    }

    pub fn os_arch_matches(self, pattern: impl Into<String>) -> Self {
        self.with_descriptor(|d| d.os_arch = Some(pattern.into()))
    }

    pub fn os_64_bit(self, is_64_bit: bool) -> Self {
        self.with_descriptor(|d| d.os_64_bit = Some(is_64_bit))
    }

    /// Custom predicate, ANDed with the other descriptors
    pub fn image_matches(self, predicate: ImagePredicate) -> Self {
        self.with_descriptor(|d| d.predicate = Some(predicate))
    }

    // ========================================================================
    // Hardware group
    // ========================================================================

    pub fn hardware_id(mut self, id: impl Into<String>) -> Self {
        self.hardware = HardwareSelection::ById(id.into());
        self
    }

    pub fn hypervisor_matches(mut self, pattern: impl Into<String>) -> Self {
        self.hardware = HardwareSelection::ByHypervisor(pattern.into());
        self
    }

    pub fn min_ram(mut self, megabytes: u32) -> Self {
        self.min_ram = megabytes;
        self
    }

    pub fn min_cores(mut self, cores: f64) -> Self {
        self.min_cores = cores;
        self
    }

    pub fn min_disk(mut self, gigabytes: f64) -> Self {
        self.min_disk = gigabytes;
        self
    }

    pub fn ranking(mut self, ranking: HardwareRanking) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn smallest(self) -> Self {
        self.ranking(HardwareRanking::Smallest)
    }

    pub fn biggest(self) -> Self {
        self.ranking(HardwareRanking::Biggest)
    }

    pub fn fastest(self) -> Self {
        self.ranking(HardwareRanking::Fastest)
    }

    // ========================================================================
    // Location and options
    // ========================================================================

    pub fn location_id(mut self, id: impl Into<String>) -> Self {
        self.location_id = Some(id.into());
        self
    }

    pub fn options(mut self, options: TemplateOptions) -> Self {
        self.options = Some(options);
        self
    }

    // ========================================================================
    // Seeding from existing resources
    // ========================================================================

    /// Constrain to images that look like `image`
    ///
    /// Sets every descriptor the image carries. Name, description and
    /// version become anchored literal patterns. The image's location is
    /// adopted only when no location id is set yet.
    pub fn from_image(mut self, image: &Image) -> Self {
        if self.location_id.is_none() {
            self.location_id = image.location().map(|l| l.id().to_string());
        }

        let os = image.operating_system();
        if os.family.is_recognized() {
            self = self.os_family(os.family);
        }
        if let Some(name) = &os.name {
            self = self.os_name_matches(literal(name));
        }
        if let Some(description) = &os.description {
            self = self.os_description_matches(literal(description));
        }
        if let Some(version) = &os.version {
            self = self.os_version_matches(literal(version));
        }
        if let Some(arch) = &os.arch {
            self = self.os_arch_matches(literal(arch));
        }
        self = self.os_64_bit(os.is_64_bit);

        if let Some(name) = image.name() {
            self = self.image_name_matches(literal(name));
        }
        if let Some(description) = image.description() {
            self = self.image_description_matches(literal(description));
        }
        if let Some(version) = image.version() {
            self = self.image_version_matches(literal(version));
        }
        self
    }

    /// Require at least the capacity of `hardware`, on the same hypervisor
    pub fn from_hardware(mut self, hardware: &Hardware) -> Self {
        if self.location_id.is_none() {
            self.location_id = hardware.location().map(|l| l.id().to_string());
        }
        self.min_cores = hardware.cpu_cores();
        self.min_ram = hardware.ram();
        self.min_disk = hardware.total_disk();
        if let Some(hypervisor) = hardware.hypervisor() {
            self = self.hypervisor_matches(literal(hypervisor));
        }
        self
    }

    /// Seed location, image, hardware and options from `template`
    pub fn from_template(mut self, template: &Template) -> Self {
        if self.location_id.is_none() {
            self.location_id = template.location().map(|l| l.id().to_string());
        }
        self = self.from_hardware(template.hardware());
        self = self.from_image(template.image());
        self.options = Some(template.options().clone());
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Nothing constrains the catalog; options alone do not count
    pub fn is_unconstrained(&self) -> bool {
        let no_image = match &self.image {
            ImageSelection::ById(_) => false,
            ImageSelection::ByDescriptors(descriptors) => descriptors.is_empty(),
        };
        no_image
            && self.hardware == HardwareSelection::Any
            && self.location_id.is_none()
            && self.min_ram == 0
            && self.min_cores == 0.0
            && self.min_disk == 0.0
            && self.ranking == HardwareRanking::None
    }

    /// Reject minimums no hardware figure can be compared against
    ///
    /// `minCores` and `minDisk` must be finite and not negative.
    pub fn validate(&self) -> ComputeResult<()> {
        check_minimum("minCores", self.min_cores)?;
        check_minimum("minDisk", self.min_disk)?;
        Ok(())
    }

    /// Image description pattern, if descriptor mode has one
    pub fn image_description(&self) -> Option<&str> {
        self.image.descriptors().and_then(|d| d.description.as_deref())
    }

    /// Explicit 64-bit constraint, if any
    pub fn os_64_bit_constraint(&self) -> Option<bool> {
        self.image.descriptors().and_then(|d| d.os_64_bit)
    }
}

/// `value` if it is a usable lower bound for `key`
pub(crate) fn check_minimum(key: &str, value: f64) -> ComputeResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ComputeError::InvalidArgument(format!(
            "{} must be a finite non-negative number, got {}",
            key, value
        )))
    }
}

/// Anchored pattern matching `text` literally
fn literal(text: &str) -> String {
    format!("^{}$", regex::escape(text))
}

/// Bounded field-by-field dump of the scalar criteria; unset fields omitted
impl fmt::Display for SelectionCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<String> = Vec::new();
        let mut push = |key: &str, value: &dyn fmt::Display| fields.push(format!("{}={}", key, value));

        match &self.image {
            ImageSelection::ById(id) => push("imageId", id),
            ImageSelection::ByDescriptors(d) => {
                if let Some(v) = &d.name {
                    push("imageName", v);
                }
                if let Some(v) = &d.description {
                    push("imageDescription", v);
                }
                if let Some(v) = &d.version {
                    push("imageVersion", v);
                }
                if let Some(v) = &d.os_family {
                    push("osFamily", v);
                }
                if let Some(v) = &d.os_name {
                    push("osName", v);
                }
                if let Some(v) = &d.os_description {
                    push("osDescription", v);
                }
                if let Some(v) = &d.os_version {
                    push("osVersion", v);
                }
                if let Some(v) = &d.os_arch {
                    push("osArch", v);
                }
                if let Some(v) = &d.os_64_bit {
                    push("os64Bit", v);
                }
                if let Some(v) = &d.predicate {
                    push("imagePredicate", v);
                }
            }
        }
        match &self.hardware {
            HardwareSelection::Any => {}
            HardwareSelection::ById(id) => push("hardwareId", id),
            HardwareSelection::ByHypervisor(pattern) => push("hypervisor", pattern),
        }
        if let Some(v) = &self.location_id {
            push("locationId", v);
        }
        if self.min_ram > 0 {
            push("minRam", &self.min_ram);
        }
        if self.min_cores > 0.0 {
            push("minCores", &self.min_cores);
        }
        if self.min_disk > 0.0 {
            push("minDisk", &self.min_disk);
        }
        if self.ranking != HardwareRanking::None {
            push("ranking", &self.ranking);
        }

        write!(f, "[{}]", fields.join(", "))
    }
}
