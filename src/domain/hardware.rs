// Copyright (c) 2025 - Cowboy AI, Inc.
//! Hardware Profile Domain Model
//!
//! A hardware profile is a provider's sizing offer (CPU, RAM, disk). Each
//! profile declares which images it can boot through [`ImageSupport`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::image::{Image, ImagePredicate};
use super::location::Location;

/// Storage volume attached to a hardware profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Size in gigabytes
    pub size_gb: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    #[serde(default)]
    pub boot: bool,
}

impl Volume {
    pub fn new(size_gb: f64) -> Self {
        Self {
            size_gb,
            device: None,
            boot: false,
        }
    }

    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    pub fn boot(mut self) -> Self {
        self.boot = true;
        self
    }
}

/// Which images a hardware profile can boot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSupport {
    /// Every image
    #[default]
    Any,

    /// Only images whose OS is 64-bit
    Only64Bit,

    /// Only the listed image ids
    IdIn { ids: BTreeSet<String> },

    /// Caller-supplied rule; not representable in catalog JSON
    ///
    /// Deserialization never produces it and serializing it is an error.
    #[serde(skip)]
    Custom(ImagePredicate),
}

impl ImageSupport {
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::IdIn {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn supports(&self, image: &Image) -> bool {
        match self {
            Self::Any => true,
            Self::Only64Bit => image.operating_system().is_64_bit,
            Self::IdIn { ids } => ids.contains(image.id()),
            Self::Custom(predicate) => predicate.test(image),
        }
    }
}

impl fmt::Display for ImageSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any()"),
            Self::Only64Bit => f.write_str("is64Bit()"),
            Self::IdIn { ids } => {
                let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                write!(f, "idIn([{}])", ids.join(", "))
            }
            Self::Custom(predicate) => write!(f, "{}", predicate),
        }
    }
}

/// Hardware profile offered by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Location>,

    /// RAM in megabytes
    #[serde(default)]
    ram: u32,

    #[serde(default)]
    cpu_cores: f64,

    /// Relative speed per core
    #[serde(default)]
    processor_speed: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    volumes: Vec<Volume>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    hypervisor: Option<String>,

    #[serde(default)]
    supports_image: ImageSupport,
}

impl Hardware {
    pub fn builder(id: impl Into<String>) -> HardwareBuilder {
        HardwareBuilder {
            hardware: Hardware {
                id: id.into(),
                name: None,
                location: None,
                ram: 0,
                cpu_cores: 0.0,
                processor_speed: 0.0,
                volumes: Vec::new(),
                hypervisor: None,
                supports_image: ImageSupport::Any,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn ram(&self) -> u32 {
        self.ram
    }

    pub fn cpu_cores(&self) -> f64 {
        self.cpu_cores
    }

    pub fn processor_speed(&self) -> f64 {
        self.processor_speed
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn hypervisor(&self) -> Option<&str> {
        self.hypervisor.as_deref()
    }

    pub fn supports_image(&self) -> &ImageSupport {
        &self.supports_image
    }

    /// Total compute: cores × per-core speed
    pub fn cores_and_speed(&self) -> f64 {
        self.cpu_cores * self.processor_speed
    }

    /// Sum of volume sizes in gigabytes
    pub fn total_disk(&self) -> f64 {
        self.volumes.iter().map(|v| v.size_gb).sum()
    }

    pub fn supports(&self, image: &Image) -> bool {
        self.supports_image.supports(image)
    }
}

impl fmt::Display for Hardware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hardware {} [cores={}, speed={}, ram={}MB, disk={}GB]",
            self.id,
            self.cpu_cores,
            self.processor_speed,
            self.ram,
            self.total_disk()
        )
    }
}

/// Builder for [`Hardware`]
#[derive(Debug, Clone)]
pub struct HardwareBuilder {
    hardware: Hardware,
}

impl HardwareBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.hardware.name = Some(name.into());
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.hardware.location = Some(location);
        self
    }

    pub fn ram(mut self, megabytes: u32) -> Self {
        self.hardware.ram = megabytes;
        self
    }

    /// Core count and per-core speed
    pub fn cores(mut self, count: f64, speed: f64) -> Self {
        self.hardware.cpu_cores = count;
        self.hardware.processor_speed = speed;
        self
    }

    pub fn volume(mut self, volume: Volume) -> Self {
        self.hardware.volumes.push(volume);
        self
    }

    pub fn hypervisor(mut self, hypervisor: impl Into<String>) -> Self {
        self.hardware.hypervisor = Some(hypervisor.into());
        self
    }

    pub fn supports_image(mut self, support: ImageSupport) -> Self {
        self.hardware.supports_image = support;
        self
    }

    pub fn build(self) -> Hardware {
        self.hardware
    }
}
