// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-compute
//!
//! One deterministic provider catalog shared by the integration suites.
//!
//! ```text
//! PROVIDER(aws)
//! ├── REGION(us-east-1)            default location
//! │   ├── ZONE(us-east-1a)
//! │   └── ZONE(us-east-1b)
//! └── REGION(eu-west-1)
//! ```
//!
//! # Design Principles
//! - Catalog order is fixed; tie-break tests depend on it
//! - Fixtures are the only place that builds the shared catalog

#![allow(dead_code)]

use cim_compute::domain::{
    Hardware, Image, ImageStatus, ImageSupport, Location, LocationHierarchy, LocationScope,
    NodeMetadata, NodeStatus, OperatingSystem, OsFamily, Template, Volume,
};
use cim_compute::StaticCatalog;

pub const PROVIDER_ID: &str = "aws";
pub const REGION_US: &str = "us-east-1";
pub const ZONE_US_A: &str = "us-east-1a";
pub const ZONE_US_B: &str = "us-east-1b";
pub const REGION_EU: &str = "eu-west-1";

/// Install a test-writer subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn provider() -> Location {
    Location::provider(PROVIDER_ID, "Amazon Web Services")
}

pub fn region_us() -> Location {
    Location::child_of(&provider(), LocationScope::Region, REGION_US, "US East (Virginia)")
}

pub fn region_eu() -> Location {
    Location::child_of(&provider(), LocationScope::Region, REGION_EU, "EU (Ireland)")
}

pub fn zone_us_a() -> Location {
    Location::child_of(&region_us(), LocationScope::Zone, ZONE_US_A, "us-east-1a")
}

pub fn zone_us_b() -> Location {
    Location::child_of(&region_us(), LocationScope::Zone, ZONE_US_B, "us-east-1b")
}

pub fn locations() -> LocationHierarchy {
    LocationHierarchy::new(vec![
        provider(),
        region_us(),
        zone_us_a(),
        zone_us_b(),
        region_eu(),
    ])
}

fn ubuntu(arch: &str, is_64_bit: bool) -> OperatingSystem {
    OperatingSystem::new(OsFamily::Ubuntu)
        .name("Ubuntu")
        .version("22.04")
        .description("Ubuntu 22.04 LTS")
        .arch(arch)
        .is_64_bit(is_64_bit)
}

/// Images in catalog order
///
/// - `us-east-1/ubuntu-32` and `us-east-1/ubuntu-64` differ only in arch
/// - `windows-2022` is global (no location)
pub fn images() -> Vec<Image> {
    vec![
        Image::builder("ubuntu-32", ubuntu("x86_32", false))
            .name("ubuntu-22.04")
            .description("Ubuntu server")
            .version("20240101")
            .location(region_us())
            .build(),
        Image::builder("ubuntu-64", ubuntu("x86_64", true))
            .name("ubuntu-22.04")
            .description("Ubuntu server")
            .version("20240101")
            .location(region_us())
            .build(),
        Image::builder(
            "centos-64",
            OperatingSystem::new(OsFamily::Centos)
                .version("9")
                .description("CentOS Stream 9")
                .arch("x86_64")
                .is_64_bit(true),
        )
        .name("centos-stream-9")
        .location(region_us())
        .build(),
        Image::builder(
            "debian-eu",
            OperatingSystem::new(OsFamily::Debian)
                .version("12")
                .arch("x86_64")
                .is_64_bit(true),
        )
        .name("debian-12")
        .location(region_eu())
        .build(),
        Image::builder(
            "windows-2022",
            OperatingSystem::new(OsFamily::Windows)
                .name("Windows Server 2022")
                .is_64_bit(true),
        )
        .name("windows-2022")
        .status(ImageStatus::Available)
        .build(),
    ]
}

/// Hardware profiles in catalog order
pub fn hardware() -> Vec<Hardware> {
    vec![
        Hardware::builder("t.small")
            .ram(1024)
            .cores(1.0, 1.0)
            .volume(Volume::new(10.0).boot())
            .hypervisor("xen")
            .build(),
        Hardware::builder("t.medium")
            .ram(4096)
            .cores(2.0, 1.0)
            .volume(Volume::new(40.0).boot())
            .hypervisor("xen")
            .build(),
        Hardware::builder("t.large")
            .ram(16384)
            .cores(4.0, 1.0)
            .volume(Volume::new(100.0).boot())
            .hypervisor("xen")
            .supports_image(ImageSupport::Only64Bit)
            .build(),
        Hardware::builder("c.fast")
            .location(zone_us_a())
            .ram(8192)
            .cores(4.0, 3.0)
            .volume(Volume::new(50.0).boot())
            .hypervisor("kvm")
            .build(),
        Hardware::builder("m.windows")
            .ram(8192)
            .cores(2.0, 2.0)
            .volume(Volume::new(80.0).boot())
            .hypervisor("hyperv")
            .supports_image(ImageSupport::ids(["windows-2022"]))
            .build(),
    ]
}

pub fn catalog() -> StaticCatalog {
    StaticCatalog::new(locations(), images(), hardware()).with_default_location(REGION_US)
}

/// Template the fallback provider returns
pub fn fallback_template() -> Template {
    Template::new(
        Image::builder("fallback-image", OperatingSystem::default()).build(),
        Hardware::builder("fallback-hardware").build(),
        Some(provider()),
    )
}

pub fn node(id: &str, status: NodeStatus) -> NodeMetadata {
    NodeMetadata::new(id, status).with_location(zone_us_a())
}

/// The same catalog shape as a JSON document
pub const CATALOG_JSON: &str = r#"{
  "locations": [
    { "id": "aws", "scope": "PROVIDER", "description": "Amazon Web Services" },
    { "id": "us-east-1", "scope": "REGION", "description": "US East",
      "parent": { "id": "aws", "scope": "PROVIDER" } }
  ],
  "images": [
    { "id": "us-east-1/ami-1", "provider_id": "ami-1", "name": "base",
      "location": { "id": "us-east-1", "scope": "REGION",
                    "parent": { "id": "aws", "scope": "PROVIDER" } },
      "operating_system": { "family": "UBUNTU", "version": "22.04", "is_64_bit": true } }
  ],
  "hardware": [
    { "id": "small", "ram": 1024, "cpu_cores": 1.0, "processor_speed": 1.0,
      "volumes": [ { "size_gb": 10.0, "boot": true } ] },
    { "id": "only-ami-1", "ram": 2048, "cpu_cores": 2.0, "processor_speed": 1.0,
      "supports_image": { "kind": "id_in", "ids": ["us-east-1/ami-1"] } }
  ],
  "default_location": "us-east-1"
}"#;
