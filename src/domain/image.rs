// Copyright (c) 2025 - Cowboy AI, Inc.
//! Image Domain Model
//!
//! An image is a read-only snapshot from a provider catalog. Its id is
//! composite when the image is bound to a location:
//!
//! ```text
//! <locationId>/<providerId>   location-scoped
//! <providerId>                global
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::location::Location;
use super::operating_system::OperatingSystem;
use super::status::{ImageStatus, ResourceSnapshot};

/// Bootable image offered by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    id: String,
    provider_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Location>,

    #[serde(default)]
    operating_system: OperatingSystem,

    #[serde(default)]
    status: ImageStatus,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    user_metadata: BTreeMap<String, String>,
}

impl Image {
    /// Start building an image; the composite id is computed on `build`
    pub fn builder(provider_id: impl Into<String>, operating_system: OperatingSystem) -> ImageBuilder {
        ImageBuilder {
            provider_id: provider_id.into(),
            name: None,
            description: None,
            version: None,
            location: None,
            operating_system,
            status: ImageStatus::default(),
            user_metadata: BTreeMap::new(),
        }
    }

    /// Id an image with this location and provider id must carry
    pub fn composite_id(location: Option<&Location>, provider_id: &str) -> String {
        match location {
            Some(location) => format!("{}/{}", location.id(), provider_id),
            None => provider_id.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn operating_system(&self) -> &OperatingSystem {
        &self.operating_system
    }

    pub fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn user_metadata(&self) -> &BTreeMap<String, String> {
        &self.user_metadata
    }

    /// Same image with a new status, as a refresh would return it
    pub fn with_status(mut self, status: ImageStatus) -> Self {
        self.status = status;
        self
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image {} [{}]", self.id, self.operating_system)
    }
}

impl ResourceSnapshot for Image {
    const KIND: &'static str = "image";
    type Status = ImageStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    fn status(&self) -> ImageStatus {
        self.status
    }
}

/// Builder for [`Image`]
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    provider_id: String,
    name: Option<String>,
    description: Option<String>,
    version: Option<String>,
    location: Option<Location>,
    operating_system: OperatingSystem,
    status: ImageStatus,
    user_metadata: BTreeMap<String, String>,
}

impl ImageBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn status(mut self, status: ImageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn user_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Image {
        Image {
            id: Image::composite_id(self.location.as_ref(), &self.provider_id),
            provider_id: self.provider_id,
            name: self.name,
            description: self.description,
            version: self.version,
            location: self.location,
            operating_system: self.operating_system,
            status: self.status,
            user_metadata: self.user_metadata,
        }
    }
}

/// Named, shareable predicate over images
///
/// The name is what diagnostics print, so a failed match can say which
/// constraint rejected the catalog without dumping the catalog itself.
#[derive(Clone)]
pub struct ImagePredicate {
    name: String,
    test: Arc<dyn Fn(&Image) -> bool + Send + Sync>,
}

impl ImagePredicate {
    pub fn new(name: impl Into<String>, test: impl Fn(&Image) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn test(&self, image: &Image) -> bool {
        (self.test)(image)
    }
}

impl fmt::Debug for ImagePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePredicate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ImagePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Two predicates are equal only if they share the same closure
impl PartialEq for ImagePredicate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.test, &other.test)
    }
}
