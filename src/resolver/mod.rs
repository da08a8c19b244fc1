// Copyright (c) 2025 - Cowboy AI, Inc.
//! Template Resolution
//!
//! Picks one concrete (image, hardware, location) triple out of a provider
//! catalog that satisfies a [`SelectionCriteria`].
//!
//! # Algorithm
//!
//! 1. Unconstrained criteria skip the catalog and delegate to the caller's
//!    fallback template provider (options, if any, are applied on top).
//! 2. Target location: an explicit `locationId` wins. Otherwise the
//!    location of the image named by `imageId`, then of the hardware named
//!    by `hardwareId`, is adopted when the current target is absent or
//!    strictly wider. Failing both, the catalog default is used.
//! 3. Hardware is filtered by location, exact id or hypervisor pattern,
//!    and the inclusive RAM/core/disk minimums.
//! 4. Images are filtered by location, then by exact id or by the
//!    conjunction of descriptors.
//! 5. Cross-match: only (hardware, image) pairs where the hardware
//!    supports the image survive.
//! 6. The image is chosen first (64-bit preferred, then catalog order),
//!    then the hardware is ranked among profiles paired with it.
//!
//! Resolution is a pure function of its inputs. The [`ComputeCatalog`]
//! seam is where provider I/O lives.
//!
//! # Errors
//!
//! - `NotFound` when a named location, image or hardware id is absent
//! - `NoMatch` when the descriptor conjunction or the cross-match is empty
//! - `InvalidArgument` for malformed patterns or a malformed target location
//! - `InvalidState` for malformed catalog locations

pub mod ordering;
pub mod predicates;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::invariants::{validate_hardware, validate_image_id, validate_location};
use crate::domain::{Hardware, Image, Location, LocationHierarchy, Template};
use crate::errors::{ComputeError, ComputeResult};
use crate::selection::{ImageSelection, SelectionCriteria};

pub use ordering::{by_size, by_speed, choose_image, rank_hardware};
pub use predicates::{hardware_predicate, image_predicate, NamedPredicate, TextPattern};

/// Provider catalog as seen at one point in time
///
/// Implementations perform whatever I/O is needed to list the catalog.
/// Each call returns a fresh snapshot; the resolver calls each method at
/// most once per resolution.
pub trait ComputeCatalog {
    fn locations(&self) -> ComputeResult<LocationHierarchy>;

    fn images(&self) -> ComputeResult<Vec<Image>>;

    fn hardware(&self) -> ComputeResult<Vec<Hardware>>;

    /// Location used when neither the criteria nor a named resource pin one
    fn default_location(&self) -> ComputeResult<Option<Location>>;
}

/// In-memory catalog, loadable from JSON
///
/// A catalog holding a hardware profile with [`ImageSupport::Custom`]
/// cannot be serialized; the closure has no document form and
/// serialization returns an error.
///
/// [`ImageSupport::Custom`]: crate::domain::ImageSupport::Custom
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub locations: LocationHierarchy,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub hardware: Vec<Hardware>,
    /// Id of the default location within `locations`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_location: Option<String>,
}

impl StaticCatalog {
    pub fn new(
        locations: impl Into<LocationHierarchy>,
        images: Vec<Image>,
        hardware: Vec<Hardware>,
    ) -> Self {
        Self {
            locations: locations.into(),
            images,
            hardware,
            default_location: None,
        }
    }

    pub fn with_default_location(mut self, id: impl Into<String>) -> Self {
        self.default_location = Some(id.into());
        self
    }

    /// Parse and validate a catalog document
    pub fn from_json(json: &str) -> ComputeResult<Self> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|e| ComputeError::InvalidState(format!("catalog document: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every catalog entry against the domain invariants
    pub fn validate(&self) -> ComputeResult<()> {
        for location in self.locations.iter() {
            validate_location(location)?;
        }
        for image in &self.images {
            validate_image_id(image)?;
        }
        for hardware in &self.hardware {
            validate_hardware(hardware)?;
        }
        if let Some(id) = &self.default_location {
            self.locations.require(id)?;
        }
        Ok(())
    }
}

impl ComputeCatalog for StaticCatalog {
    fn locations(&self) -> ComputeResult<LocationHierarchy> {
        Ok(self.locations.clone())
    }

    fn images(&self) -> ComputeResult<Vec<Image>> {
        Ok(self.images.clone())
    }

    fn hardware(&self) -> ComputeResult<Vec<Hardware>> {
        Ok(self.hardware.clone())
    }

    fn default_location(&self) -> ComputeResult<Option<Location>> {
        match &self.default_location {
            Some(id) => self.locations.require(id).map(|l| Some(l.clone())),
            None => Ok(None),
        }
    }
}

/// Resolves criteria against a [`ComputeCatalog`]
#[derive(Debug, Clone)]
pub struct TemplateResolver<C> {
    catalog: C,
}

impl<C: ComputeCatalog> TemplateResolver<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Resolve `criteria`, calling `fallback` when they constrain nothing
    ///
    /// The catalog is not consulted on the fallback path.
    pub fn resolve<F>(&self, criteria: &SelectionCriteria, fallback: F) -> ComputeResult<Template>
    where
        F: FnOnce() -> ComputeResult<Template>,
    {
        criteria.validate()?;
        if criteria.is_unconstrained() {
            return resolve_fallback(criteria, fallback);
        }

        let locations = self.catalog.locations()?;
        let images = self.catalog.images()?;
        let hardware = self.catalog.hardware()?;
        let default_location = self.catalog.default_location()?;
        trace!(
            locations = locations.len(),
            images = images.len(),
            hardware = hardware.len(),
            "Loaded catalog snapshot"
        );

        resolve(
            criteria,
            &locations,
            &images,
            &hardware,
            default_location.as_ref(),
            fallback,
        )
    }
}

fn resolve_fallback<F>(criteria: &SelectionCriteria, fallback: F) -> ComputeResult<Template>
where
    F: FnOnce() -> ComputeResult<Template>,
{
    debug!("No constraints set, delegating to fallback template");
    let template = fallback()?;
    Ok(match &criteria.options {
        Some(options) => template.with_options(options.clone()),
        None => template,
    })
}

/// Resolve `criteria` against explicit catalog snapshots
pub fn resolve<F>(
    criteria: &SelectionCriteria,
    locations: &LocationHierarchy,
    images: &[Image],
    hardware: &[Hardware],
    default_location: Option<&Location>,
    fallback: F,
) -> ComputeResult<Template>
where
    F: FnOnce() -> ComputeResult<Template>,
{
    criteria.validate()?;
    if criteria.is_unconstrained() {
        return resolve_fallback(criteria, fallback);
    }

    debug!("Searching catalog for {}", criteria);

    let target = target_location(criteria, locations, images, hardware, default_location)?;
    let target_ref = target.as_ref();

    // Hardware: location, exact id, hypervisor and minimums
    let hardware_filter = hardware_predicate(
        &criteria.hardware,
        criteria.min_ram,
        criteria.min_cores,
        criteria.min_disk,
        target_ref,
    )?;
    let mut hardware_candidates = hardware_filter.filter(hardware)?;
    if let Some(id) = criteria.hardware.id() {
        let located = located_hardware(hardware, target_ref)?;
        if !located.iter().any(|h| h.id() == id) {
            return Err(ComputeError::NotFound(format!("hardwareId({}) not found", id)));
        }
        hardware_candidates.retain(|h| h.id() == id);
    }
    trace!("{} hardware profiles match {}", hardware_candidates.len(), hardware_filter);

    // Images: location, then exact id or descriptor conjunction
    let image_candidates: Vec<&Image> = match &criteria.image {
        ImageSelection::ById(id) => {
            let located = located_images(images, target_ref)?;
            let found: Vec<&Image> = located.into_iter().filter(|i| i.id() == id).collect();
            if found.is_empty() {
                return Err(ComputeError::NotFound(format!("imageId({}) not found", id)));
            }
            found
        }
        ImageSelection::ByDescriptors(descriptors) => {
            let image_filter = image_predicate(descriptors, target_ref)?;
            let found = image_filter.filter(images)?;
            if found.is_empty() {
                return Err(ComputeError::NoMatch(format!(
                    "no image matched predicate: {}",
                    image_filter
                )));
            }
            trace!("{} images match {}", found.len(), image_filter);
            found
        }
    };

    // Cross-match: images some surviving hardware supports, in catalog order
    let supported: Vec<&Image> = image_candidates
        .iter()
        .copied()
        .filter(|image| hardware_candidates.iter().any(|h| h.supports(image)))
        .collect();

    let no_pairs = || {
        ComputeError::NoMatch(format!(
            "no hardware profiles support images matching params: {}",
            criteria
        ))
    };

    let image = choose_image(&supported, criteria.os_64_bit_constraint()).ok_or_else(no_pairs)?;
    let chosen_hardware = rank_hardware(
        hardware_candidates.iter().copied().filter(|h| h.supports(image)),
        criteria.ranking,
    )
    .ok_or_else(no_pairs)?;

    debug!(
        "Matched image({}) hardware({}) location({})",
        image.id(),
        chosen_hardware.id(),
        target_ref.map(Location::id).unwrap_or("none")
    );

    Ok(Template::new(image.clone(), chosen_hardware.clone(), target.clone())
        .with_options(criteria.options.clone().unwrap_or_default()))
}

/// Step 1: the location the rest of resolution is scoped to
fn target_location(
    criteria: &SelectionCriteria,
    locations: &LocationHierarchy,
    images: &[Image],
    hardware: &[Hardware],
    default_location: Option<&Location>,
) -> ComputeResult<Option<Location>> {
    if let Some(id) = &criteria.location_id {
        return locations.require(id).map(|l| Some(l.clone()));
    }

    let mut target: Option<&Location> = None;
    let named_image = criteria
        .image
        .id()
        .and_then(|id| images.iter().find(|i| i.id() == id))
        .map(Image::location);
    let named_hardware = criteria
        .hardware
        .id()
        .and_then(|id| hardware.iter().find(|h| h.id() == id))
        .map(Hardware::location);

    for pinned in [named_image, named_hardware].into_iter().flatten() {
        if wider_than(target, pinned) {
            target = pinned;
        }
    }

    Ok(target.or(default_location).cloned())
}

/// Whether `current` is absent or strictly wider than a present `location`
fn wider_than(current: Option<&Location>, location: Option<&Location>) -> bool {
    match (current, location) {
        (None, _) => true,
        (Some(current), Some(location)) => current.scope().is_wider_than(location.scope()),
        (Some(_), None) => false,
    }
}

fn located_images<'c>(images: &'c [Image], target: Option<&Location>) -> ComputeResult<Vec<&'c Image>> {
    let mut kept = Vec::new();
    for image in images {
        if crate::domain::is_compatible(image.location(), target)? {
            kept.push(image);
        }
    }
    Ok(kept)
}

fn located_hardware<'c>(
    hardware: &'c [Hardware],
    target: Option<&Location>,
) -> ComputeResult<Vec<&'c Hardware>> {
    let mut kept = Vec::new();
    for profile in hardware {
        if crate::domain::is_compatible(profile.location(), target)? {
            kept.push(profile);
        }
    }
    Ok(kept)
}
