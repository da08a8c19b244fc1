// Copyright (c) 2025 - Cowboy AI, Inc.
//! Named Predicates
//!
//! Every filter the resolver applies carries a printable name such as
//! `osFamily(UBUNTU)` or `locationCompatible()`. A failed conjunction is
//! reported by name, so the error stays short no matter how large the
//! catalog is.

use regex::Regex;
use std::fmt;

use crate::domain::{is_compatible, Hardware, Image, Location};
use crate::errors::{ComputeError, ComputeResult};
use crate::selection::{HardwareSelection, ImageDescriptors};

type Test<'a, T> = Box<dyn Fn(&T) -> ComputeResult<bool> + 'a>;

/// Fallible predicate with a diagnostic name
pub struct NamedPredicate<'a, T> {
    name: String,
    test: Test<'a, T>,
}

impl<'a, T> NamedPredicate<'a, T> {
    pub fn new(name: impl Into<String>, test: impl Fn(&T) -> ComputeResult<bool> + 'a) -> Self {
        Self {
            name: name.into(),
            test: Box::new(test),
        }
    }

    /// Infallible test wrapped as a predicate
    pub fn infallible(name: impl Into<String>, test: impl Fn(&T) -> bool + 'a) -> Self {
        Self::new(name, move |item| Ok(test(item)))
    }

    /// Conjunction of `predicates`
    ///
    /// Named `any()` when empty, by its single member when there is one,
    /// and `And(a, b, ...)` otherwise. Evaluation stops at the first
    /// false or error.
    pub fn all(predicates: Vec<NamedPredicate<'a, T>>) -> Self
    where
        T: 'a,
    {
        match predicates.len() {
            0 => Self::infallible("any()", |_| true),
            1 => predicates.into_iter().next().unwrap_or_else(|| Self::infallible("any()", |_| true)),
            _ => {
                let names: Vec<&str> = predicates.iter().map(|p| p.name.as_str()).collect();
                let name = format!("And({})", names.join(", "));
                Self::new(name, move |item| {
                    for predicate in &predicates {
                        if !predicate.test(item)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                })
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn test(&self, item: &T) -> ComputeResult<bool> {
        (self.test)(item)
    }

    /// Items passing the predicate, in input order
    pub fn filter<'c>(&self, items: impl IntoIterator<Item = &'c T>) -> ComputeResult<Vec<&'c T>>
    where
        T: 'c,
    {
        let mut kept = Vec::new();
        for item in items {
            if self.test(item)? {
                kept.push(item);
            }
        }
        Ok(kept)
    }
}

impl<T> fmt::Display for NamedPredicate<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<T> fmt::Debug for NamedPredicate<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamedPredicate").field(&self.name).finish()
    }
}

/// Compiled text constraint
///
/// A value matches when it equals the pattern, contains it, or fully
/// matches it as a regular expression. An absent value never matches.
#[derive(Debug, Clone)]
pub struct TextPattern {
    pattern: String,
    regex: Regex,
}

impl TextPattern {
    /// Compile `pattern`; `field` names the criterion in the error
    pub fn compile(field: &str, pattern: &str) -> ComputeResult<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            ComputeError::InvalidArgument(format!("{} pattern {} is invalid: {}", field, pattern, e))
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| v == self.pattern || v.contains(&self.pattern) || self.regex.is_match(v))
    }
}

fn text_predicate<'a>(
    name: &str,
    pattern: &str,
    field: impl Fn(&Image) -> Option<&str> + 'a,
) -> ComputeResult<NamedPredicate<'a, Image>> {
    let text = TextPattern::compile(name, pattern)?;
    Ok(NamedPredicate::infallible(
        format!("{}({})", name, pattern),
        move |image: &Image| text.matches(field(image)),
    ))
}

/// Location compatibility with the target, if there is one
fn location_predicate<'a, T: 'a>(
    target: Option<&'a Location>,
    location_of: impl Fn(&T) -> Option<&Location> + 'a,
) -> Option<NamedPredicate<'a, T>> {
    target.map(|target| {
        NamedPredicate::new("locationCompatible()", move |item: &T| {
            is_compatible(location_of(item), Some(target))
        })
    })
}

/// Conjunction of the location check and every set image descriptor
///
/// Order: location, osFamily, osName, osDescription, osVersion, os64Bit,
/// osArch, imageVersion, imageName, imageDescription, custom predicate.
pub fn image_predicate<'a>(
    descriptors: &'a ImageDescriptors,
    target: Option<&'a Location>,
) -> ComputeResult<NamedPredicate<'a, Image>> {
    let mut predicates: Vec<NamedPredicate<'a, Image>> = Vec::new();
    predicates.extend(location_predicate(target, Image::location));

    if let Some(family) = descriptors.os_family {
        predicates.push(NamedPredicate::infallible(
            format!("osFamily({})", family),
            move |image: &Image| image.operating_system().family == family,
        ));
    }
    if let Some(pattern) = &descriptors.os_name {
        predicates.push(text_predicate("osName", pattern, |i| {
            i.operating_system().name.as_deref()
        })?);
    }
    if let Some(pattern) = &descriptors.os_description {
        predicates.push(text_predicate("osDescription", pattern, |i| {
            i.operating_system().description.as_deref()
        })?);
    }
    if let Some(pattern) = &descriptors.os_version {
        predicates.push(text_predicate("osVersion", pattern, |i| {
            i.operating_system().version.as_deref()
        })?);
    }
    if let Some(is_64_bit) = descriptors.os_64_bit {
        predicates.push(NamedPredicate::infallible(
            format!("os64Bit({})", is_64_bit),
            move |image: &Image| image.operating_system().is_64_bit == is_64_bit,
        ));
    }
    if let Some(pattern) = &descriptors.os_arch {
        predicates.push(text_predicate("osArch", pattern, |i| {
            i.operating_system().arch.as_deref()
        })?);
    }
    if let Some(pattern) = &descriptors.version {
        predicates.push(text_predicate("imageVersion", pattern, Image::version)?);
    }
    if let Some(pattern) = &descriptors.name {
        predicates.push(text_predicate("imageName", pattern, Image::name)?);
    }
    if let Some(pattern) = &descriptors.description {
        predicates.push(text_predicate("imageDescription", pattern, Image::description)?);
    }
    if let Some(custom) = &descriptors.predicate {
        predicates.push(NamedPredicate::infallible(custom.name(), move |image: &Image| {
            custom.test(image)
        }));
    }

    Ok(NamedPredicate::all(predicates))
}

/// Location check plus the hypervisor pattern and inclusive minimums
///
/// An exact hardware id is handled by the caller, which needs to tell
/// "no such id" apart from "filtered out".
pub fn hardware_predicate<'a>(
    selection: &'a HardwareSelection,
    min_ram: u32,
    min_cores: f64,
    min_disk: f64,
    target: Option<&'a Location>,
) -> ComputeResult<NamedPredicate<'a, Hardware>> {
    let mut predicates: Vec<NamedPredicate<'a, Hardware>> = Vec::new();
    predicates.extend(location_predicate(target, Hardware::location));

    if let Some(pattern) = selection.hypervisor() {
        let text = TextPattern::compile("hypervisorMatches", pattern)?;
        predicates.push(NamedPredicate::infallible(
            format!("hypervisorMatches({})", pattern),
            move |hardware: &Hardware| text.matches(hardware.hypervisor()),
        ));
    }
    if min_cores > 0.0 {
        predicates.push(NamedPredicate::infallible(
            format!("minCores({})", min_cores),
            move |hardware: &Hardware| hardware.cpu_cores() >= min_cores,
        ));
    }
    if min_ram > 0 {
        predicates.push(NamedPredicate::infallible(
            format!("minRam({})", min_ram),
            move |hardware: &Hardware| hardware.ram() >= min_ram,
        ));
    }
    if min_disk > 0.0 {
        predicates.push(NamedPredicate::infallible(
            format!("minDisk({})", min_disk),
            move |hardware: &Hardware| hardware.total_disk() >= min_disk,
        ));
    }

    Ok(NamedPredicate::all(predicates))
}
