// Copyright (c) 2025 - Cowboy AI, Inc.
//! Template Selection Requests
//!
//! [`SelectionCriteria`] is the typed request; [`TemplateSpec`] is its
//! text form.

pub mod criteria;
pub mod spec;

pub use criteria::{
    HardwareRanking, HardwareSelection, ImageDescriptors, ImageSelection, SelectionCriteria,
};
pub use spec::{SpecEntry, TemplateSpec};
