// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Location compatibility laws, mutual exclusion in the criteria builder,
//! and determinism of hardware ranking.

mod criteria_exclusivity;
mod hardware_ranking;
mod location_compatibility;
