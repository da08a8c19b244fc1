// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resolved Template
//!
//! The output of resolution: one concrete image, one hardware profile, the
//! target location, and the launch options that ride along unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use super::hardware::Hardware;
use super::image::Image;
use super::location::Location;

/// Port opened by default on new nodes (SSH)
pub const DEFAULT_INBOUND_PORT: u16 = 22;

/// Launch options carried from the request into the template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOptions {
    #[serde(default = "default_inbound_ports")]
    pub inbound_ports: Vec<u16>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub user_metadata: BTreeMap<String, String>,

    #[serde(default = "default_true")]
    pub block_until_running: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_on_port: Option<(u16, Duration)>,
}

fn default_inbound_ports() -> Vec<u16> {
    vec![DEFAULT_INBOUND_PORT]
}

fn default_true() -> bool {
    true
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            inbound_ports: default_inbound_ports(),
            tags: Vec::new(),
            user_metadata: BTreeMap::new(),
            block_until_running: true,
            block_on_port: None,
        }
    }
}

impl TemplateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the inbound port list
    pub fn inbound_ports(mut self, ports: impl IntoIterator<Item = u16>) -> Self {
        self.inbound_ports = ports.into_iter().collect();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn user_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_metadata.insert(key.into(), value.into());
        self
    }

    pub fn block_until_running(mut self, block: bool) -> Self {
        self.block_until_running = block;
        self
    }

    /// Wait for `port` to accept connections, for at most `timeout`
    pub fn block_on_port(mut self, port: u16, timeout: Duration) -> Self {
        self.block_on_port = Some((port, timeout));
        self
    }
}

/// A concrete (image, hardware, location) selection plus options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    image: Image,
    hardware: Hardware,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    #[serde(default)]
    options: TemplateOptions,
}

impl Template {
    pub fn new(image: Image, hardware: Hardware, location: Option<Location>) -> Self {
        Self {
            image,
            hardware,
            location,
            options: TemplateOptions::default(),
        }
    }

    /// Same selection with `options` replacing the current ones
    pub fn with_options(mut self, options: TemplateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn hardware(&self) -> &Hardware {
        &self.hardware
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn options(&self) -> &TemplateOptions {
        &self.options
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[image={}, hardware={}, location={}]",
            self.image.id(),
            self.hardware.id(),
            self.location
                .as_ref()
                .map(|l| l.id().to_string())
                .unwrap_or_else(|| "none".to_string())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OperatingSystem;

    #[test]
    fn test_option_defaults() {
        let options = TemplateOptions::default();
        assert_eq!(options.inbound_ports, vec![22]);
        assert!(options.block_until_running);
        assert!(options.block_on_port.is_none());
    }

    #[test]
    fn test_options_defaults_apply_when_deserializing() {
        let options: TemplateOptions = serde_json::from_str(r#"{"tags":["web"]}"#).unwrap();
        assert_eq!(options.inbound_ports, vec![22]);
        assert_eq!(options.tags, vec!["web".to_string()]);
    }

    #[test]
    fn test_template_display() {
        let template = Template::new(
            Image::builder("img", OperatingSystem::default()).build(),
            Hardware::builder("small").build(),
            None,
        )
        .with_options(TemplateOptions::new().inbound_ports([22, 80]));
        assert_eq!(template.to_string(), "[image=img, hardware=small, location=none]");
        assert_eq!(template.options().inbound_ports, vec![22, 80]);
    }
}
