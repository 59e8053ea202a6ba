//! Stored artifact payloads.
//!
//! The store never looks inside these; they only need to survive a round trip
//! through the repository and through fixture documents.

use serde::{Deserialize, Serialize};

/// Series reported by every resolution, independent of what is stored.
pub const SUPPORTED_SERIES: [&str; 3] = ["trusty", "wily", "quantal"];

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
/// Deployable charm content.
pub struct Charm {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub series: Vec<String>,
    #[serde(default)]
    pub archive: Vec<u8>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
/// Composite deployment descriptor.
pub struct Bundle {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Raw bundle document as uploaded.
    #[serde(default)]
    pub data: Vec<u8>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    #[default]
    File,
    OciImage,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Attachment descriptor published alongside a charm.
pub struct Resource {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ResourceType,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub revision: u32,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub size: u64,
}

impl Charm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Bundle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
