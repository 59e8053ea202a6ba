//! JSON fixture documents that seed a [`Repository`].
//!
//! Documents are validated against `schema/repository_fixture.schema.json`
//! (compiled into the crate) before being deserialized, so a typo in a field
//! name fails loudly instead of silently producing an emptier repository.
//! Contents are applied verbatim: revision counters are set as written and
//! are not checked against the uploaded charms. Counter keys must be bare
//! names, since `mysql` and `mysql-9` would land on the same counter.

use crate::charm::{Bundle, Channel, Charm, CharmUrl, GenerationVersion, Resource};
use crate::repository::Repository;
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const FIXTURE_SCHEMA_VERSION: &str = "charmstore_fixture_v1";

const FIXTURE_SCHEMA: &str = include_str!("../schema/repository_fixture.schema.json");

#[derive(Clone, Debug, Deserialize)]
/// Whole fixture document.
pub struct RepositoryFixture {
    pub schema_version: String,
    /// Active channel after loading; defaults to stable.
    #[serde(default)]
    pub channel: Channel,
    #[serde(default)]
    pub channels: BTreeMap<Channel, ChannelContents>,
    #[serde(default)]
    pub added: BTreeMap<String, Vec<CharmUrl>>,
    #[serde(default)]
    pub blobs: BTreeMap<String, BlobContent>,
    #[serde(default)]
    pub generations: BTreeMap<GenerationVersion, String>,
}

/// Raw blob body: a string is stored as its UTF-8 bytes, an array of
/// integers byte for byte.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BlobContent {
    Text(String),
    Bytes(Vec<u8>),
}

impl BlobContent {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            BlobContent::Text(text) => text.into_bytes(),
            BlobContent::Bytes(bytes) => bytes,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
/// Everything published under one channel.
pub struct ChannelContents {
    #[serde(default)]
    pub charms: Vec<CharmEntry>,
    #[serde(default)]
    pub bundles: Vec<BundleEntry>,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
    #[serde(default)]
    pub revisions: BTreeMap<CharmUrl, u32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CharmEntry {
    pub url: CharmUrl,
    pub charm: Charm,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BundleEntry {
    pub url: CharmUrl,
    pub bundle: Bundle,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ResourceEntry {
    pub url: CharmUrl,
    pub resources: Vec<Resource>,
}

impl RepositoryFixture {
    /// Validate `value` against the fixture schema and deserialize it.
    pub fn from_value(value: Value) -> Result<Self> {
        validate_fixture(&value)?;
        let fixture: RepositoryFixture =
            serde_json::from_value(value).context("decoding repository fixture")?;
        for (channel, contents) in &fixture.channels {
            if let Some(url) = contents.revisions.keys().find(|url| url.revision().is_some()) {
                bail!(
                    "revision counter key \"{url}\" under channel {channel} carries a revision; use \"{}\"",
                    url.without_revision()
                );
            }
        }
        Ok(fixture)
    }

    /// Build a fresh repository holding exactly the fixture's contents.
    pub fn into_repository(self) -> Repository {
        let mut repo = Repository::new();
        for (channel, contents) in self.channels {
            for entry in contents.charms {
                repo.upload_charm_in(channel, entry.url, entry.charm);
            }
            for entry in contents.bundles {
                repo.upload_bundle_in(channel, entry.url, entry.bundle);
            }
            for entry in contents.resources {
                repo.upload_resources_in(channel, entry.url, entry.resources);
            }
            for (url, revision) in contents.revisions {
                repo.set_revision_in(channel, &url, revision);
            }
        }
        for (key, urls) in self.added {
            for url in urls {
                repo.record_added(key.clone(), url);
            }
        }
        for (path, data) in self.blobs {
            repo.blobs_mut().put(path, data.into_bytes());
        }
        for (version, label) in self.generations {
            repo.set_generation(version, label);
        }
        repo.set_channel(self.channel);
        repo
    }
}

/// Parse, validate and apply a fixture held in memory.
pub fn load_fixture_from_str(data: &str) -> Result<Repository> {
    let value: Value = serde_json::from_str(data).context("parsing repository fixture")?;
    Ok(RepositoryFixture::from_value(value)?.into_repository())
}

/// Read a fixture file and build the repository it describes.
pub fn load_fixture_from_path(path: &Path) -> Result<Repository> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    let repo =
        load_fixture_from_str(&data).with_context(|| format!("loading {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        channel = %repo.channel(),
        "loaded repository fixture"
    );
    Ok(repo)
}

fn validate_fixture(value: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(FIXTURE_SCHEMA).context("parsing bundled fixture schema")?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling bundled fixture schema: {err}"))?;

    if let Err(errors) = compiled.validate(value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("repository fixture failed schema validation:\n{}", details);
    }
    Ok(())
}
