//! In-memory stand-in for a remote charm repository.
//!
//! Charms, bundles, resource lists and revision counters are indexed per
//! channel, so writing under `edge` never shows up under `stable`. Every
//! method without an explicit channel works against the repository's active
//! channel as it is at call time.
//!
//! No attempt is made to keep the indexes consistent with each other. In
//! particular the revision counter for a charm says nothing about which
//! revisions are actually stored: tests set it to whatever they need, and a
//! resolution may well point at a revision that was never uploaded.

use crate::blob::BlobStore;
use crate::charm::{
    Bundle, Channel, Charm, CharmUrl, GenerationVersion, Resource, SUPPORTED_SERIES,
};
use crate::error::{StoreError, StoreResult};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
struct ChannelIndex {
    charms: BTreeMap<CharmUrl, Charm>,
    bundles: BTreeMap<CharmUrl, Bundle>,
    resources: BTreeMap<CharmUrl, Vec<Resource>>,
    /// Keyed by the revision-less URL.
    revisions: BTreeMap<CharmUrl, u32>,
}

/// Per-channel charm, bundle and resource indexes plus the state that is not
/// channel scoped: upload history, generation labels and raw blobs.
///
/// Calls without a channel argument use the active channel, `stable` unless
/// changed with [`Repository::set_channel`].
#[derive(Clone, Debug, Default)]
pub struct Repository {
    channel: Channel,
    indexes: [ChannelIndex; Channel::ORDERED.len()],
    added: BTreeMap<String, Vec<CharmUrl>>,
    blobs: BlobStore,
    generations: BTreeMap<GenerationVersion, String>,
}

impl Repository {
    /// An empty repository on the `stable` channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Repository::set_channel`].
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    fn index(&self, channel: Channel) -> &ChannelIndex {
        &self.indexes[channel as usize]
    }

    fn index_mut(&mut self, channel: Channel) -> &mut ChannelIndex {
        &mut self.indexes[channel as usize]
    }

    // Resolution

    /// Current revision counter for the revision-less form of `url`.
    pub fn revision_in(&self, channel: Channel, url: &CharmUrl) -> u32 {
        self.index(channel)
            .revisions
            .get(&url.without_revision())
            .copied()
            .unwrap_or(0)
    }

    pub fn revision(&self, url: &CharmUrl) -> u32 {
        self.revision_in(self.channel, url)
    }

    /// Fill in the revision counter when `url` carries no revision.
    pub fn resolve_in(&self, channel: Channel, url: &CharmUrl) -> CharmUrl {
        match url.revision() {
            Some(_) => url.clone(),
            None => url.with_revision(self.revision_in(channel, url)),
        }
    }

    /// Disambiguate `url` to a concrete revision.
    ///
    /// The series list is a fixed constant; it does not reflect stored content.
    pub fn resolve(&self, url: &CharmUrl) -> (CharmUrl, &'static [&'static str]) {
        (self.resolve_in(self.channel, url), &SUPPORTED_SERIES)
    }

    /// [`Repository::resolve`] plus the channel the answer came from.
    pub fn resolve_with_channel(
        &self,
        url: &CharmUrl,
    ) -> (CharmUrl, Channel, &'static [&'static str]) {
        let (resolved, series) = self.resolve(url);
        (resolved, self.channel, series)
    }

    // Reads

    pub fn get_in(&self, channel: Channel, url: &CharmUrl) -> StoreResult<&Charm> {
        let resolved = self.resolve_in(channel, url);
        self.index(channel).charms.get(&resolved).ok_or_else(|| {
            tracing::debug!(%channel, url = %url, %resolved, "charm miss");
            StoreError::not_found(format!("cannot retrieve \"{url}\": charm"))
        })
    }

    /// Fetch the charm stored at the resolved form of `url`.
    ///
    /// A miss names `url` as requested, not the resolved revision.
    pub fn get(&self, url: &CharmUrl) -> StoreResult<&Charm> {
        self.get_in(self.channel, url)
    }

    pub fn get_bundle_in(&self, channel: Channel, url: &CharmUrl) -> StoreResult<&Bundle> {
        self.index(channel)
            .bundles
            .get(url)
            .ok_or_else(|| StoreError::not_found(url.as_str()))
    }

    /// Fetch a bundle by exactly `url`; revision counters are not consulted.
    pub fn get_bundle(&self, url: &CharmUrl) -> StoreResult<&Bundle> {
        self.get_bundle_in(self.channel, url)
    }

    pub fn resources_in(&self, channel: Channel, url: &CharmUrl) -> StoreResult<&[Resource]> {
        self.index(channel)
            .resources
            .get(url)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::not_found(format!("resources for \"{url}\"")))
    }

    pub fn resources(&self, url: &CharmUrl) -> StoreResult<&[Resource]> {
        self.resources_in(self.channel, url)
    }

    // Uploads

    pub fn upload_charm_in(&mut self, channel: Channel, url: CharmUrl, charm: Charm) {
        tracing::debug!(%channel, url = %url, "upload charm");
        self.index_mut(channel).charms.insert(url, charm);
    }

    /// Store `charm` at exactly `url`, overwriting any previous entry.
    pub fn upload_charm(&mut self, url: CharmUrl, charm: Charm) {
        self.upload_charm_in(self.channel, url, charm);
    }

    pub fn upload_bundle_in(&mut self, channel: Channel, url: CharmUrl, bundle: Bundle) {
        tracing::debug!(%channel, url = %url, "upload bundle");
        self.index_mut(channel).bundles.insert(url, bundle);
    }

    pub fn upload_bundle(&mut self, url: CharmUrl, bundle: Bundle) {
        self.upload_bundle_in(self.channel, url, bundle);
    }

    pub fn upload_resources_in(
        &mut self,
        channel: Channel,
        url: CharmUrl,
        resources: Vec<Resource>,
    ) {
        tracing::debug!(%channel, url = %url, count = resources.len(), "upload resources");
        self.index_mut(channel).resources.insert(url, resources);
    }

    pub fn upload_resources(&mut self, url: CharmUrl, resources: Vec<Resource>) {
        self.upload_resources_in(self.channel, url, resources);
    }

    pub fn set_revision_in(&mut self, channel: Channel, url: &CharmUrl, revision: u32) {
        self.index_mut(channel)
            .revisions
            .insert(url.without_revision(), revision);
    }

    /// Point resolution of `url` at `revision`, whether or not it is stored.
    pub fn set_revision(&mut self, url: &CharmUrl, revision: u32) {
        self.set_revision_in(self.channel, url, revision);
    }

    /// Increment the revision counter for `url` and return the new value.
    ///
    /// The counter saturates at `u32::MAX`; bumping it there returns
    /// `u32::MAX` again.
    pub fn bump_revision(&mut self, url: &CharmUrl) -> u32 {
        let channel = self.channel;
        let counter = self
            .index_mut(channel)
            .revisions
            .entry(url.without_revision())
            .or_insert(0);
        *counter = counter.saturating_add(1);
        *counter
    }

    /// Append `url` to the upload history kept under `key`.
    pub fn record_added(&mut self, key: impl Into<String>, url: CharmUrl) {
        self.added.entry(key.into()).or_default().push(url);
    }

    /// URLs recorded under `key`, oldest first.
    pub fn added(&self, key: &str) -> &[CharmUrl] {
        self.added.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Upload `charm` as the next revision of `url`.
    ///
    /// Bumps the counter, stores the charm at the bumped revision, records the
    /// concrete URL under `key` and returns it.
    pub fn publish_charm(
        &mut self,
        key: impl Into<String>,
        url: &CharmUrl,
        charm: Charm,
    ) -> CharmUrl {
        let revision = self.bump_revision(url);
        let concrete = url.with_revision(revision);
        self.upload_charm(concrete.clone(), charm);
        self.record_added(key, concrete.clone());
        concrete
    }

    // Generations and raw blobs

    pub fn set_generation(&mut self, version: GenerationVersion, label: impl Into<String>) {
        self.generations.insert(version, label.into());
    }

    pub fn generation(&self, version: GenerationVersion) -> Option<&str> {
        self.generations.get(&version).map(String::as_str)
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn blobs_mut(&mut self) -> &mut BlobStore {
        &mut self.blobs
    }
}
