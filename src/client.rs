//! Client façades over a shared [`Repository`].
//!
//! Two calling styles are supported, mirroring the two ways registry clients
//! get used:
//!
//! - [`FakeClient`] takes the channel as an argument on every call.
//! - [`ChannelAwareFakeClient`] carries its channel between calls; build one
//!   with `FakeClient::new(None).with_channel(channel)`.
//!
//! Both hold a handle to the same repository rather than a copy, so uploads
//! through one are visible through the other. The handle is `Rc<RefCell<_>>`:
//! clients are single-threaded.

use crate::charm::{Bundle, Channel, Charm, CharmUrl, Resource};
use crate::error::StoreResult;
use crate::repository::Repository;
use std::cell::RefCell;
use std::io::{Read, Write};
use std::rc::Rc;

/// Repository handle shared between clients and test setup code.
pub type SharedRepository = Rc<RefCell<Repository>>;

/// Wrap `repo` so clients and setup code can share it.
pub fn share(repo: Repository) -> SharedRepository {
    Rc::new(RefCell::new(repo))
}

/// Stateless client: every channel-scoped call names its channel.
///
/// Clones share the same repository handle. The repository's active channel
/// is never read or changed through this client.
#[derive(Clone, Debug)]
pub struct FakeClient {
    repo: SharedRepository,
}

impl FakeClient {
    /// Client over `repo`, or over a fresh empty repository when `None`.
    pub fn new(repo: Option<SharedRepository>) -> Self {
        Self {
            repo: repo.unwrap_or_else(|| share(Repository::new())),
        }
    }

    pub fn repository(&self) -> SharedRepository {
        Rc::clone(&self.repo)
    }

    /// Copy the raw blob stored at `path` into `out`.
    pub fn get<W: Write>(&self, path: &str, out: W) -> StoreResult<()> {
        self.repo.borrow().blobs().get_into(path, out)
    }

    pub fn put_blob(&self, path: &str, data: impl Into<Vec<u8>>) {
        self.repo.borrow_mut().blobs_mut().put(path, data);
    }

    pub fn put_blob_reader<R: Read>(&self, path: &str, reader: R) -> StoreResult<()> {
        self.repo.borrow_mut().blobs_mut().put_reader(path, reader)
    }

    pub fn resolve(&self, url: &CharmUrl, channel: Channel) -> CharmUrl {
        self.repo.borrow().resolve_in(channel, url)
    }

    pub fn get_charm(&self, url: &CharmUrl, channel: Channel) -> StoreResult<Charm> {
        self.repo.borrow().get_in(channel, url).cloned()
    }

    pub fn get_bundle(&self, url: &CharmUrl, channel: Channel) -> StoreResult<Bundle> {
        self.repo.borrow().get_bundle_in(channel, url).cloned()
    }

    pub fn list_resources(&self, url: &CharmUrl, channel: Channel) -> StoreResult<Vec<Resource>> {
        self.repo
            .borrow()
            .resources_in(channel, url)
            .map(<[Resource]>::to_vec)
    }

    pub fn upload_charm(&self, url: CharmUrl, channel: Channel, charm: Charm) {
        self.repo.borrow_mut().upload_charm_in(channel, url, charm);
    }

    pub fn upload_bundle(&self, url: CharmUrl, channel: Channel, bundle: Bundle) {
        self.repo.borrow_mut().upload_bundle_in(channel, url, bundle);
    }

    pub fn upload_resources(&self, url: CharmUrl, channel: Channel, resources: Vec<Resource>) {
        self.repo
            .borrow_mut()
            .upload_resources_in(channel, url, resources);
    }

    /// Stateful client bound to `channel`, sharing this client's repository.
    pub fn with_channel(&self, channel: Channel) -> ChannelAwareFakeClient {
        ChannelAwareFakeClient {
            channel,
            charmstore: self.clone(),
        }
    }
}

impl Default for FakeClient {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Client that remembers which channel it talks about.
#[derive(Clone, Debug)]
pub struct ChannelAwareFakeClient {
    channel: Channel,
    charmstore: FakeClient,
}

impl ChannelAwareFakeClient {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Raw blob retrieval. Blobs are not channel scoped, so the channel is
    /// ignored here.
    pub fn get<W: Write>(&self, path: &str, out: W) -> StoreResult<()> {
        self.charmstore.get(path, out)
    }

    /// A copy bound to `channel`; `self` keeps its own channel.
    pub fn with_channel(&self, channel: Channel) -> ChannelAwareFakeClient {
        ChannelAwareFakeClient {
            channel,
            charmstore: self.charmstore.clone(),
        }
    }

    pub fn resolve(&self, url: &CharmUrl) -> CharmUrl {
        self.charmstore.resolve(url, self.channel)
    }

    pub fn get_charm(&self, url: &CharmUrl) -> StoreResult<Charm> {
        self.charmstore.get_charm(url, self.channel)
    }

    pub fn get_bundle(&self, url: &CharmUrl) -> StoreResult<Bundle> {
        self.charmstore.get_bundle(url, self.channel)
    }

    pub fn list_resources(&self, url: &CharmUrl) -> StoreResult<Vec<Resource>> {
        self.charmstore.list_resources(url, self.channel)
    }

    pub fn upload_charm(&self, url: CharmUrl, charm: Charm) {
        self.charmstore.upload_charm(url, self.channel, charm);
    }

    pub fn upload_bundle(&self, url: CharmUrl, bundle: Bundle) {
        self.charmstore.upload_bundle(url, self.channel, bundle);
    }

    pub fn upload_resources(&self, url: CharmUrl, resources: Vec<Resource>) {
        self.charmstore
            .upload_resources(url, self.channel, resources);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(text: &str) -> CharmUrl {
        CharmUrl::parse(text).unwrap()
    }

    #[test]
    fn clients_share_one_repository() {
        let repo = share(Repository::new());
        let client = FakeClient::new(Some(Rc::clone(&repo)));
        repo.borrow_mut()
            .upload_charm(url("mysql-0"), Charm::new("mysql"));
        assert_eq!(
            client.get_charm(&url("mysql"), Channel::Stable).unwrap().name,
            "mysql"
        );

        let edge = client.with_channel(Channel::Edge);
        edge.upload_charm(url("redis-0"), Charm::new("redis"));
        assert!(repo.borrow().get_in(Channel::Edge, &url("redis")).is_ok());
        assert!(repo.borrow().get(&url("redis")).is_err());
    }

    #[test]
    fn explicit_channel_does_not_touch_active_channel() {
        let client = FakeClient::default();
        client.upload_charm(url("foo-0"), Channel::Candidate, Charm::new("foo"));
        assert!(client.get_charm(&url("foo"), Channel::Candidate).is_ok());
        assert!(client.get_charm(&url("foo"), Channel::Stable).is_err());
        assert_eq!(client.repository().borrow().channel(), Channel::Stable);
    }

    #[test]
    fn rebinding_leaves_original_channel() {
        let client = FakeClient::default();
        let stable = client.with_channel(Channel::Stable);
        let edge = stable.with_channel(Channel::Edge);
        assert_eq!(stable.channel(), Channel::Stable);
        assert_eq!(edge.channel(), Channel::Edge);
        assert!(Rc::ptr_eq(
            &stable.charmstore.repository(),
            &edge.charmstore.repository()
        ));
    }

    #[test]
    fn stateful_get_ignores_channel() {
        let client = FakeClient::default();
        client.put_blob("/resources/site.zip", b"zip".to_vec());
        let mut out = Vec::<u8>::new();
        client
            .with_channel(Channel::Unpublished)
            .get("/resources/site.zip", &mut out)
            .unwrap();
        assert_eq!(out, b"zip");
    }

    #[test]
    fn stateful_reads_use_bound_channel() {
        let client = FakeClient::default();
        client
            .repository()
            .borrow_mut()
            .set_revision_in(Channel::Beta, &url("mysql"), 4);
        let beta = client.with_channel(Channel::Beta);
        assert_eq!(beta.resolve(&url("mysql")), url("mysql-4"));
        assert_eq!(client.resolve(&url("mysql"), Channel::Stable), url("mysql-0"));

        beta.upload_bundle(url("wiki"), Bundle::new("wiki"));
        assert!(beta.get_bundle(&url("wiki")).is_ok());
        assert!(beta.with_channel(Channel::Edge).get_bundle(&url("wiki")).is_err());
        assert!(beta.list_resources(&url("mysql-4")).unwrap_err().is_not_found());
    }
}
