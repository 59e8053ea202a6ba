//! In-memory charm store for tests.
//!
//! The crate stands in for a remote charm repository: charms, bundles and
//! resource lists are stored per channel and per charm URL, and URLs without a
//! revision are resolved against per-channel revision counters at read time.
//! Nothing goes over the network and nothing outlives the process.
//!
//! Typical setup seeds a [`Repository`] (directly, or from a JSON fixture via
//! [`load_fixture_from_path`]) and hands the code under test a [`FakeClient`]
//! or [`ChannelAwareFakeClient`] over it.

pub mod blob;
pub mod charm;
pub mod client;
pub mod error;
pub mod fixture;
pub mod repository;
pub mod spaces;

pub use blob::BlobStore;
pub use charm::{
    Bundle, Channel, Charm, CharmUrl, GenerationVersion, Resource, ResourceType, SUPPORTED_SERIES,
};
pub use client::{ChannelAwareFakeClient, FakeClient, SharedRepository, share};
pub use error::{ParseError, StoreError, StoreResult};
pub use fixture::{BlobContent, RepositoryFixture, load_fixture_from_path, load_fixture_from_str};
pub use repository::Repository;
pub use spaces::{
    Environ, NetworkingEnviron, ReloadError, SpaceInfo, SpaceStore, SubnetInfo, reload_spaces,
};
