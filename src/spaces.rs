//! Reloading network spaces and subnets from a cloud provider.
//!
//! This is a single append-only pass: ask the provider what it knows and hand
//! the answer to the store. Nothing is diffed and nothing is deleted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubnetInfo {
    pub cidr: String,
    #[serde(default)]
    pub provider_id: String,
    #[serde(default)]
    pub availability_zones: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpaceInfo {
    pub name: String,
    #[serde(default)]
    pub provider_id: String,
    #[serde(default)]
    pub subnets: Vec<SubnetInfo>,
}

/// Where discovered spaces and subnets get persisted.
pub trait SpaceStore {
    fn save_spaces_from_provider(&mut self, spaces: &[SpaceInfo]) -> anyhow::Result<()>;

    /// Save `subnets` under `space_id`; an empty id means no space.
    fn save_subnets_from_provider(
        &mut self,
        subnets: &[SubnetInfo],
        space_id: &str,
    ) -> anyhow::Result<()>;
}

/// Provider side of the reload.
pub trait NetworkingEnviron {
    fn supports_space_discovery(&self) -> anyhow::Result<bool>;
    fn spaces(&self) -> anyhow::Result<Vec<SpaceInfo>>;
    fn subnets(&self) -> anyhow::Result<Vec<SubnetInfo>>;
}

/// An environ that may or may not expose networking.
pub trait Environ {
    fn networking(&self) -> Option<&dyn NetworkingEnviron>;
}

#[derive(Error, Debug)]
pub enum ReloadError {
    #[error("spaces discovery in a non-networking environ not supported")]
    NotSupported,

    #[error("querying provider: {0:#}")]
    Provider(anyhow::Error),

    #[error("saving to state: {0:#}")]
    Store(anyhow::Error),
}

/// Load spaces (or, failing discovery support, bare subnets) from `environ`
/// into `store`.
pub fn reload_spaces(
    store: &mut dyn SpaceStore,
    environ: &dyn Environ,
) -> Result<(), ReloadError> {
    let net = environ.networking().ok_or(ReloadError::NotSupported)?;

    if net
        .supports_space_discovery()
        .map_err(ReloadError::Provider)?
    {
        let spaces = net.spaces().map_err(ReloadError::Provider)?;
        return store
            .save_spaces_from_provider(&spaces)
            .map_err(ReloadError::Store);
    }

    tracing::debug!("environ does not support space discovery, falling back to subnet discovery");
    let subnets = net.subnets().map_err(ReloadError::Provider)?;
    store
        .save_subnets_from_provider(&subnets, "")
        .map_err(ReloadError::Store)
}
