//! Charm store vocabulary.
//!
//! Identity types (`CharmUrl`, `Channel`, `GenerationVersion`) live in
//! `identity`; the opaque payloads the repository stores live in `model`.

pub mod identity;
pub mod model;

pub use identity::{Channel, CharmUrl, GenerationVersion};
pub use model::{Bundle, Charm, Resource, ResourceType, SUPPORTED_SERIES};
