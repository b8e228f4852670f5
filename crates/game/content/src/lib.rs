//! Data-driven content definitions and loaders.
//!
//! This crate turns data files into rpg-core objects:
//! - Entity templates (statistics, resources, flags, equipment effects)
//! - Action templates (requirements, timing, begin/periodic/end effects)
//! - Engine configuration (TOML)
//!
//! Templates only call the public [`rpg_core::World`] API, so anything they
//! build could equally be built by hand.

pub mod templates;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use templates::{ActionTemplate, EntityTemplate, RequirementTemplate};

#[cfg(feature = "loaders")]
pub use loaders::{ActionLoader, ConfigLoader, ContentFactory, EntityLoader, LoadResult};
