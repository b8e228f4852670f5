//! Content blueprints that build live objects through the [`rpg_core::World`] API.

pub mod action;
pub mod entity;

pub use action::{ActionTemplate, RequirementTemplate};
pub use entity::EntityTemplate;
