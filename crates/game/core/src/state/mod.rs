//! Authoritative world state.
//!
//! [`World`] owns every entity, property, effect and action in generational
//! arenas and hands out copyable ids. All mutation flows through `&mut World`
//! methods split by concern:
//!
//! - `properties`: attach, detach and replace properties
//! - `modifiers`: bind modifier effects to properties
//! - `persistence`: persistent and instant effect application, arbitration
//! - `accessories`: equipment relationships and carried effects
//! - `update`: time advancement and readiness settling
pub mod entity;
pub mod events;
pub mod ids;
pub mod property;
pub mod world;

mod accessories;
mod modifiers;
mod persistence;
mod properties;
mod update;

pub use entity::{Entity, PersistentEffects};
pub use events::{EventObserver, Topic, WorldEvent};
pub use ids::{ActionId, EffectId, EntityId, PropertyId, SubscriptionId};
pub use property::{Property, PropertyError, PropertySpec, PropertyValue, ValueSpec};
pub use world::World;
