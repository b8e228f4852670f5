use std::collections::HashMap;

use super::ids::{ActionId, EffectId, EntityId, PropertyId};

/// Persistent effects held by one entity.
///
/// `main` holds every effect that is currently applied, unique or not.
/// `active_unique` is the subset of `main` that won arbitration for its
/// unique id. `inactive_unique` holds parked losers, which are held but not
/// applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistentEffects {
    pub(crate) main: Vec<EffectId>,
    pub(crate) active_unique: Vec<EffectId>,
    pub(crate) inactive_unique: Vec<EffectId>,
}

impl PersistentEffects {
    pub fn main(&self) -> &[EffectId] {
        &self.main
    }

    pub fn active_unique(&self) -> &[EffectId] {
        &self.active_unique
    }

    pub fn inactive_unique(&self) -> &[EffectId] {
        &self.inactive_unique
    }

    pub fn is_active(&self, effect: EffectId) -> bool {
        self.main.contains(&effect)
    }

    pub fn is_parked(&self, effect: EffectId) -> bool {
        self.inactive_unique.contains(&effect)
    }

    pub fn contains(&self, effect: EffectId) -> bool {
        self.is_active(effect) || self.is_parked(effect)
    }

    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }
}

/// A game object: character, item, accessory.
///
/// Entities are created through [`World::spawn_entity`](super::World::spawn_entity)
/// and mutated only through the world, which keeps the cross-references
/// (property parents, modifier bindings, requirement bindings) consistent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entity {
    key: String,
    display_name: Option<String>,
    pub(crate) properties: Vec<PropertyId>,
    pub(crate) by_name: HashMap<String, PropertyId>,
    pub(crate) accessories: Vec<EntityId>,
    /// Effects each equipped accessory contributed to this entity.
    pub(crate) equipped: HashMap<EntityId, Vec<EffectId>>,
    pub(crate) effects: PersistentEffects,
    pub(crate) abilities: Vec<ActionId>,
}

impl Entity {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Caller-chosen identifier, stable across sessions.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.key)
    }

    /// Properties in insertion order.
    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<PropertyId> {
        self.by_name.get(name).copied()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn accessories(&self) -> &[EntityId] {
        &self.accessories
    }

    /// Effects `accessory` contributed when it was equipped here.
    pub fn contributed_by(&self, accessory: EntityId) -> &[EffectId] {
        self.equipped.get(&accessory).map_or(&[], Vec::as_slice)
    }

    pub fn effects(&self) -> &PersistentEffects {
        &self.effects
    }

    pub fn abilities(&self) -> &[ActionId] {
        &self.abilities
    }
}
