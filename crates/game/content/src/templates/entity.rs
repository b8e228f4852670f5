//! Entity templates.

use std::collections::BTreeMap;

use rpg_core::{CoreResult, Entity, EntityId, PropertySpec, World};

/// Blueprint for an entity and its starting properties.
///
/// RON example:
/// ```ron
/// (
///     key: "ring_of_vigor",
///     display_name: Some("Ring of Vigor"),
///     statistics: { "Weight": 1.0 },
///     equip_effects: ["+50 HP", "-50% Intellect"],
/// )
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityTemplate {
    pub key: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_name: Option<String>,
    /// Statistic name to base value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub statistics: BTreeMap<String, f64>,
    /// Resource shorthand such as `"50/50 Mana"`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub resources: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: BTreeMap<String, bool>,
    /// Fully specified properties, for bounds, cooldowns or display names.
    #[cfg_attr(feature = "serde", serde(default))]
    pub properties: Vec<PropertySpec>,
    /// Modifier shorthand granted to whoever equips this entity.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equip_effects: Vec<String>,
}

impl EntityTemplate {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_statistic(mut self, name: impl Into<String>, base: f64) -> Self {
        self.statistics.insert(name.into(), base);
        self
    }

    pub fn with_resource(mut self, shorthand: impl Into<String>) -> Self {
        self.resources.push(shorthand.into());
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    pub fn with_equip_effect(mut self, shorthand: impl Into<String>) -> Self {
        self.equip_effects.push(shorthand.into());
        self
    }

    /// Spawns the entity with every templated property.
    ///
    /// A template that fails halfway leaves nothing behind: the partially
    /// built entity is despawned before the error is returned.
    pub fn spawn(&self, world: &mut World) -> CoreResult<EntityId> {
        let mut entity = Entity::new(self.key.clone());
        if let Some(display_name) = &self.display_name {
            entity = entity.with_display_name(display_name.clone());
        }
        let id = world.spawn(entity);

        if let Err(err) = self.populate(world, id) {
            tracing::warn!(template = %self.key, error = %err, "entity template failed");
            world.despawn_entity(id)?;
            return Err(err);
        }
        tracing::debug!(template = %self.key, entity = %id, "spawned from template");
        Ok(id)
    }

    fn populate(&self, world: &mut World, id: EntityId) -> CoreResult<()> {
        for (name, base) in &self.statistics {
            world.add_statistic(id, name.clone(), *base)?;
        }
        for shorthand in &self.resources {
            world.add_resource_str(id, shorthand)?;
        }
        for (name, value) in &self.flags {
            world.add_flag(id, name.clone(), *value)?;
        }
        for spec in &self.properties {
            world.insert_property(id, spec.build()?)?;
        }
        for shorthand in &self.equip_effects {
            world.add_equip_effect(id, shorthand)?;
        }
        Ok(())
    }
}
