//! Equipping entities onto other entities.
//!
//! Equipping persists every effect referenced by the accessory's marker
//! properties ([`PropertyValue::Effect`]) on the wearer; unequipping removes
//! them again.

use crate::effect::{Effect, EffectError, EffectSource};
use crate::error::{CoreError, CoreResult};

use super::events::WorldEvent;
use super::ids::{EffectId, EntityId};
use super::property::{Property, PropertyValue};
use super::world::World;

impl World {
    /// Returns false if the accessory was already equipped on `entity`.
    ///
    /// Either every carried effect is held by the wearer or none is: a
    /// failure part way releases what was already held and leaves the
    /// accessory unequipped.
    pub fn add_accessory(&mut self, entity: EntityId, accessory: EntityId) -> CoreResult<bool> {
        if entity == accessory {
            return Err(CoreError::SelfAccessory(entity));
        }
        let carried = self.carried_effects(accessory)?;
        if self.entity_ref(entity)?.accessories.contains(&accessory) {
            return Ok(false);
        }
        for effect in &carried {
            if self.effect_ref(*effect)?.holder().is_some_and(|holder| holder != entity) {
                return Err(EffectError::HeldElsewhere.into());
            }
        }

        let mut contributed = Vec::with_capacity(carried.len());
        for effect in carried {
            if self.effect_ref(effect)?.holder().is_some() {
                continue;
            }
            if let Err(err) = self.hold_effect(entity, effect) {
                for held in contributed.iter().rev() {
                    self.release_effect(entity, *held)?;
                }
                tracing::warn!(entity = %entity, accessory = %accessory, error = %err, "equip rolled back");
                return Err(err);
            }
            contributed.push(effect);
        }

        let wearer = self.entity_mut(entity)?;
        wearer.accessories.push(accessory);
        wearer.equipped.insert(accessory, contributed);
        tracing::debug!(entity = %entity, accessory = %accessory, "accessory equipped");
        self.emit(WorldEvent::AccessoryAdded { entity, accessory });
        self.settle();
        Ok(true)
    }

    /// Returns false if the accessory was not equipped on `entity`.
    ///
    /// Releases exactly the effects the accessory contributed when it was
    /// equipped, even if its marker properties changed since.
    pub fn remove_accessory(&mut self, entity: EntityId, accessory: EntityId) -> CoreResult<bool> {
        let wearer = self.entity_mut(entity)?;
        let before = wearer.accessories.len();
        wearer.accessories.retain(|id| *id != accessory);
        if wearer.accessories.len() == before {
            return Ok(false);
        }
        let contributed = wearer.equipped.remove(&accessory).unwrap_or_default();

        for effect in contributed {
            if self.effect(effect).is_some() {
                self.release_effect(entity, effect)?;
            }
        }
        tracing::debug!(entity = %entity, accessory = %accessory, "accessory unequipped");
        self.emit(WorldEvent::AccessoryRemoved { entity, accessory });
        self.settle();
        Ok(true)
    }

    /// Gives `accessory` an equip effect parsed from modifier shorthand such
    /// as `"+50 HP"`. The marker property is named `mod<Target>`.
    pub fn add_equip_effect(&mut self, accessory: EntityId, text: &str) -> CoreResult<EffectId> {
        let effect = Effect::parse(text)?;
        self.add_equip_effect_from(accessory, effect)
    }

    pub fn add_equip_effect_from(&mut self, accessory: EntityId, effect: Effect) -> CoreResult<EffectId> {
        let marker = format!("mod{}", effect.target_property().unwrap_or_default());
        let effect = if effect.source().is_none() {
            effect.with_source(EffectSource::Entity(accessory))
        } else {
            effect
        };
        let effect = self.create_effect(effect);
        if let Err(err) = self.insert_property(accessory, Property::new(marker, PropertyValue::Effect(effect))) {
            self.effects.remove(effect.0);
            return Err(err);
        }
        Ok(effect)
    }

    fn carried_effects(&self, accessory: EntityId) -> CoreResult<Vec<EffectId>> {
        let item = self.entity_ref(accessory)?;
        Ok(item
            .properties
            .iter()
            .filter_map(|id| self.property(*id).and_then(Property::parent_effect))
            .collect())
    }
}
