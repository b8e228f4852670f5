//! Property registration on entities.

use crate::error::CoreResult;
use crate::parse;
use crate::stats::{Resource, Statistic};

use super::events::WorldEvent;
use super::ids::{EffectId, EntityId, PropertyId};
use super::property::{Property, PropertyError, PropertyValue};
use super::world::World;

impl World {
    /// Binds an unbound property to `entity`.
    ///
    /// Persistent modifier effects already held by the entity that target
    /// this property's name are bound to it immediately.
    pub fn add_property(&mut self, entity: EntityId, property: PropertyId) -> CoreResult<()> {
        self.attach_property(entity, property)?;
        self.settle();
        Ok(())
    }

    /// Stores `property` and binds it to `entity` in one step.
    pub fn insert_property(&mut self, entity: EntityId, property: Property) -> CoreResult<PropertyId> {
        let id = self.create_property(property);
        if let Err(err) = self.attach_property(entity, id) {
            self.properties.remove(id.0);
            return Err(err);
        }
        self.settle();
        Ok(id)
    }

    pub fn add_statistic(
        &mut self,
        entity: EntityId,
        name: impl Into<String>,
        base: f64,
    ) -> CoreResult<PropertyId> {
        self.insert_property(entity, Property::new(name, Statistic::new(base)))
    }

    pub fn add_resource(
        &mut self,
        entity: EntityId,
        name: impl Into<String>,
        current: f64,
        max: f64,
    ) -> CoreResult<PropertyId> {
        self.insert_property(entity, Property::new(name, Resource::new(current, max)))
    }

    /// Adds a resource from `"current/max Name"` shorthand.
    pub fn add_resource_str(&mut self, entity: EntityId, text: &str) -> CoreResult<PropertyId> {
        let parsed = parse::parse_resource(text)?;
        self.add_resource(entity, parsed.name, parsed.current, parsed.max)
    }

    pub fn add_flag(
        &mut self,
        entity: EntityId,
        name: impl Into<String>,
        flag: bool,
    ) -> CoreResult<PropertyId> {
        self.insert_property(entity, Property::new(name, PropertyValue::Flag(flag)))
    }

    /// Removes the entity's property with this name. Returns false if there
    /// was none, so repeated calls are harmless.
    pub fn remove_property(&mut self, entity: EntityId, name: &str) -> CoreResult<bool> {
        let Some(property) = self.entity_ref(entity)?.property(name) else {
            return Ok(false);
        };
        let removed = self.detach_property(entity, property)?;
        self.settle();
        Ok(removed)
    }

    /// Removes exactly this property instance. A different instance with the
    /// same name is left in place.
    pub fn remove_property_ref(&mut self, entity: EntityId, property: PropertyId) -> CoreResult<bool> {
        let name = self.property_ref(property)?.name();
        if self.entity_ref(entity)?.property(name) != Some(property) {
            return Ok(false);
        }
        let removed = self.detach_property(entity, property)?;
        self.settle();
        Ok(removed)
    }

    /// Detaches the property from its entity and unbinds every modifier,
    /// including ones added directly with [`World::add_modifier`].
    pub fn reset_property(&mut self, property: PropertyId) -> CoreResult<()> {
        if let Some(entity) = self.property_ref(property)?.parent() {
            self.detach_property(entity, property)?;
        }
        let modifiers = self.property_ref(property)?.modifiers().to_vec();
        for effect in modifiers {
            self.unmodify(effect, property)?;
        }
        self.settle();
        Ok(())
    }

    /// Replaces a property payload, carrying bound modifiers over to the new value.
    pub fn set_property_value(&mut self, property: PropertyId, value: PropertyValue) -> CoreResult<()> {
        let modifiers = self.property_ref(property)?.modifiers().to_vec();
        for effect in &modifiers {
            self.unmodify(*effect, property)?;
        }
        self.property_mut(property)?.set_value(value);
        for effect in modifiers {
            self.modify(effect, property)?;
        }
        self.settle();
        Ok(())
    }

    pub(crate) fn attach_property(&mut self, entity: EntityId, property: PropertyId) -> CoreResult<()> {
        let candidate = self.property_ref(property)?;
        let name = candidate.name().to_owned();
        if candidate.is_bound() {
            return Err(PropertyError::AlreadyBound { name }.into());
        }

        let owner = self.entity_mut(entity)?;
        if owner.has_property(&name) {
            return Err(PropertyError::DuplicateName { name }.into());
        }
        owner.properties.push(property);
        owner.by_name.insert(name.clone(), property);
        self.property_mut(property)?.set_parent(Some(entity));

        for effect in self.pending_modifiers(entity, &name)? {
            self.modify(effect, property)?;
        }

        tracing::debug!(entity = %entity, property = %name, "property added");
        self.emit(WorldEvent::PropertyAdded {
            entity,
            property,
            name,
        });
        self.rebind_abilities(entity)?;
        Ok(())
    }

    pub(crate) fn detach_property(&mut self, entity: EntityId, property: PropertyId) -> CoreResult<bool> {
        let name = self.property_ref(property)?.name().to_owned();
        let owner = self.entity_mut(entity)?;
        if owner.by_name.get(&name) != Some(&property) {
            return Ok(false);
        }
        owner.by_name.remove(&name);
        owner.properties.retain(|id| *id != property);

        let modifiers = self.property_ref(property)?.modifiers().to_vec();
        for effect in modifiers {
            self.unmodify(effect, property)?;
        }
        self.property_mut(property)?.set_parent(None);

        tracing::debug!(entity = %entity, property = %name, "property removed");
        self.emit(WorldEvent::PropertyRemoved {
            entity,
            property,
            name,
        });
        self.rebind_abilities(entity)?;
        Ok(true)
    }

    /// Active, unbound modifier effects on `entity` that target `name`.
    fn pending_modifiers(&self, entity: EntityId, name: &str) -> CoreResult<Vec<EffectId>> {
        let owner = self.entity_ref(entity)?;
        Ok(owner
            .effects
            .main
            .iter()
            .copied()
            .filter(|id| {
                self.effect(*id).is_some_and(|effect| {
                    effect.target_property() == Some(name)
                        && effect
                            .as_modifier()
                            .is_some_and(|modifier| modifier.bound.is_none())
                })
            })
            .collect())
    }
}
