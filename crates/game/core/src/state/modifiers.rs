//! Modifier ↔ property binding.
//!
//! A modifier effect is bound to at most one property. Binding applies its
//! contribution and lists the effect among the property's modifiers;
//! unbinding reverses both. Changing a bound modifier's value or operation is
//! done as unbind-change-rebind so totals stay exact.

use crate::effect::{EffectError, ModifierEffect, ModifierOperation};
use crate::error::{CoreError, CoreResult};

use super::events::WorldEvent;
use super::ids::{EffectId, PropertyId};
use super::world::World;

impl World {
    /// Applies a modifier effect directly to a property, outside of any
    /// entity's persistent set. Returns false if the modifier is already bound.
    pub fn add_modifier(&mut self, property: PropertyId, effect: EffectId) -> CoreResult<bool> {
        let bound = self.modify(effect, property)?;
        self.settle();
        Ok(bound)
    }

    /// Removes a modifier from the property it is bound to. Returns false if
    /// it was not bound to `property`.
    pub fn remove_modifier(&mut self, property: PropertyId, effect: EffectId) -> CoreResult<bool> {
        let unbound = self.unmodify(effect, property)?;
        self.settle();
        Ok(unbound)
    }

    pub fn set_modifier_value(&mut self, effect: EffectId, value: f64) -> CoreResult<()> {
        self.change_modifier(effect, |modifier| modifier.set_value(value))
    }

    pub fn set_modifier_operation(
        &mut self,
        effect: EffectId,
        operation: ModifierOperation,
    ) -> CoreResult<()> {
        self.change_modifier(effect, |modifier| modifier.set_operation(operation))
    }

    pub(crate) fn modifier_of(&self, effect: EffectId) -> CoreResult<&ModifierEffect> {
        let candidate = self.effect_ref(effect)?;
        candidate.as_modifier().ok_or_else(|| {
            EffectError::WrongKind {
                expected: "modifier",
                found: candidate.kind().name(),
            }
            .into()
        })
    }

    pub(crate) fn modify(&mut self, effect: EffectId, property: PropertyId) -> CoreResult<bool> {
        if self.modifier_of(effect)?.bound.is_some() {
            return Ok(false);
        }
        let target = self
            .properties
            .get_mut(property.0)
            .ok_or(CoreError::MissingProperty(property))?;
        let modifier = self
            .effects
            .get_mut(effect.0)
            .ok_or(CoreError::MissingEffect(effect))?
            .modifier_mut()?;

        modifier.apply_to(target, 1.0)?;
        modifier.bound = Some(property);
        target.push_modifier(effect);
        tracing::trace!(effect = %effect, property = target.name(), "modifier bound");
        Ok(true)
    }

    pub(crate) fn unmodify(&mut self, effect: EffectId, property: PropertyId) -> CoreResult<bool> {
        if self.modifier_of(effect)?.bound != Some(property) {
            return Ok(false);
        }
        let target = self
            .properties
            .get_mut(property.0)
            .ok_or(CoreError::MissingProperty(property))?;
        let modifier = self
            .effects
            .get_mut(effect.0)
            .ok_or(CoreError::MissingEffect(effect))?
            .modifier_mut()?;

        modifier.apply_to(target, -1.0)?;
        modifier.bound = None;
        target.remove_modifier(effect);
        tracing::trace!(effect = %effect, property = target.name(), "modifier unbound");
        Ok(true)
    }

    fn change_modifier(
        &mut self,
        effect: EffectId,
        change: impl FnOnce(&mut ModifierEffect),
    ) -> CoreResult<()> {
        let Some(property) = self.modifier_of(effect)?.bound else {
            change(self.effect_mut(effect)?.modifier_mut()?);
            return Ok(());
        };

        self.emit(WorldEvent::ModifierChanging { effect, property });
        let target = self
            .properties
            .get_mut(property.0)
            .ok_or(CoreError::MissingProperty(property))?;
        let modifier = self
            .effects
            .get_mut(effect.0)
            .ok_or(CoreError::MissingEffect(effect))?
            .modifier_mut()?;

        modifier.apply_to(target, -1.0)?;
        change(modifier);
        modifier.apply_to(target, 1.0)?;
        self.emit(WorldEvent::ModifierChanged { effect, property });
        self.settle();
        Ok(())
    }
}
