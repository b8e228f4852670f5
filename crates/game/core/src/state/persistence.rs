//! Persistent effects and unique-id arbitration.
//!
//! ## Arbitration
//!
//! Effects without a unique id always apply. Among effects sharing a unique
//! id, only the strongest is applied; the rest are parked. A newcomer
//! replaces the incumbent only when strictly stronger, and removing the
//! active effect promotes the first-encountered strongest parked one.
//!
//! ## Apply protocol
//!
//! | call              | effect not held                   | effect held by E            |
//! |-------------------|-----------------------------------|-----------------------------|
//! | `apply_persist`   | arbitrate on target               | `AlreadyPersisted` if active|
//! | `unapply`         | instant reversal on given target  | remove from E               |
//! | `apply_instant`   | one-shot change, nothing recorded | same                        |

use crate::effect::{
    Effect, EffectError, EffectKind, EffectSource, EffectSpec, EffectSpecKind, FormulaSide,
    ModifierOperation,
};
use crate::error::{CoreError, CoreResult};
use crate::parse;
use crate::stats::ValueSourceDescriptor;

use super::events::WorldEvent;
use super::ids::{EffectId, EntityId, PropertyId};
use super::property::Property;
use super::world::World;

/// Kind-specific work, detached from the effect borrow.
enum Payload {
    Modifier(Option<String>),
    Definition(Property),
    Composite(Vec<EffectId>),
    Periodic,
}

impl World {
    // ========================================================================
    // Public API
    // ========================================================================

    /// Adds `effect` to the entity's persistent effects. Returns whether the
    /// effect is now applied (false when parked behind a stronger effect).
    pub fn add_persistent_effect(&mut self, entity: EntityId, effect: EffectId) -> CoreResult<bool> {
        let active = self.hold_effect(entity, effect)?;
        self.settle();
        Ok(active)
    }

    /// Removes `effect` from the entity, unapplying it if it was active.
    /// Returns false if the entity did not hold it.
    pub fn remove_persistent_effect(&mut self, entity: EntityId, effect: EffectId) -> CoreResult<bool> {
        let removed = self.release_effect(entity, effect)?;
        self.settle();
        Ok(removed)
    }

    /// True if the entity holds the effect, applied or parked.
    pub fn has_persistent_effect(&self, entity: EntityId, effect: EffectId) -> bool {
        self.entity(entity)
            .is_some_and(|owner| owner.effects.contains(effect))
    }

    /// Persists `effect` on `target`. Fails if it is already persisted.
    pub fn apply_persist(&mut self, effect: EffectId, target: EntityId) -> CoreResult<bool> {
        let active = self.persist_on(effect, target)?;
        self.settle();
        Ok(active)
    }

    /// Reverses an effect: removes it from its holder when held, otherwise
    /// reverses an instant application on `target`.
    pub fn unapply(&mut self, effect: EffectId, target: Option<EntityId>) -> CoreResult<()> {
        match (self.effect_ref(effect)?.holder(), target) {
            (Some(holder), _) => {
                self.release_effect(holder, effect)?;
            }
            (None, Some(target)) => self.revert_instant(effect, target)?,
            (None, None) => return Err(EffectError::NotPersisted.into()),
        }
        self.settle();
        Ok(())
    }

    /// One-shot application that leaves no record on the target.
    pub fn apply_instant(&mut self, effect: EffectId, target: EntityId) -> CoreResult<()> {
        self.apply_once(effect, target)?;
        self.settle();
        Ok(())
    }

    pub fn unapply_instant(&mut self, effect: EffectId, target: EntityId) -> CoreResult<()> {
        self.revert_instant(effect, target)?;
        self.settle();
        Ok(())
    }

    /// Sets the source of an effect and, for composites, of all descendants.
    pub fn set_effect_source(&mut self, effect: EffectId, source: Option<EffectSource>) -> CoreResult<()> {
        let children = match &self.effect_ref(effect)?.kind {
            EffectKind::Composite(composite) => composite.children.clone(),
            _ => Vec::new(),
        };
        self.effect_mut(effect)?.set_source(source.clone());
        for child in children {
            self.set_effect_source(child, source.clone())?;
        }
        Ok(())
    }

    /// Adds a child to a composite. If the composite is persisted, the child
    /// is persisted on the same entity right away.
    pub fn add_composite_child(&mut self, composite: EffectId, child: EffectId) -> CoreResult<()> {
        if composite == child || self.composite_contains(child, composite)? {
            return Err(EffectError::CyclicComposite.into());
        }
        let parent = self.effect_ref(composite)?;
        let source = parent.source().cloned();
        let target = parent.target_entity();
        self.effect_ref(child)?;

        match &mut self.effect_mut(composite)?.kind {
            EffectKind::Composite(group) => group.children.push(child),
            other => {
                return Err(EffectError::WrongKind {
                    expected: "composite",
                    found: other.name(),
                }
                .into());
            }
        }
        if source.is_some() {
            self.set_effect_source(child, source)?;
        }
        if let Some(target) = target {
            self.persist_on(child, target)?;
        }
        self.settle();
        Ok(())
    }

    /// Removes a child from a composite, unapplying it if the composite had
    /// persisted it.
    pub fn remove_composite_child(&mut self, composite: EffectId, child: EffectId) -> CoreResult<bool> {
        let target = self.effect_ref(composite)?.target_entity();
        let removed = match &mut self.effect_mut(composite)?.kind {
            EffectKind::Composite(group) => {
                let before = group.children.len();
                group.children.retain(|id| *id != child);
                group.children.len() != before
            }
            other => {
                return Err(EffectError::WrongKind {
                    expected: "composite",
                    found: other.name(),
                }
                .into());
            }
        };
        if removed && let Some(target) = target {
            self.release_effect(target, child)?;
        }
        self.settle();
        Ok(removed)
    }

    /// Builds live effects from a spec, composites recursively.
    pub fn spawn_effect(&mut self, spec: &EffectSpec, source: Option<EffectSource>) -> CoreResult<EffectId> {
        let mut effect = match &spec.kind {
            EffectSpecKind::Modifier {
                target,
                operation,
                value,
                field,
            } => match field {
                Some(field) => Effect::resource_modifier(target.clone(), *field, *value),
                None => {
                    let operation = operation.unwrap_or_else(|| {
                        ModifierOperation::infer(*value, self.config().additive_threshold)
                    });
                    Effect::modifier(target.clone(), operation, *value)
                }
            },
            EffectSpecKind::Shorthand(text) => {
                let parsed = parse::parse_modifier(text)?;
                Effect::modifier(parsed.target, parsed.operation, parsed.value)
            }
            EffectSpecKind::Calculated {
                target,
                operation,
                field,
                formula,
            } => match field {
                Some(field) => Effect::calculated_resource(target.clone(), *field, formula.clone()),
                None => Effect::calculated(
                    target.clone(),
                    operation.unwrap_or_default(),
                    formula.clone(),
                ),
            },
            EffectSpecKind::Define(property) => Effect::definition(property.build()?),
            EffectSpecKind::Composite(children) => {
                let mut ids = Vec::with_capacity(children.len());
                for child in children {
                    ids.push(self.spawn_effect(child, source.clone())?);
                }
                Effect::composite(ids)
            }
            EffectSpecKind::Periodic {
                total,
                period,
                call_initially,
            } => Effect::periodic(*total, *period, *call_initially),
        };

        if let Some(name) = &spec.name {
            effect = effect.with_name(name.clone());
        }
        if let Some(unique_id) = &spec.unique_id {
            effect = effect.with_unique_id(unique_id.clone());
        }
        if let Some(duration) = spec.duration {
            effect = effect.with_duration(duration);
        }
        if let Some(source) = source {
            effect = effect.with_source(source);
        }
        Ok(self.create_effect(effect))
    }

    /// Entity behind an effect's source: the entity itself, an action's
    /// owner, or the source of the parent effect.
    pub fn source_entity(&self, effect: EffectId) -> Option<EntityId> {
        let mut current = self.effect(effect)?;
        // a chain longer than the arena means the sources form a cycle
        for _ in 0..=self.effects.len() {
            match current.source()? {
                EffectSource::Entity(entity) => return Some(*entity),
                EffectSource::Action(action) => return self.action(*action)?.owner(),
                EffectSource::Effect(parent) => current = self.effect(*parent)?,
                EffectSource::Named(_) => return None,
            }
        }
        None
    }

    /// Refreshes a calculated modifier's value against `target` before it is
    /// applied. Bound modifiers keep their value until released.
    fn recalculate(&mut self, effect: EffectId, target: EntityId) -> CoreResult<()> {
        let modifier = self.modifier_of(effect)?;
        if modifier.bound.is_some() {
            return Ok(());
        }
        let Some(formula) = modifier.formula() else {
            return Ok(());
        };
        let source = self.source_entity(effect);
        let value = formula.evaluate(&|side: FormulaSide, descriptor: &ValueSourceDescriptor| {
            let entity = match side {
                FormulaSide::Source => source?,
                FormulaSide::Target => target,
            };
            self.value_of(entity, descriptor)
        });
        tracing::trace!(effect = %effect, value, "calculated modifier value");
        self.effect_mut(effect)?.modifier_mut()?.set_value(value);
        Ok(())
    }

    // ========================================================================
    // Holding and arbitration
    // ========================================================================

    pub(crate) fn persist_on(&mut self, effect: EffectId, target: EntityId) -> CoreResult<bool> {
        if self.effect_ref(effect)?.is_persisted() {
            return Err(EffectError::AlreadyPersisted.into());
        }
        self.hold_effect(target, effect)
    }

    pub(crate) fn hold_effect(&mut self, entity: EntityId, effect: EffectId) -> CoreResult<bool> {
        self.entity_ref(entity)?;
        let candidate = self.effect_ref(effect)?;
        match candidate.holder() {
            Some(holder) if holder == entity => return Ok(candidate.is_persisted()),
            Some(_) => return Err(EffectError::HeldElsewhere.into()),
            None => {}
        }
        if candidate.as_modifier().is_some() {
            self.recalculate(effect, entity)?;
        }

        let candidate = self.effect_ref(effect)?;
        let strength = candidate.strength();
        let Some(unique_id) = candidate.unique_id().map(str::to_owned) else {
            self.activate(entity, effect, false)?;
            return Ok(true);
        };

        match self.active_unique(entity, &unique_id)? {
            None => {
                self.activate(entity, effect, true)?;
                Ok(true)
            }
            Some(incumbent) if strength > self.effect_ref(incumbent)?.strength() => {
                tracing::debug!(
                    entity = %entity,
                    unique_id = %unique_id,
                    "stronger effect supersedes incumbent"
                );
                self.deactivate(entity, incumbent)?;
                self.park(entity, incumbent)?;
                if let Err(err) = self.activate(entity, effect, true) {
                    self.promote(entity, &unique_id)?;
                    return Err(err);
                }
                Ok(true)
            }
            Some(_) => {
                self.park(entity, effect)?;
                Ok(false)
            }
        }
    }

    pub(crate) fn release_effect(&mut self, entity: EntityId, effect: EffectId) -> CoreResult<bool> {
        self.entity_ref(entity)?;
        let held = self.effect_ref(effect)?;
        if held.holder() != Some(entity) {
            return Ok(false);
        }
        let unique_id = held.unique_id().map(str::to_owned);

        let owner = self.entity_mut(entity)?;
        if owner.effects.is_parked(effect) {
            owner.effects.inactive_unique.retain(|id| *id != effect);
            self.clear_holder(effect)?;
            return Ok(true);
        }
        let was_unique = owner.effects.active_unique.contains(&effect);

        self.deactivate(entity, effect)?;
        self.clear_holder(effect)?;

        if was_unique && let Some(unique_id) = unique_id {
            self.promote(entity, &unique_id)?;
        }
        Ok(true)
    }

    fn active_unique(&self, entity: EntityId, unique_id: &str) -> CoreResult<Option<EffectId>> {
        Ok(self
            .entity_ref(entity)?
            .effects
            .active_unique
            .iter()
            .copied()
            .find(|id| self.effect(*id).and_then(Effect::unique_id) == Some(unique_id)))
    }

    /// Activates the strongest parked effect with `unique_id`, first
    /// encountered on ties.
    fn promote(&mut self, entity: EntityId, unique_id: &str) -> CoreResult<()> {
        let mut best: Option<(EffectId, f64)> = None;
        for id in &self.entity_ref(entity)?.effects.inactive_unique {
            let Some(parked) = self.effect(*id) else {
                continue;
            };
            if parked.unique_id() != Some(unique_id) {
                continue;
            }
            let strength = parked.strength();
            if best.is_none_or(|(_, top)| strength > top) {
                best = Some((*id, strength));
            }
        }
        if let Some((effect, _)) = best {
            tracing::debug!(entity = %entity, effect = %effect, unique_id, "promoting parked effect");
            self.activate(entity, effect, true)?;
        }
        Ok(())
    }

    fn activate(&mut self, entity: EntityId, effect: EffectId, unique: bool) -> CoreResult<()> {
        let owner = self.entity_mut(entity)?;
        owner.effects.inactive_unique.retain(|id| *id != effect);
        owner.effects.main.push(effect);
        if unique {
            owner.effects.active_unique.push(effect);
        }
        let held = self.effect_mut(effect)?;
        held.holder = Some(entity);
        held.persisted = true;

        if let Err(err) = self.apply_payload(entity, effect) {
            tracing::warn!(entity = %entity, effect = %effect, error = %err, "effect failed to apply");
            let owner = self.entity_mut(entity)?;
            owner.effects.main.retain(|id| *id != effect);
            owner.effects.active_unique.retain(|id| *id != effect);
            self.clear_holder(effect)?;
            return Err(err);
        }
        self.emit(WorldEvent::EffectActivated { entity, effect });
        Ok(())
    }

    fn deactivate(&mut self, entity: EntityId, effect: EffectId) -> CoreResult<()> {
        let owner = self.entity_mut(entity)?;
        owner.effects.main.retain(|id| *id != effect);
        owner.effects.active_unique.retain(|id| *id != effect);
        self.effect_mut(effect)?.persisted = false;
        self.revert_payload(entity, effect)?;
        self.emit(WorldEvent::EffectDeactivated { entity, effect });
        Ok(())
    }

    fn park(&mut self, entity: EntityId, effect: EffectId) -> CoreResult<()> {
        self.entity_mut(entity)?.effects.inactive_unique.push(effect);
        let held = self.effect_mut(effect)?;
        held.holder = Some(entity);
        held.persisted = false;
        self.emit(WorldEvent::EffectParked { entity, effect });
        Ok(())
    }

    fn clear_holder(&mut self, effect: EffectId) -> CoreResult<()> {
        let held = self.effect_mut(effect)?;
        held.holder = None;
        held.persisted = false;
        if let Some(duration) = held.duration_mut() {
            duration.reset();
        }
        Ok(())
    }

    // ========================================================================
    // Kind-specific payloads
    // ========================================================================

    fn payload(&self, effect: EffectId) -> CoreResult<Payload> {
        let source = self.effect_ref(effect)?;
        Ok(match &source.kind {
            EffectKind::Modifier(_) => Payload::Modifier(source.target_property().map(str::to_owned)),
            EffectKind::Definition(definition) => Payload::Definition(definition.template().clone()),
            EffectKind::Composite(composite) => Payload::Composite(composite.children.clone()),
            EffectKind::Periodic(_) => Payload::Periodic,
        })
    }

    fn apply_payload(&mut self, entity: EntityId, effect: EffectId) -> CoreResult<()> {
        match self.payload(effect)? {
            Payload::Modifier(target) => {
                self.recalculate(effect, entity)?;
                let property = target.and_then(|name| self.entity_property(entity, &name));
                if let Some(property) = property {
                    self.modify(effect, property)?;
                }
            }
            Payload::Definition(template) => {
                if !self.entity_ref(entity)?.has_property(template.name()) {
                    let property = self.define_property(entity, template)?;
                    if let EffectKind::Definition(definition) = &mut self.effect_mut(effect)?.kind {
                        definition.defined = Some(property);
                    }
                }
            }
            Payload::Composite(children) => {
                for (index, child) in children.iter().enumerate() {
                    if let Err(err) = self.persist_on(*child, entity) {
                        for applied in children[..index].iter().rev() {
                            self.release_effect(entity, *applied)?;
                        }
                        return Err(err);
                    }
                }
            }
            Payload::Periodic => {
                let call_initially = match &mut self.effect_mut(effect)?.kind {
                    EffectKind::Periodic(periodic) => {
                        periodic.start();
                        periodic.call_initially()
                    }
                    _ => false,
                };
                if call_initially {
                    self.emit(WorldEvent::PeriodicTick { effect, period: 0 });
                }
            }
        }
        Ok(())
    }

    fn revert_payload(&mut self, entity: EntityId, effect: EffectId) -> CoreResult<()> {
        match &mut self.effect_mut(effect)?.kind {
            EffectKind::Modifier(modifier) => {
                if let Some(property) = modifier.bound {
                    self.unmodify(effect, property)?;
                }
            }
            EffectKind::Definition(definition) => {
                if let Some(property) = definition.defined.take() {
                    self.detach_property(entity, property)?;
                }
            }
            EffectKind::Composite(composite) => {
                let children = composite.children.clone();
                for child in children {
                    self.release_effect(entity, child)?;
                }
            }
            EffectKind::Periodic(periodic) => periodic.stop(),
        }
        Ok(())
    }

    fn define_property(&mut self, entity: EntityId, template: Property) -> CoreResult<PropertyId> {
        let property = self.create_property(template);
        if let Err(err) = self.attach_property(entity, property) {
            self.properties.remove(property.0);
            return Err(err);
        }
        Ok(property)
    }

    // ========================================================================
    // Instant application
    // ========================================================================

    fn apply_once(&mut self, effect: EffectId, target: EntityId) -> CoreResult<()> {
        self.entity_ref(target)?;
        match self.payload(effect)? {
            Payload::Modifier(name) => {
                self.recalculate(effect, target)?;
                self.shift_instant(effect, target, name, 1.0)
            }
            Payload::Definition(template) => {
                if !self.entity_ref(target)?.has_property(template.name()) {
                    self.define_property(target, template)?;
                }
                Ok(())
            }
            Payload::Composite(children) => {
                for child in children {
                    self.apply_once(child, target)?;
                }
                Ok(())
            }
            Payload::Periodic => Err(EffectError::InstantUnsupported("periodic").into()),
        }
    }

    fn revert_instant(&mut self, effect: EffectId, target: EntityId) -> CoreResult<()> {
        self.entity_ref(target)?;
        match self.payload(effect)? {
            Payload::Modifier(name) => self.shift_instant(effect, target, name, -1.0),
            Payload::Definition(template) => {
                if let Some(property) = self.entity_property(target, template.name()) {
                    self.detach_property(target, property)?;
                }
                Ok(())
            }
            Payload::Composite(children) => {
                for child in children {
                    self.revert_instant(child, target)?;
                }
                Ok(())
            }
            Payload::Periodic => Ok(()),
        }
    }

    fn shift_instant(
        &mut self,
        effect: EffectId,
        target: EntityId,
        name: Option<String>,
        sign: f64,
    ) -> CoreResult<()> {
        let Some(property) = name.and_then(|name| self.entity_property(target, &name)) else {
            return Ok(());
        };
        let modifier = self.modifier_of(effect)?.clone();
        let slot = self
            .properties
            .get_mut(property.0)
            .ok_or(CoreError::MissingProperty(property))?;
        modifier.apply_to(slot, sign)?;
        Ok(())
    }

    fn composite_contains(&self, composite: EffectId, needle: EffectId) -> CoreResult<bool> {
        let Some(group) = self.effect_ref(composite)?.as_composite() else {
            return Ok(false);
        };
        for child in group.children() {
            if *child == needle || self.composite_contains(*child, needle)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
