//! Effect processors: turn an [`ActionEffect`] into world changes.

use std::collections::HashMap;

use crate::action::effect::{ActionEffect, EffectCategory};
use crate::action::error::ActionError;
use crate::action::log::MessageLog;
use crate::effect::EffectSource;
use crate::error::CoreResult;
use crate::state::EffectId;

use super::context::EffectContext;

pub trait EffectProcessor {
    fn process(&mut self, ctx: &mut EffectContext<'_>, effect: &ActionEffect) -> CoreResult<()>;
}

impl<P: EffectProcessor + ?Sized> EffectProcessor for Box<P> {
    fn process(&mut self, ctx: &mut EffectContext<'_>, effect: &ActionEffect) -> CoreResult<()> {
        (**self).process(ctx, effect)
    }
}

/// Routes each effect to the processor registered for its category.
#[derive(Default)]
pub struct EffectProcessorMap {
    processors: HashMap<EffectCategory, Box<dyn EffectProcessor>>,
}

impl EffectProcessorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mapping(
        &mut self,
        category: EffectCategory,
        processor: impl EffectProcessor + 'static,
    ) -> Result<(), ActionError> {
        if self.processors.contains_key(&category) {
            return Err(ActionError::DuplicateMapping(category.to_string()));
        }
        self.processors.insert(category, Box::new(processor));
        Ok(())
    }

    pub fn with_mapping(
        mut self,
        category: EffectCategory,
        processor: impl EffectProcessor + 'static,
    ) -> Result<Self, ActionError> {
        self.add_mapping(category, processor)?;
        Ok(self)
    }

    pub fn contains(&self, category: EffectCategory) -> bool {
        self.processors.contains_key(&category)
    }
}

impl EffectProcessor for EffectProcessorMap {
    fn process(&mut self, ctx: &mut EffectContext<'_>, effect: &ActionEffect) -> CoreResult<()> {
        let processor = self
            .processors
            .get_mut(&effect.category)
            .ok_or(ActionError::UnmappedEffect(effect.category))?;
        processor.process(ctx, effect)
    }
}

// ============================================================================
// Built-in processors
// ============================================================================

/// Persists a fresh effect instance on the target (buffs, debuffs).
pub struct PersistentEffectProcessor<L> {
    log: L,
}

impl<L: MessageLog> PersistentEffectProcessor<L> {
    pub fn new(log: L) -> Self {
        Self { log }
    }
}

impl<L: MessageLog> EffectProcessor for PersistentEffectProcessor<L> {
    fn process(&mut self, ctx: &mut EffectContext<'_>, effect: &ActionEffect) -> CoreResult<()> {
        let spawned = ctx
            .world
            .spawn_effect(&effect.spec, Some(EffectSource::Action(ctx.action)))?;
        ctx.world.apply_persist(spawned, ctx.target)?;
        let entry = ctx.log_entry(modifier_value(ctx, spawned));
        self.log.log(effect.log_string(&entry));
        Ok(())
    }
}

/// Applies a one-shot effect instance and discards it (damage, healing).
pub struct InstantEffectProcessor<L> {
    log: L,
}

impl<L: MessageLog> InstantEffectProcessor<L> {
    pub fn new(log: L) -> Self {
        Self { log }
    }
}

impl<L: MessageLog> EffectProcessor for InstantEffectProcessor<L> {
    fn process(&mut self, ctx: &mut EffectContext<'_>, effect: &ActionEffect) -> CoreResult<()> {
        let spawned = ctx
            .world
            .spawn_effect(&effect.spec, Some(EffectSource::Action(ctx.action)))?;
        let applied = ctx.world.apply_instant(spawned, ctx.target);
        let entry = ctx.log_entry(modifier_value(ctx, spawned));
        discard(ctx, spawned)?;
        applied?;
        self.log.log(effect.log_string(&entry));
        Ok(())
    }
}

fn modifier_value(ctx: &EffectContext<'_>, effect: EffectId) -> Option<f64> {
    ctx.world
        .effect(effect)?
        .as_modifier()
        .map(|modifier| modifier.value())
}

/// Drops an instant effect and any composite children it spawned.
fn discard(ctx: &mut EffectContext<'_>, effect: EffectId) -> CoreResult<()> {
    let removed = ctx.world.destroy_effect(effect)?;
    if let Some(composite) = removed.as_composite() {
        for child in composite.children() {
            discard(ctx, *child)?;
        }
    }
    Ok(())
}
