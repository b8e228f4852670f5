use std::collections::HashMap;

use crate::action::effect::ActionEffect;
use crate::action::types::{ActionResult, ActionState, ActionTarget, CastOutcome};
use crate::error::CoreResult;
use crate::state::{ActionId, EntityId, World, WorldEvent};

use super::context::EffectContext;
use super::processor::EffectProcessor;
use super::ActionExecutor;

#[derive(Clone, Debug)]
struct PendingCast {
    actor: EntityId,
    targets: Vec<EntityId>,
}

/// Runs begin effects immediately. Instant actions run end effects right
/// away; timed actions start a cast and run periodic effects per elapsed
/// period and end effects once the cast completes.
pub struct DefaultActionExecutor<P> {
    processor: P,
    pending: HashMap<ActionId, PendingCast>,
}

impl<P: EffectProcessor> DefaultActionExecutor<P> {
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            pending: HashMap::new(),
        }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    pub fn is_casting(&self, action: ActionId) -> bool {
        self.pending.contains_key(&action)
    }

    fn process_all(
        &mut self,
        world: &mut World,
        action: ActionId,
        actor: EntityId,
        targets: &[EntityId],
        effects: &[ActionEffect],
    ) -> CoreResult<()> {
        for target in targets {
            for effect in effects {
                let mut ctx = EffectContext::new(world, action, actor, *target);
                self.processor.process(&mut ctx, effect)?;
            }
        }
        Ok(())
    }
}

impl<P: EffectProcessor> ActionExecutor for DefaultActionExecutor<P> {
    fn can_execute(
        &self,
        world: &World,
        action: ActionId,
        _actor: EntityId,
        _target: &ActionTarget,
    ) -> Result<(), String> {
        match world.action(action) {
            Some(definition) if definition.state() == ActionState::Casting => {
                Err("it is already in progress".to_owned())
            }
            _ => Ok(()),
        }
    }

    fn execute_inner(
        &mut self,
        world: &mut World,
        action: ActionId,
        actor: EntityId,
        target: &ActionTarget,
    ) -> CoreResult<ActionResult> {
        let targets = target.resolve(actor);
        let definition = world.action_ref(action)?;
        let begin = definition.begin_effects().to_vec();
        let end = definition.end_effects().to_vec();
        let timed = definition.cast_time().is_some();

        self.process_all(world, action, actor, &targets, &begin)?;

        if timed && world.begin_cast(action)? {
            self.pending.insert(action, PendingCast { actor, targets });
        } else {
            if world.action_ref(action)?.state() == ActionState::Targeting {
                world.end_targeting(action)?;
            }
            self.process_all(world, action, actor, &targets, &end)?;
        }
        Ok(ActionResult::success())
    }

    fn handle_event(&mut self, world: &mut World, event: &WorldEvent) -> CoreResult<()> {
        match event {
            WorldEvent::CastPeriodElapsed { action, .. } => {
                let Some(cast) = self.pending.get(action).cloned() else {
                    return Ok(());
                };
                let periodic = world.action_ref(*action)?.periodic_effects().to_vec();
                self.process_all(world, *action, cast.actor, &cast.targets, &periodic)
            }
            WorldEvent::CastFinished { action, outcome } => {
                let Some(cast) = self.pending.remove(action) else {
                    return Ok(());
                };
                if *outcome != CastOutcome::Completed {
                    tracing::debug!(action = %action, %outcome, "cast dropped");
                    return Ok(());
                }
                let end = world.action_ref(*action)?.end_effects().to_vec();
                self.process_all(world, *action, cast.actor, &cast.targets, &end)
            }
            _ => Ok(()),
        }
    }
}
