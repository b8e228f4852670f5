//! Time advancement and readiness settling.

use crate::action::{ActionState, CastOutcome};
use crate::effect::EffectKind;
use crate::error::CoreResult;
use crate::stats::UpdateTime;

use super::events::WorldEvent;
use super::ids::{ActionId, EffectId, EntityId};
use super::property::PropertyValue;
use super::world::World;

impl World {
    /// Advances every clock-driven object by `elapsed` milliseconds.
    ///
    /// Order: resource cooldowns, action cooldowns and casts, effect
    /// durations and periodic ticks, then expiry removal and settling.
    pub fn update(&mut self, elapsed: f64) -> CoreResult<()> {
        let total = self.advance_clock(elapsed);
        let time = UpdateTime::new(elapsed, total);

        for (_, property) in self.properties.iter_mut() {
            if let PropertyValue::Resource(resource) = property.value_mut() {
                resource.tick(time);
            }
        }

        let mut cast_events = Vec::new();
        for (index, action) in self.actions.iter_mut() {
            let id = ActionId(index);
            let (periods, completed) = action.advance(time);
            for period in periods {
                cast_events.push(WorldEvent::CastPeriodElapsed { action: id, period });
            }
            if completed {
                cast_events.push(WorldEvent::ActionStateChanged {
                    action: id,
                    from: ActionState::Casting,
                    to: ActionState::OnCooldown,
                });
                cast_events.push(WorldEvent::CastFinished {
                    action: id,
                    outcome: CastOutcome::Completed,
                });
            }
        }
        for event in cast_events {
            self.emit(event);
        }

        let mut effect_events = Vec::new();
        let mut expired: Vec<(EntityId, EffectId)> = Vec::new();
        for (index, effect) in self.effects.iter_mut() {
            let Some(holder) = effect.holder else {
                continue;
            };
            let id = EffectId(index);
            let persisted = effect.persisted;

            if persisted && let EffectKind::Periodic(periodic) = &mut effect.kind {
                if let Some(timer) = &mut periodic.timer {
                    let progress = timer.advance(time);
                    for period in progress.periods {
                        effect_events.push(WorldEvent::PeriodicTick { effect: id, period });
                    }
                    if progress.completed {
                        effect_events.push(WorldEvent::PeriodicCompleted { effect: id });
                        expired.push((holder, id));
                        continue;
                    }
                }
            }

            if let Some(duration) = effect.duration_mut()
                && duration.advance(time).completed
            {
                expired.push((holder, id));
            }
        }
        for event in effect_events {
            self.emit(event);
        }
        for (entity, effect) in expired {
            tracing::debug!(entity = %entity, effect = %effect, "effect expired");
            self.emit(WorldEvent::EffectExpired { entity, effect });
            self.release_effect(entity, effect)?;
        }

        self.settle();
        Ok(())
    }

    /// Recomputes every owned action's requirement results and readiness
    /// until nothing changes or the configured pass limit is reached.
    pub fn settle(&mut self) {
        let max_passes = self.config().max_settle_passes.max(1);
        for pass in 0..max_passes {
            let transitions = self.refresh_actions();
            if transitions.is_empty() {
                return;
            }
            for (action, from, to) in transitions {
                self.emit(WorldEvent::ActionStateChanged { action, from, to });
            }
            if pass + 1 == max_passes {
                tracing::warn!(passes = max_passes, "readiness did not settle");
            }
        }
    }

    /// Refreshes one action's requirement cache and readiness.
    pub(crate) fn refresh_action(&mut self, id: ActionId) -> CoreResult<()> {
        let action = self
            .actions
            .get_mut(id.0)
            .ok_or(crate::error::CoreError::MissingAction(id))?;
        for requirement in action.requirements.iter_mut() {
            requirement.met = requirement.evaluate(&self.properties, &action.cooldown);
        }
        if let Some((from, to)) = action.refresh_readiness() {
            self.emit(WorldEvent::ActionStateChanged {
                action: id,
                from,
                to,
            });
        }
        Ok(())
    }

    fn refresh_actions(&mut self) -> Vec<(ActionId, ActionState, ActionState)> {
        let mut transitions = Vec::new();
        for (index, action) in self.actions.iter_mut() {
            let mut changed = false;
            for requirement in action.requirements.iter_mut() {
                let met = requirement.evaluate(&self.properties, &action.cooldown);
                changed |= met != requirement.met;
                requirement.met = met;
            }
            if let Some((from, to)) = action.refresh_readiness() {
                transitions.push((ActionId(index), from, to));
            } else if changed {
                tracing::trace!(action = action.name(), "requirement results changed");
            }
        }
        transitions
    }
}
