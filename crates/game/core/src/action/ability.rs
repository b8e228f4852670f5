//! Actions owned by entities, and the world-side state transitions.

use crate::error::{CoreError, CoreResult};
use crate::state::{ActionId, EntityId, PropertyValue, World, WorldEvent};
use crate::stats::ValueSource;

use super::error::ActionError;
use super::requirement::{CooldownSource, RequirementKind};
use super::types::{Action, ActionState, CastOutcome};

impl World {
    /// Gives `action` to `entity` and binds its requirements to the entity's
    /// properties by name.
    pub fn add_ability(&mut self, entity: EntityId, action: ActionId) -> CoreResult<()> {
        let candidate = self.action_ref(action)?;
        match candidate.owner {
            Some(owner) if owner == entity => return Ok(()),
            Some(_) => return Err(ActionError::AlreadyOwned(candidate.name().to_owned()).into()),
            None => {}
        }
        self.entity_mut(entity)?.abilities.push(action);
        self.action_mut(action)?.owner = Some(entity);
        self.bind_requirements(entity, action)?;
        tracing::debug!(entity = %entity, action = %action, "ability added");
        self.settle();
        Ok(())
    }

    /// Convenience: stores `action` and adds it to `entity`.
    pub fn grant_ability(&mut self, entity: EntityId, action: Action) -> CoreResult<ActionId> {
        let id = self.create_action(action);
        if let Err(err) = self.add_ability(entity, id) {
            self.actions.remove(id.0);
            return Err(err);
        }
        Ok(id)
    }

    /// Returns false if `entity` did not own `action`.
    pub fn remove_ability(&mut self, entity: EntityId, action: ActionId) -> CoreResult<bool> {
        let owner = self.entity_mut(entity)?;
        let before = owner.abilities.len();
        owner.abilities.retain(|id| *id != action);
        if owner.abilities.len() == before {
            return Ok(false);
        }
        let released = self.action_mut(action)?;
        released.owner = None;
        for requirement in released.requirements.iter_mut() {
            requirement.unbind();
        }
        tracing::debug!(entity = %entity, action = %action, "ability removed");
        self.settle();
        Ok(true)
    }

    /// Mutates an action in place, then rebinds and settles.
    pub fn update_action<R>(&mut self, action: ActionId, f: impl FnOnce(&mut Action) -> R) -> CoreResult<R> {
        let result = f(self.action_mut(action)?);
        if let Some(owner) = self.action_ref(action)?.owner {
            self.bind_requirements(owner, action)?;
        }
        self.settle();
        Ok(result)
    }

    /// Starts the action's cast, from `Ready`, `Targeting` or a running cast
    /// (which restarts). Returns false without a cast time.
    pub fn begin_cast(&mut self, action: ActionId) -> CoreResult<bool> {
        let casting = self.action_mut(action)?;
        let from = casting.state();
        if !casting.begin_cast() {
            return Ok(false);
        }
        tracing::debug!(action = %action, %from, "cast started");
        if from != ActionState::Casting {
            self.emit(WorldEvent::ActionStateChanged {
                action,
                from,
                to: ActionState::Casting,
            });
        }
        Ok(true)
    }

    /// Cancels or interrupts an in-progress cast.
    pub fn cancel_cast(&mut self, action: ActionId, interrupt: bool) -> CoreResult<Option<CastOutcome>> {
        let stopped = self.action_mut(action)?;
        let Some(outcome) = stopped.cancel_cast(interrupt) else {
            return Ok(None);
        };
        let to = stopped.state();
        tracing::debug!(action = %action, %outcome, "cast stopped");
        self.emit(WorldEvent::ActionStateChanged {
            action,
            from: ActionState::Casting,
            to,
        });
        self.emit(WorldEvent::CastFinished { action, outcome });
        self.refresh_action(action)?;
        self.settle();
        Ok(Some(outcome))
    }

    pub fn begin_targeting(&mut self, action: ActionId) -> CoreResult<bool> {
        if !self.action_mut(action)?.begin_targeting() {
            return Ok(false);
        }
        self.emit(WorldEvent::ActionStateChanged {
            action,
            from: ActionState::Ready,
            to: ActionState::Targeting,
        });
        Ok(true)
    }

    pub fn end_targeting(&mut self, action: ActionId) -> CoreResult<bool> {
        let targeting = self.action_mut(action)?;
        if !targeting.end_targeting() {
            return Ok(false);
        }
        let to = targeting.state();
        self.emit(WorldEvent::ActionStateChanged {
            action,
            from: ActionState::Targeting,
            to,
        });
        self.refresh_action(action)?;
        self.settle();
        Ok(true)
    }

    /// Uses every requirement of `action`: consumes resource costs and starts
    /// cooldowns. Consumption across several resources is not rolled back if
    /// a later one fails; the gate check right before makes that unlikely.
    pub(crate) fn use_requirements(&mut self, action: ActionId) -> CoreResult<()> {
        let used = self
            .actions
            .get_mut(action.0)
            .ok_or(CoreError::MissingAction(action))?;

        for requirement in used.requirements.iter() {
            match requirement.kind() {
                RequirementKind::Cooldown(CooldownSource::Internal) => {
                    used.cooldown.trigger();
                }
                RequirementKind::Cooldown(CooldownSource::Resource { bound, .. }) => {
                    let resource = bound
                        .and_then(|id| self.properties.get_mut(id.0))
                        .and_then(|property| match property.value_mut() {
                            PropertyValue::Resource(resource) => Some(resource),
                            _ => None,
                        });
                    if let Some(resource) = resource {
                        resource.trigger_cooldown();
                    }
                }
                RequirementKind::Resource(cost) => {
                    let amount = cost.quantity().value();
                    let consumed = cost
                        .bound()
                        .and_then(|id| self.properties.get_mut(id.0))
                        .and_then(|property| match property.value_mut() {
                            PropertyValue::Resource(resource) => {
                                Some(resource.consume(amount))
                            }
                            _ => None,
                        })
                        .unwrap_or(false);
                    if !consumed {
                        tracing::warn!(
                            action = used.name(),
                            resource = cost.resource(),
                            amount,
                            "resource cost could not be consumed"
                        );
                    }
                }
                RequirementKind::MinimumResource(_) | RequirementKind::PropertyState(_) => {}
            }
        }
        self.settle();
        Ok(())
    }

    pub(crate) fn rebind_abilities(&mut self, entity: EntityId) -> CoreResult<()> {
        let abilities = self.entity_ref(entity)?.abilities.clone();
        for action in abilities {
            self.bind_requirements(entity, action)?;
        }
        Ok(())
    }

    fn bind_requirements(&mut self, entity: EntityId, action: ActionId) -> CoreResult<()> {
        let owner = self
            .entities
            .get(entity.0)
            .ok_or(CoreError::MissingEntity(entity))?;
        let bound = self
            .actions
            .get_mut(action.0)
            .ok_or(CoreError::MissingAction(action))?;
        for requirement in bound.requirements.iter_mut() {
            requirement.bind(owner, &self.properties);
        }
        Ok(())
    }
}
