use std::collections::HashMap;

use crate::action::error::ActionError;
use crate::action::types::{ActionResult, ActionTarget};
use crate::error::CoreResult;
use crate::state::{ActionId, EntityId, World, WorldEvent};

use super::ActionExecutor;

/// Routes execution to the executor registered under the action's name.
#[derive(Default)]
pub struct ActionExecutorMap {
    executors: HashMap<String, Box<dyn ActionExecutor>>,
}

impl ActionExecutorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mapping(
        &mut self,
        action_name: impl Into<String>,
        executor: impl ActionExecutor + 'static,
    ) -> Result<(), ActionError> {
        let action_name = action_name.into();
        if self.executors.contains_key(&action_name) {
            return Err(ActionError::DuplicateMapping(action_name));
        }
        self.executors.insert(action_name, Box::new(executor));
        Ok(())
    }

    pub fn with_mapping(
        mut self,
        action_name: impl Into<String>,
        executor: impl ActionExecutor + 'static,
    ) -> Result<Self, ActionError> {
        self.add_mapping(action_name, executor)?;
        Ok(self)
    }

    pub fn contains(&self, action_name: &str) -> bool {
        self.executors.contains_key(action_name)
    }

    /// Executes `action` with the executor mapped to its name.
    ///
    /// ## Errors
    /// - `ActionError::UnmappedAction` - no executor for the action's name
    pub fn execute(
        &mut self,
        world: &mut World,
        action: ActionId,
        actor: EntityId,
        target: &ActionTarget,
    ) -> CoreResult<ActionResult> {
        let Some(definition) = world.action(action) else {
            return Ok(ActionResult::failure("Action does not exist"));
        };
        let name = definition.name();
        let executor = self
            .executors
            .get_mut(name)
            .ok_or_else(|| ActionError::UnmappedAction(name.to_owned()))?;
        executor.execute(world, action, actor, target)
    }

    /// Forwards events to every registered executor.
    pub fn handle_events(&mut self, world: &mut World, events: &[WorldEvent]) -> CoreResult<()> {
        for executor in self.executors.values_mut() {
            executor.handle_events(world, events)?;
        }
        Ok(())
    }
}
