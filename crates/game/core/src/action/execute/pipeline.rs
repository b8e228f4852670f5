//! Action execution orchestration pipeline.
//!
//! 1. Check that the action, actor and targets exist
//! 2. Refresh and check every requirement
//! 3. Ask the executor's veto hook
//! 4. Use every requirement (consume costs, start cooldowns)
//! 5. Run the executor's effects
//!
//! Steps 1-3 report failures as unsuccessful [`ActionResult`]s and leave the
//! world untouched. Configuration errors from step 5 propagate as `Err`.

use crate::action::types::{ActionResult, ActionTarget};
use crate::error::CoreResult;
use crate::state::{ActionId, EntityId, World};

use super::ActionExecutor;

pub(super) fn run<E: ActionExecutor + ?Sized>(
    executor: &mut E,
    world: &mut World,
    action: ActionId,
    actor: EntityId,
    target: &ActionTarget,
) -> CoreResult<ActionResult> {
    // 1. Existence
    if world.action(action).is_none() {
        return Ok(ActionResult::failure("Action does not exist"));
    }
    if !world.contains_entity(actor) {
        return Ok(ActionResult::failure("Actor does not exist"));
    }
    if target
        .resolve(actor)
        .iter()
        .any(|entity| !world.contains_entity(*entity))
    {
        return Ok(ActionResult::failure("Target does not exist"));
    }

    // 2. Requirements, evaluated against the current world
    world.refresh_action(action)?;
    let definition = world.action_ref(action)?;
    let name = definition.display_name().to_owned();
    if let Some(reason) = definition.unmet_reason() {
        tracing::debug!(action = %name, %reason, "requirements not met");
        return Ok(ActionResult::failure(format!("Cannot execute {name}, {reason}")));
    }

    // 3. Executor veto
    if let Err(reason) = executor.can_execute(world, action, actor, target) {
        tracing::debug!(action = %name, %reason, "execution vetoed");
        return Ok(ActionResult::failure(format!("Cannot execute {name}, {reason}")));
    }

    // 4. Use requirements
    world.use_requirements(action)?;

    // 5. Effects
    tracing::debug!(action = %name, actor = %actor, "executing action");
    executor.execute_inner(world, action, actor, target)
}
