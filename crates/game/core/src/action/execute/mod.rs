//! Action execution: gating, requirement use and effect dispatch.
//!
//! ## Architecture
//!
//! - **Executors** implement [`ActionExecutor`]. The provided
//!   [`ActionExecutor::execute`] runs the shared pipeline and calls
//!   [`ActionExecutor::execute_inner`] only once the action may fire.
//! - **Processors** implement [`EffectProcessor`] and turn one
//!   [`ActionEffect`](super::ActionEffect) into world changes for one target.
//!   [`EffectProcessorMap`] routes by [`EffectCategory`](super::EffectCategory).
//! - **Maps**: [`ActionExecutorMap`] routes by action name.
//!
//! ## Casts
//!
//! Timed actions finish asynchronously. After [`World::update`], hand the
//! drained events to [`ActionExecutor::handle_events`] so executors can run
//! periodic and end effects.

mod context;
mod default;
mod map;
mod pipeline;
mod processor;

use crate::action::types::{ActionResult, ActionTarget};
use crate::error::CoreResult;
use crate::state::{ActionId, EntityId, World, WorldEvent};

// ============================================================================
// Public Exports
// ============================================================================

pub use context::EffectContext;
pub use default::DefaultActionExecutor;
pub use map::ActionExecutorMap;
pub use processor::{
    EffectProcessor, EffectProcessorMap, InstantEffectProcessor, PersistentEffectProcessor,
};

// ============================================================================
// Executor trait
// ============================================================================

pub trait ActionExecutor {
    /// Extra veto checked after every requirement passed. `Err` carries the
    /// reason shown to the player.
    fn can_execute(
        &self,
        _world: &World,
        _action: ActionId,
        _actor: EntityId,
        _target: &ActionTarget,
    ) -> Result<(), String> {
        Ok(())
    }

    /// Applies the action's effects. Requirements are already used.
    fn execute_inner(
        &mut self,
        world: &mut World,
        action: ActionId,
        actor: EntityId,
        target: &ActionTarget,
    ) -> CoreResult<ActionResult>;

    /// Reacts to one world event, e.g. a cast period or cast completion.
    fn handle_event(&mut self, _world: &mut World, _event: &WorldEvent) -> CoreResult<()> {
        Ok(())
    }

    fn handle_events(&mut self, world: &mut World, events: &[WorldEvent]) -> CoreResult<()> {
        for event in events {
            self.handle_event(world, event)?;
        }
        Ok(())
    }

    /// Gates the action on its requirements and the veto hook, uses the
    /// requirements, then runs [`execute_inner`](Self::execute_inner).
    ///
    /// ## Errors
    /// Gate failures are `Ok` results with `success == false`. `Err` is
    /// reserved for configuration problems such as an unmapped category.
    fn execute(
        &mut self,
        world: &mut World,
        action: ActionId,
        actor: EntityId,
        target: &ActionTarget,
    ) -> CoreResult<ActionResult> {
        pipeline::run(self, world, action, actor, target)
    }
}
