//! Effect execution context.

use crate::state::{ActionId, EntityId, World};

use crate::action::log::EffectLogEntry;

// ============================================================================
// Effect Context
// ============================================================================

/// Everything an [`EffectProcessor`](super::EffectProcessor) needs to apply one
/// action effect to one target.
pub struct EffectContext<'a> {
    /// The entity performing the action.
    pub caster: EntityId,

    /// The current target entity.
    pub target: EntityId,

    /// The action being executed.
    pub action: ActionId,

    pub world: &'a mut World,
}

impl<'a> EffectContext<'a> {
    pub fn new(world: &'a mut World, action: ActionId, caster: EntityId, target: EntityId) -> Self {
        Self {
            caster,
            target,
            action,
            world,
        }
    }

    /// Log entry naming caster, action and target by display name.
    pub fn log_entry(&self, value: Option<f64>) -> EffectLogEntry {
        let entity_name = |id: EntityId| {
            self.world
                .entity(id)
                .map_or_else(|| id.to_string(), |entity| entity.display_name().to_owned())
        };
        EffectLogEntry {
            actor: entity_name(self.caster),
            action: self
                .world
                .action(self.action)
                .map_or_else(|| self.action.to_string(), |action| action.display_name().to_owned()),
            target: entity_name(self.target),
            value,
        }
    }
}
