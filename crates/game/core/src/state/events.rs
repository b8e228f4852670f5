//! Change notifications emitted by the world.
//!
//! Every mutation that other systems may care about pushes a [`WorldEvent`]
//! onto the world's queue and hands it to registered observers. Observers
//! receive `&WorldEvent` only, so they cannot re-enter the world; hosts that
//! need to react with further mutations drain the queue after the call
//! returns.

use crate::action::{ActionState, CastOutcome};

use super::ids::{ActionId, EffectId, EntityId, PropertyId};

/// Topics for event routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Topic {
    Property,
    Effect,
    Action,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    PropertyAdded {
        entity: EntityId,
        property: PropertyId,
        name: String,
    },
    PropertyRemoved {
        entity: EntityId,
        property: PropertyId,
        name: String,
    },
    AccessoryAdded {
        entity: EntityId,
        accessory: EntityId,
    },
    AccessoryRemoved {
        entity: EntityId,
        accessory: EntityId,
    },

    /// Effect applied to its holder.
    EffectActivated { entity: EntityId, effect: EffectId },
    /// Effect held but parked behind a stronger effect with the same unique id.
    EffectParked { entity: EntityId, effect: EffectId },
    /// Effect no longer applied to its holder (removed, superseded or expired).
    EffectDeactivated { entity: EntityId, effect: EffectId },
    /// Effect duration ran out; it is removed right after this event.
    EffectExpired { entity: EntityId, effect: EffectId },
    ModifierChanging {
        effect: EffectId,
        property: PropertyId,
    },
    ModifierChanged {
        effect: EffectId,
        property: PropertyId,
    },
    /// Periodic effect tick; period 0 is the initial call on activation.
    PeriodicTick { effect: EffectId, period: u32 },
    PeriodicCompleted { effect: EffectId },

    ActionStateChanged {
        action: ActionId,
        from: ActionState,
        to: ActionState,
    },
    CastPeriodElapsed { action: ActionId, period: u32 },
    CastFinished {
        action: ActionId,
        outcome: CastOutcome,
    },
}

impl WorldEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::PropertyAdded { .. }
            | Self::PropertyRemoved { .. }
            | Self::AccessoryAdded { .. }
            | Self::AccessoryRemoved { .. } => Topic::Property,
            Self::EffectActivated { .. }
            | Self::EffectParked { .. }
            | Self::EffectDeactivated { .. }
            | Self::EffectExpired { .. }
            | Self::ModifierChanging { .. }
            | Self::ModifierChanged { .. }
            | Self::PeriodicTick { .. }
            | Self::PeriodicCompleted { .. } => Topic::Effect,
            Self::ActionStateChanged { .. }
            | Self::CastPeriodElapsed { .. }
            | Self::CastFinished { .. } => Topic::Action,
        }
    }
}

/// Receives every event as it is emitted.
pub trait EventObserver {
    fn on_event(&mut self, event: &WorldEvent);
}

impl<F> EventObserver for F
where
    F: FnMut(&WorldEvent),
{
    fn on_event(&mut self, event: &WorldEvent) {
        self(event)
    }
}
