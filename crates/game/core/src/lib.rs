//! Reactive stat and effect engine for RPG-style games.
//!
//! `rpg-core` defines the canonical rules: numeric stats with modifiers,
//! entities that carry named properties, effects that modify or create
//! properties, equipment that propagates effects, and actions gated by
//! requirements. All state mutation flows through [`World`], and supporting
//! crates depend on the types re-exported here.
pub mod action;
pub mod config;
pub mod effect;
pub mod error;
pub mod parse;
pub mod state;
pub mod stats;

pub use action::{
    Action, ActionEffect, ActionError, ActionExecutor, ActionExecutorMap, ActionResult,
    ActionState, ActionTarget, CastOutcome, DefaultActionExecutor, EffectCategory, EffectContext,
    EffectProcessor, EffectProcessorMap, InstantEffectProcessor, MessageLog,
    PersistentEffectProcessor, Requirement, TracingLog,
};
pub use config::EngineConfig;
pub use effect::{
    Effect, EffectError, EffectKind, EffectSource, EffectSpec, EffectSpecKind, Formula,
    FormulaSide, ModifierOperation, ModifierTarget, ResourceField,
};
pub use error::{CoreError, CoreResult, ErrorSeverity, GameError};
pub use parse::ParseError;
pub use state::{
    ActionId, EffectId, Entity, EntityId, EventObserver, Property, PropertyError, PropertyId,
    PropertySpec, PropertyValue, SubscriptionId, Topic, ValueSpec, World, WorldEvent,
};
pub use stats::{
    Cooldown, NetEffect, Resource, StatError, Statistic, Timer, UpdateTime, ValueSource,
    ValueSourceDescriptor,
};
