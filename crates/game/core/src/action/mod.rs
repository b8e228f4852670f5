//! Actions: abilities owned by entities, gated by requirements.
//!
//! # Module Structure
//!
//! - `types`: [`Action`] definition, readiness state machine, cast timing
//! - `requirement`: cooldown, resource and property-state gates
//! - `effect`: categorized [`ActionEffect`]s attached to action phases
//! - `ability`: world-side ownership, binding and cast transitions
//! - `execute`: executor pipeline and effect processors
//! - `log`: combat log sinks
//! - `error`: [`ActionError`]

pub mod ability;
pub mod effect;
pub mod error;
pub mod execute;
pub mod log;
pub mod requirement;
pub mod types;

pub use effect::{ActionEffect, EffectCategory};
pub use error::ActionError;
pub use execute::{
    ActionExecutor, ActionExecutorMap, DefaultActionExecutor, EffectContext, EffectProcessor,
    EffectProcessorMap, InstantEffectProcessor, PersistentEffectProcessor,
};
pub use log::{EffectLogEntry, MessageLog, TracingLog};
pub use requirement::{CooldownSource, Requirement, RequirementKind, ResourceCost, StateCheck};
pub use types::{Action, ActionResult, ActionState, ActionTarget, CastOutcome};
