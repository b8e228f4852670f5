//! Effects: anything that can be applied to an entity and later removed.
//!
//! An [`Effect`] combines shared metadata (target property, source, unique
//! id, duration) with one of four payloads in [`EffectKind`]. The payload
//! logic that needs the rest of the world (binding modifiers, creating
//! properties, fanning out to children) lives on [`crate::World`]; see
//! `state::persistence`.

pub mod composite;
pub mod definition;
pub mod formula;
pub mod modifier;
pub mod periodic;
pub mod spec;

pub use composite::CompositeEffect;
pub use definition::DefinitionEffect;
pub use formula::{Formula, FormulaSide};
pub use modifier::{ModifierEffect, ModifierOperation, ModifierTarget, ResourceField};
pub use periodic::PeriodicEffect;
pub use spec::{EffectSpec, EffectSpecKind};

use crate::config::EngineConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::parse::{self, ParseError};
use crate::state::{ActionId, EffectId, EntityId, Property};
use crate::stats::Timer;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("effect is already persisted on an entity")]
    AlreadyPersisted,

    #[error("effect is not persisted and no target entity was given")]
    NotPersisted,

    #[error("effect is held by another entity")]
    HeldElsewhere,

    #[error("{0} effects cannot be applied instantly")]
    InstantUnsupported(&'static str),

    #[error("expected a {expected} effect, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("composite effect cannot contain itself")]
    CyclicComposite,
}

impl GameError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::HeldElsewhere => ErrorSeverity::Recoverable,
            Self::NotPersisted | Self::InstantUnsupported(_) => ErrorSeverity::Validation,
            Self::AlreadyPersisted | Self::WrongKind { .. } | Self::CyclicComposite => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyPersisted => "EFFECT_ALREADY_PERSISTED",
            Self::NotPersisted => "EFFECT_NOT_PERSISTED",
            Self::HeldElsewhere => "EFFECT_HELD_ELSEWHERE",
            Self::InstantUnsupported(_) => "EFFECT_INSTANT_UNSUPPORTED",
            Self::WrongKind { .. } => "EFFECT_WRONG_KIND",
            Self::CyclicComposite => "EFFECT_CYCLIC_COMPOSITE",
        }
    }
}

/// Who or what produced an effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectSource {
    Entity(EntityId),
    Action(ActionId),
    Effect(EffectId),
    Named(String),
}

#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum EffectKind {
    Modifier(ModifierEffect),
    Definition(DefinitionEffect),
    Composite(CompositeEffect),
    Periodic(PeriodicEffect),
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    name: Option<String>,
    target_property: Option<String>,
    source: Option<EffectSource>,
    unique_id: Option<String>,
    duration: Option<Timer>,
    pub(crate) holder: Option<EntityId>,
    pub(crate) persisted: bool,
    pub(crate) kind: EffectKind,
}

impl Effect {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            name: None,
            target_property: None,
            source: None,
            unique_id: None,
            duration: None,
            holder: None,
            persisted: false,
            kind,
        }
    }

    pub fn modifier(
        target_property: impl Into<String>,
        operation: ModifierOperation,
        value: f64,
    ) -> Self {
        Self::new(EffectKind::Modifier(ModifierEffect::new(operation, value)))
            .with_target(target_property)
    }

    pub fn add(target_property: impl Into<String>, value: f64) -> Self {
        Self::modifier(target_property, ModifierOperation::Add, value)
    }

    pub fn multiply(target_property: impl Into<String>, value: f64) -> Self {
        Self::modifier(target_property, ModifierOperation::Multiply, value)
    }

    /// Modifier whose operation is inferred from the magnitude with the
    /// default additive threshold.
    pub fn stat_modifier(target_property: impl Into<String>, value: f64) -> Self {
        let operation = ModifierOperation::infer(value, EngineConfig::DEFAULT_ADDITIVE_THRESHOLD);
        Self::modifier(target_property, operation, value)
    }

    pub fn resource_modifier(
        target_property: impl Into<String>,
        field: ResourceField,
        value: f64,
    ) -> Self {
        Self::new(EffectKind::Modifier(ModifierEffect::resource(field, value)))
            .with_target(target_property)
    }

    /// Modifier whose value is recalculated from `formula` whenever it is
    /// applied, e.g. damage scaling with the caster's Intellect.
    pub fn calculated(
        target_property: impl Into<String>,
        operation: ModifierOperation,
        formula: Formula,
    ) -> Self {
        let modifier = ModifierEffect::new(operation, 0.0).with_formula(formula);
        Self::new(EffectKind::Modifier(modifier)).with_target(target_property)
    }

    /// Calculated modifier on one field of a resource.
    pub fn calculated_resource(
        target_property: impl Into<String>,
        field: ResourceField,
        formula: Formula,
    ) -> Self {
        let modifier = ModifierEffect::resource(field, 0.0).with_formula(formula);
        Self::new(EffectKind::Modifier(modifier)).with_target(target_property)
    }

    /// Parses `"+10 Intellect"` or `"-50% Courage"` into a statistic modifier.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let parsed = parse::parse_modifier(text)?;
        Ok(Self::modifier(parsed.target, parsed.operation, parsed.value))
    }

    pub fn definition(template: Property) -> Self {
        let name = template.name().to_owned();
        Self::new(EffectKind::Definition(DefinitionEffect::new(template))).with_target(name)
    }

    pub fn composite(children: Vec<EffectId>) -> Self {
        Self::new(EffectKind::Composite(CompositeEffect::new(children)))
    }

    pub fn periodic(total_ms: f64, period_ms: f64, call_initially: bool) -> Self {
        Self::new(EffectKind::Periodic(PeriodicEffect::new(
            total_ms,
            period_ms,
            call_initially,
        )))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_target(mut self, target_property: impl Into<String>) -> Self {
        self.target_property = Some(target_property.into());
        self
    }

    pub fn with_source(mut self, source: EffectSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Expires the effect `duration_ms` after it is first held by an entity.
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = Some(Timer::new(duration_ms));
        self
    }

    /// Display name, falling back to the kind and target.
    pub fn name(&self) -> String {
        match (&self.name, &self.target_property) {
            (Some(name), _) => name.clone(),
            (None, Some(target)) => format!("{} {}", self.kind.name(), target),
            (None, None) => self.kind.name().to_owned(),
        }
    }

    pub fn target_property(&self) -> Option<&str> {
        self.target_property.as_deref()
    }

    pub fn source(&self) -> Option<&EffectSource> {
        self.source.as_ref()
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    pub fn duration(&self) -> Option<&Timer> {
        self.duration.as_ref()
    }

    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Entity holding this effect, applied or parked.
    pub fn holder(&self) -> Option<EntityId> {
        self.holder
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Entity the effect is currently applied to.
    pub fn target_entity(&self) -> Option<EntityId> {
        if self.persisted { self.holder } else { None }
    }

    /// Arbitration strength: magnitude for modifiers, zero otherwise.
    pub fn strength(&self) -> f64 {
        match &self.kind {
            EffectKind::Modifier(modifier) => modifier.value().abs(),
            _ => 0.0,
        }
    }

    pub fn as_modifier(&self) -> Option<&ModifierEffect> {
        match &self.kind {
            EffectKind::Modifier(modifier) => Some(modifier),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeEffect> {
        match &self.kind {
            EffectKind::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    pub fn as_definition(&self) -> Option<&DefinitionEffect> {
        match &self.kind {
            EffectKind::Definition(definition) => Some(definition),
            _ => None,
        }
    }

    pub fn as_periodic(&self) -> Option<&PeriodicEffect> {
        match &self.kind {
            EffectKind::Periodic(periodic) => Some(periodic),
            _ => None,
        }
    }

    pub(crate) fn set_source(&mut self, source: Option<EffectSource>) {
        self.source = source;
    }

    pub(crate) fn duration_mut(&mut self) -> Option<&mut Timer> {
        self.duration.as_mut()
    }

    pub(crate) fn modifier_mut(&mut self) -> Result<&mut ModifierEffect, EffectError> {
        match &mut self.kind {
            EffectKind::Modifier(modifier) => Ok(modifier),
            other => Err(EffectError::WrongKind {
                expected: "modifier",
                found: other.name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_is_modifier_magnitude() {
        assert_eq!(Effect::add("Courage", -50.0).strength(), 50.0);
        assert_eq!(Effect::multiply("Courage", 0.2).strength(), 0.2);
        assert_eq!(Effect::periodic(1000.0, 100.0, false).strength(), 0.0);
    }

    #[test]
    fn parsed_effect_targets_named_property() {
        let effect = Effect::parse("-50% Courage").unwrap();
        assert_eq!(effect.target_property(), Some("Courage"));

        let modifier = effect.as_modifier().unwrap();
        assert_eq!(modifier.operation(), ModifierOperation::Multiply);
        assert_eq!(modifier.value(), -0.5);
    }

    #[test]
    fn stat_modifier_infers_operation() {
        let flat = Effect::stat_modifier("Strength", 5.0);
        assert_eq!(flat.as_modifier().unwrap().operation(), ModifierOperation::Add);

        let percent = Effect::stat_modifier("Strength", 0.1);
        assert_eq!(
            percent.as_modifier().unwrap().operation(),
            ModifierOperation::Multiply
        );
    }

    #[test]
    fn name_falls_back_to_kind_and_target() {
        assert_eq!(Effect::add("HP", 5.0).name(), "modifier HP");
        assert_eq!(Effect::add("HP", 5.0).with_name("Vigor").name(), "Vigor");
        assert_eq!(Effect::composite(Vec::new()).name(), "composite");
    }
}
