//! Reversible numeric adjustments of statistics and resources.

use crate::state::{Property, PropertyError, PropertyId, PropertyValue};
use crate::stats::{NetEffect, Resource, Statistic};

use super::formula::Formula;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierOperation {
    /// Adds the value to the target's add total.
    #[default]
    Add,
    /// Adds the value to the target's multiply total (0.1 means +10%).
    Multiply,
}

impl ModifierOperation {
    /// Zero and magnitudes above `threshold` are additive, smaller ones are
    /// fractions.
    pub fn infer(value: f64, threshold: f64) -> Self {
        if value == 0.0 || value.abs() > threshold {
            Self::Add
        } else {
            Self::Multiply
        }
    }
}

/// Part of a resource a modifier adjusts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceField {
    Current,
    MaxBase,
    MaxAdd,
    MaxMultiply,
    MinBase,
    MinAdd,
    MinMultiply,
}

impl ResourceField {
    pub fn operation(self) -> ModifierOperation {
        match self {
            Self::MaxMultiply | Self::MinMultiply => ModifierOperation::Multiply,
            _ => ModifierOperation::Add,
        }
    }

    /// Same bound, different operation. `Current` only supports adding.
    pub fn with_operation(self, operation: ModifierOperation) -> Self {
        use ModifierOperation::{Add, Multiply};
        match (self, operation) {
            (Self::MaxBase | Self::MaxAdd | Self::MaxMultiply, Multiply) => Self::MaxMultiply,
            (Self::MaxMultiply, Add) => Self::MaxAdd,
            (Self::MinBase | Self::MinAdd | Self::MinMultiply, Multiply) => Self::MinMultiply,
            (Self::MinMultiply, Add) => Self::MinAdd,
            (field, _) => field,
        }
    }

    fn apply(self, resource: &mut Resource, delta: f64) {
        fn shift_base(stat: &mut Statistic, delta: f64) {
            stat.set_base(stat.base() + delta);
        }

        match self {
            Self::Current => resource.adjust_current(delta),
            Self::MaxBase => resource.update_max(|stat| shift_base(stat, delta)),
            Self::MaxAdd => resource.update_max(|stat| stat.add_to_total(delta)),
            Self::MaxMultiply => resource.update_max(|stat| stat.add_to_multiplier(delta)),
            Self::MinBase => resource.update_min(|stat| shift_base(stat, delta)),
            Self::MinAdd => resource.update_min(|stat| stat.add_to_total(delta)),
            Self::MinMultiply => resource.update_min(|stat| stat.add_to_multiplier(delta)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierTarget {
    #[default]
    Statistic,
    Resource(ResourceField),
}

impl ModifierTarget {
    fn expected_kind(self) -> &'static str {
        match self {
            Self::Statistic => "statistic",
            Self::Resource(_) => "resource",
        }
    }
}

/// Numeric modifier payload of an effect.
///
/// While bound, the modifier's contribution is reflected in exactly one
/// property and the property lists the owning effect among its modifiers.
/// A calculated modifier carries a [`Formula`] and takes its value from it
/// every time it is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ModifierEffect {
    operation: ModifierOperation,
    value: f64,
    target: ModifierTarget,
    formula: Option<Formula>,
    pub(crate) bound: Option<PropertyId>,
}

impl ModifierEffect {
    pub fn new(operation: ModifierOperation, value: f64) -> Self {
        Self {
            operation,
            value,
            target: ModifierTarget::Statistic,
            formula: None,
            bound: None,
        }
    }

    pub fn resource(field: ResourceField, value: f64) -> Self {
        Self {
            operation: field.operation(),
            value,
            target: ModifierTarget::Resource(field),
            formula: None,
            bound: None,
        }
    }

    /// Modifier whose value is recalculated from `formula` on each application.
    pub fn with_formula(mut self, formula: Formula) -> Self {
        self.formula = Some(formula);
        self
    }

    pub fn formula(&self) -> Option<&Formula> {
        self.formula.as_ref()
    }

    pub fn is_calculated(&self) -> bool {
        self.formula.is_some()
    }

    pub fn operation(&self) -> ModifierOperation {
        self.operation
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn target(&self) -> ModifierTarget {
        self.target
    }

    /// Direction of this modifier alone, from the sign of its value.
    pub fn net_effect(&self) -> NetEffect {
        if self.value > 0.0 {
            NetEffect::Positive
        } else if self.value < 0.0 {
            NetEffect::Negative
        } else {
            NetEffect::Neutral
        }
    }

    /// Property this modifier is currently applied to.
    pub fn bound_property(&self) -> Option<PropertyId> {
        self.bound
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub(crate) fn set_operation(&mut self, operation: ModifierOperation) {
        self.operation = operation;
        if let ModifierTarget::Resource(field) = self.target {
            self.target = ModifierTarget::Resource(field.with_operation(operation));
        }
    }

    /// Adds (`sign = 1.0`) or removes (`sign = -1.0`) this modifier's
    /// contribution on the property payload.
    pub(crate) fn apply_to(&self, property: &mut Property, sign: f64) -> Result<(), PropertyError> {
        let delta = sign * self.value;
        let applied = match (self.target, property.value_mut()) {
            (ModifierTarget::Statistic, PropertyValue::Statistic(stat)) => {
                match self.operation {
                    ModifierOperation::Add => stat.add_to_total(delta),
                    ModifierOperation::Multiply => stat.add_to_multiplier(delta),
                }
                true
            }
            (ModifierTarget::Resource(field), PropertyValue::Resource(resource)) => {
                field.apply(resource, delta);
                true
            }
            _ => false,
        };

        if applied {
            Ok(())
        } else {
            Err(property.mismatch(self.target.expected_kind()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ValueSource;

    #[test]
    fn infer_uses_threshold() {
        assert_eq!(ModifierOperation::infer(10.0, 1.0), ModifierOperation::Add);
        assert_eq!(ModifierOperation::infer(0.0, 1.0), ModifierOperation::Add);
        assert_eq!(ModifierOperation::infer(-1.0, 1.0), ModifierOperation::Multiply);
        assert_eq!(ModifierOperation::infer(0.25, 1.0), ModifierOperation::Multiply);
    }

    #[test]
    fn net_effect_follows_sign() {
        let buff = ModifierEffect::new(ModifierOperation::Add, 5.0);
        let debuff = ModifierEffect::new(ModifierOperation::Multiply, -0.5);
        let placeholder = ModifierEffect::new(ModifierOperation::Add, 0.0);

        assert_eq!(buff.net_effect(), NetEffect::Positive);
        assert_eq!(debuff.net_effect(), NetEffect::Negative);
        assert_eq!(placeholder.net_effect(), NetEffect::Neutral);
    }

    #[test]
    fn statistic_modifier_round_trips() {
        let mut property = Property::statistic("Intellect", 10.0);
        let modifier = ModifierEffect::new(ModifierOperation::Multiply, 0.5);

        modifier.apply_to(&mut property, 1.0).unwrap();
        assert_eq!(property.as_statistic().unwrap().value(), 15.0);

        modifier.apply_to(&mut property, -1.0).unwrap();
        assert_eq!(property.as_statistic().unwrap().value(), 10.0);
    }

    #[test]
    fn min_fields_adjust_the_minimum() {
        let mut property = Property::resource("Mana", 5.0, 100.0);
        let modifier = ModifierEffect::resource(ResourceField::MinAdd, 20.0);

        modifier.apply_to(&mut property, 1.0).unwrap();
        let resource = property.as_resource().unwrap();
        assert_eq!(resource.min().value(), 20.0);
        assert_eq!(resource.max().value(), 100.0);
        assert_eq!(resource.current(), 20.0);
    }

    #[test]
    fn max_multiply_scales_max_and_current() {
        let mut property = Property::resource("HP", 100.0, 100.0);
        let modifier = ModifierEffect::resource(ResourceField::MaxMultiply, 0.5);
        assert_eq!(modifier.operation(), ModifierOperation::Multiply);

        modifier.apply_to(&mut property, 1.0).unwrap();
        assert_eq!(property.as_resource().unwrap().current(), 150.0);

        modifier.apply_to(&mut property, -1.0).unwrap();
        assert_eq!(property.as_resource().unwrap().current(), 100.0);
    }

    #[test]
    fn mismatched_payload_is_rejected_unchanged() {
        let mut property = Property::new("Stunned", PropertyValue::Flag(false));
        let modifier = ModifierEffect::new(ModifierOperation::Add, 5.0);

        let err = modifier.apply_to(&mut property, 1.0).unwrap_err();
        assert!(matches!(err, PropertyError::PayloadMismatch { .. }));
        assert_eq!(property.value(), &PropertyValue::Flag(false));
    }

    #[test]
    fn changing_operation_remaps_resource_field() {
        let mut modifier = ModifierEffect::resource(ResourceField::MaxAdd, 0.2);
        modifier.set_operation(ModifierOperation::Multiply);
        assert_eq!(
            modifier.target(),
            ModifierTarget::Resource(ResourceField::MaxMultiply)
        );
    }
}
