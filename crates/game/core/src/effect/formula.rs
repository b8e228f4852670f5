//! Formulas for calculated modifier values.
//!
//! A calculated modifier recomputes its value each time it is applied, from
//! properties read off the entity that caused the effect and the entity it
//! lands on. Formulas nest arbitrarily.
//!
//! ```ignore
//! // 50% of the caster's Intellect plus 10, dealt as damage
//! Formula::Negate(Box::new(Formula::Sum(vec![
//!     Formula::source("Intellect", 50.0),
//!     Formula::Constant(10.0),
//! ])))
//! ```

use crate::stats::ValueSourceDescriptor;

/// Which entity a formula input is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum FormulaSide {
    /// The entity behind the effect's source (caster, equipping item).
    Source,
    /// The entity the effect is applied to.
    Target,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Formula {
    Constant(f64),
    /// `percent` of a property on the source entity.
    Source {
        value: ValueSourceDescriptor,
        percent: f64,
    },
    /// `percent` of a property on the target entity.
    Target {
        value: ValueSourceDescriptor,
        percent: f64,
    },
    Sum(Vec<Formula>),
    Product(Vec<Formula>),
    Min(Vec<Formula>),
    Max(Vec<Formula>),
    Negate(Box<Formula>),
}

impl Formula {
    pub fn source(property_name: impl Into<String>, percent: f64) -> Self {
        Self::Source {
            value: ValueSourceDescriptor::new(property_name),
            percent,
        }
    }

    pub fn target(property_name: impl Into<String>, percent: f64) -> Self {
        Self::Target {
            value: ValueSourceDescriptor::new(property_name),
            percent,
        }
    }

    /// Evaluates the formula. `read` resolves one input; unresolved inputs
    /// (no source entity, missing or non-numeric property) count as zero.
    pub fn evaluate<F>(&self, read: &F) -> f64
    where
        F: Fn(FormulaSide, &ValueSourceDescriptor) -> Option<f64>,
    {
        match self {
            Self::Constant(value) => *value,
            Self::Source { value, percent } => {
                read(FormulaSide::Source, value).unwrap_or(0.0) * percent / 100.0
            }
            Self::Target { value, percent } => {
                read(FormulaSide::Target, value).unwrap_or(0.0) * percent / 100.0
            }
            Self::Sum(parts) => parts.iter().map(|part| part.evaluate(read)).sum(),
            Self::Product(parts) => parts.iter().map(|part| part.evaluate(read)).product(),
            Self::Min(parts) => parts
                .iter()
                .map(|part| part.evaluate(read))
                .reduce(f64::min)
                .unwrap_or(0.0),
            Self::Max(parts) => parts
                .iter()
                .map(|part| part.evaluate(read))
                .reduce(f64::max)
                .unwrap_or(0.0),
            Self::Negate(inner) => -inner.evaluate(read),
        }
    }

    /// Every property this formula reads, with the side it is read from.
    pub fn inputs(&self) -> Vec<(FormulaSide, &ValueSourceDescriptor)> {
        let mut inputs = Vec::new();
        self.collect_inputs(&mut inputs);
        inputs
    }

    fn collect_inputs<'a>(&'a self, inputs: &mut Vec<(FormulaSide, &'a ValueSourceDescriptor)>) {
        match self {
            Self::Constant(_) => {}
            Self::Source { value, .. } => inputs.push((FormulaSide::Source, value)),
            Self::Target { value, .. } => inputs.push((FormulaSide::Target, value)),
            Self::Sum(parts) | Self::Product(parts) | Self::Min(parts) | Self::Max(parts) => {
                for part in parts {
                    part.collect_inputs(inputs);
                }
            }
            Self::Negate(inner) => inner.collect_inputs(inputs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(side: FormulaSide, value: &ValueSourceDescriptor) -> Option<f64> {
        match (side, value.property_name.as_str()) {
            (FormulaSide::Source, "Intellect") => Some(40.0),
            (FormulaSide::Target, "Armor") => Some(8.0),
            _ => None,
        }
    }

    #[test]
    fn scales_and_combines_inputs() {
        let damage = Formula::Negate(Box::new(Formula::Sum(vec![
            Formula::source("Intellect", 50.0),
            Formula::Constant(10.0),
        ])));
        assert_eq!(damage.evaluate(&sheet), -30.0);

        let mitigated = Formula::Max(vec![
            Formula::Constant(1.0),
            Formula::Sum(vec![
                Formula::source("Intellect", 25.0),
                Formula::Negate(Box::new(Formula::target("Armor", 100.0))),
            ]),
        ]);
        assert_eq!(mitigated.evaluate(&sheet), 2.0);
    }

    #[test]
    fn unresolved_inputs_read_as_zero() {
        let formula = Formula::Sum(vec![Formula::source("Strength", 100.0), Formula::Constant(3.0)]);
        assert_eq!(formula.evaluate(&sheet), 3.0);
        assert_eq!(Formula::Min(Vec::new()).evaluate(&sheet), 0.0);
    }

    #[test]
    fn inputs_lists_every_read() {
        let formula = Formula::Product(vec![
            Formula::source("Intellect", 10.0),
            Formula::target("Armor", 100.0),
        ]);
        let names: Vec<_> = formula
            .inputs()
            .into_iter()
            .map(|(side, value)| (side, value.property_name.as_str()))
            .collect();
        assert_eq!(
            names,
            [(FormulaSide::Source, "Intellect"), (FormulaSide::Target, "Armor")]
        );
    }
}
