//! Loadable effect blueprints.
//!
//! Specs are plain data (serde-able behind the `serde` feature). A spec is
//! turned into live effects with [`World::spawn_effect`](crate::World::spawn_effect),
//! which allocates composite children recursively.

use crate::parse::{self, ParseError};
use crate::state::PropertySpec;

use super::{Formula, ModifierOperation, ResourceField};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSpecKind {
    Modifier {
        target: String,
        /// Inferred from the magnitude when omitted.
        #[cfg_attr(feature = "serde", serde(default))]
        operation: Option<ModifierOperation>,
        value: f64,
        /// Set for resource targets.
        #[cfg_attr(feature = "serde", serde(default))]
        field: Option<ResourceField>,
    },
    /// Modifier shorthand such as `"+10 Intellect"`.
    Shorthand(String),
    /// Modifier whose value is computed from a formula when applied.
    Calculated {
        target: String,
        /// Additive when omitted.
        #[cfg_attr(feature = "serde", serde(default))]
        operation: Option<ModifierOperation>,
        #[cfg_attr(feature = "serde", serde(default))]
        field: Option<ResourceField>,
        formula: Formula,
    },
    Define(PropertySpec),
    Composite(Vec<EffectSpec>),
    Periodic {
        total: f64,
        period: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        call_initially: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unique_id: Option<String>,
    /// Milliseconds until expiry once held.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<f64>,
    pub kind: EffectSpecKind,
}

impl EffectSpec {
    pub fn new(kind: EffectSpecKind) -> Self {
        Self {
            name: None,
            unique_id: None,
            duration: None,
            kind,
        }
    }

    pub fn modifier(target: impl Into<String>, value: f64) -> Self {
        Self::new(EffectSpecKind::Modifier {
            target: target.into(),
            operation: None,
            value,
            field: None,
        })
    }

    pub fn calculated(target: impl Into<String>, formula: Formula) -> Self {
        Self::new(EffectSpecKind::Calculated {
            target: target.into(),
            operation: None,
            field: None,
            formula,
        })
    }

    /// Validates the shorthand eagerly so bad content fails at load time.
    pub fn shorthand(text: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();
        parse::parse_modifier(&text)?;
        Ok(Self::new(EffectSpecKind::Shorthand(text)))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    /// Effects this blueprint would allocate, itself included.
    pub fn effect_count(&self) -> usize {
        match &self.kind {
            EffectSpecKind::Composite(children) => {
                1 + children.iter().map(Self::effect_count).sum::<usize>()
            }
            _ => 1,
        }
    }
}
