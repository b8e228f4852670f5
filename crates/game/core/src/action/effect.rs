//! Effects attached to an action's begin, periodic and end phases.

use crate::effect::EffectSpec;

use super::log::EffectLogEntry;

/// Routing tag for effect processors.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectCategory {
    Damage,
    Healing,
    Buff,
    Debuff,
    Utility,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionEffect {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    pub category: EffectCategory,
    pub spec: EffectSpec,
}

impl ActionEffect {
    pub fn new(name: impl Into<String>, category: EffectCategory, spec: EffectSpec) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            category,
            spec,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Human-readable combat log line for one application of this effect.
    pub fn log_string(&self, entry: &EffectLogEntry) -> String {
        let mut line = format!(
            "{}'s {} applies {} to {}",
            entry.actor,
            entry.action,
            self.display_name(),
            entry.target
        );
        if let Some(value) = entry.value {
            line.push_str(&format!(" ({value:+})"));
        }
        line
    }
}
