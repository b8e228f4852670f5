/// Anything that can be read as a single number.
pub trait ValueSource {
    fn value(&self) -> f64;
}

impl ValueSource for f64 {
    fn value(&self) -> f64 {
        *self
    }
}

/// Names a numeric property to read from whichever entity it is resolved
/// against, see [`World::value_of`](crate::World::value_of).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSourceDescriptor {
    pub property_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_name: Option<String>,
}

impl ValueSourceDescriptor {
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.property_name)
    }
}

/// Direction of a statistic's modifiers relative to its base.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetEffect {
    /// No modifiers are applied.
    #[default]
    None,
    /// Modifiers are applied but cancel out.
    Neutral,
    Positive,
    Negative,
}

impl NetEffect {
    /// Whether this effect is good for the holder, given which direction is better.
    pub fn is_beneficial(self, higher_is_better: bool) -> bool {
        match self {
            Self::Positive => higher_is_better,
            Self::Negative => !higher_is_better,
            Self::None | Self::Neutral => false,
        }
    }
}

/// Rounds half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
