//! Named, typed slots attached to entities.

use crate::error::{ErrorSeverity, GameError};
use crate::stats::{Resource, StatError, Statistic, ValueSource};

use super::ids::{EffectId, EntityId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    #[error("property `{name}` is already bound to an entity")]
    AlreadyBound { name: String },

    #[error("entity already has a property named `{name}`")]
    DuplicateName { name: String },

    #[error("property `{name}` holds a {found} value, expected {expected}")]
    PayloadMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl GameError for PropertyError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyBound { .. } => "PROPERTY_ALREADY_BOUND",
            Self::DuplicateName { .. } => "PROPERTY_DUPLICATE_NAME",
            Self::PayloadMismatch { .. } => "PROPERTY_PAYLOAD_MISMATCH",
        }
    }
}

/// Payload of a property.
#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum PropertyValue {
    Statistic(Statistic),
    Resource(Resource),
    Flag(bool),
    Text(String),
    /// Marker carried by accessories: the referenced effect is persisted on
    /// whichever entity equips the accessory.
    Effect(EffectId),
    Empty,
}

impl PropertyValue {
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Numeric reading where one exists (statistic value or resource current).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Statistic(stat) => Some(stat.value()),
            Self::Resource(resource) => Some(resource.value()),
            _ => None,
        }
    }
}

impl core::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Statistic(stat) => write!(f, "{}", stat.value()),
            Self::Resource(resource) => {
                write!(f, "{}/{}", resource.current(), resource.max().value())
            }
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Text(text) => f.write_str(text),
            Self::Effect(effect) => write!(f, "{effect}"),
            Self::Empty => f.write_str("nothing"),
        }
    }
}

impl From<Statistic> for PropertyValue {
    fn from(stat: Statistic) -> Self {
        Self::Statistic(stat)
    }
}

impl From<Resource> for PropertyValue {
    fn from(resource: Resource) -> Self {
        Self::Resource(resource)
    }
}

impl From<bool> for PropertyValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    name: String,
    display_name: Option<String>,
    description: Option<String>,
    value: PropertyValue,
    parent: Option<EntityId>,
    modifiers: Vec<EffectId>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            value: value.into(),
            parent: None,
            modifiers: Vec::new(),
        }
    }

    pub fn statistic(name: impl Into<String>, base: f64) -> Self {
        Self::new(name, Statistic::new(base))
    }

    pub fn resource(name: impl Into<String>, current: f64, max: f64) -> Self {
        Self::new(name, Resource::new(current, max))
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn is_bound(&self) -> bool {
        self.parent.is_some()
    }

    /// Modifier effects currently applied to this property.
    pub fn modifiers(&self) -> &[EffectId] {
        &self.modifiers
    }

    pub fn as_statistic(&self) -> Option<&Statistic> {
        match &self.value {
            PropertyValue::Statistic(stat) => Some(stat),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match &self.value {
            PropertyValue::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self.value {
            PropertyValue::Flag(flag) => Some(flag),
            _ => None,
        }
    }

    /// Effect to persist on the equipping entity, if this is an accessory marker.
    pub fn parent_effect(&self) -> Option<EffectId> {
        match self.value {
            PropertyValue::Effect(effect) => Some(effect),
            _ => None,
        }
    }

    pub(crate) fn value_mut(&mut self) -> &mut PropertyValue {
        &mut self.value
    }

    pub(crate) fn set_value(&mut self, value: PropertyValue) {
        self.value = value;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub(crate) fn push_modifier(&mut self, effect: EffectId) {
        if !self.modifiers.contains(&effect) {
            self.modifiers.push(effect);
        }
    }

    pub(crate) fn remove_modifier(&mut self, effect: EffectId) {
        self.modifiers.retain(|id| *id != effect);
    }

    pub(crate) fn mismatch(&self, expected: &'static str) -> PropertyError {
        PropertyError::PayloadMismatch {
            name: self.name.clone(),
            expected,
            found: self.value.kind(),
        }
    }
}

// ============================================================================
// Data-driven definitions
// ============================================================================

/// Loadable description of a property payload.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueSpec {
    Statistic {
        base: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        min: Option<f64>,
        #[cfg_attr(feature = "serde", serde(default))]
        max: Option<f64>,
    },
    Resource {
        current: f64,
        max: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        cooldown: Option<f64>,
    },
    Flag(bool),
    Text(String),
    Empty,
}

impl ValueSpec {
    pub fn build(&self) -> Result<PropertyValue, StatError> {
        Ok(match self {
            Self::Statistic { base, min, max } => {
                let stat = match (min, max) {
                    (None, None) => Statistic::new(*base),
                    _ => Statistic::bounded(
                        *base,
                        min.unwrap_or(f64::MIN),
                        max.unwrap_or(f64::MAX),
                    )?,
                };
                PropertyValue::Statistic(stat)
            }
            Self::Resource {
                current,
                max,
                cooldown,
            } => {
                let resource = Resource::new(*current, *max);
                PropertyValue::Resource(match cooldown {
                    Some(period) => resource.with_cooldown(*period),
                    None => resource,
                })
            }
            Self::Flag(flag) => PropertyValue::Flag(*flag),
            Self::Text(text) => PropertyValue::Text(text.clone()),
            Self::Empty => PropertyValue::Empty,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertySpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    pub value: ValueSpec,
}

impl PropertySpec {
    pub fn new(name: impl Into<String>, value: ValueSpec) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            value,
        }
    }

    pub fn build(&self) -> Result<Property, StatError> {
        let mut property = Property::new(self.name.clone(), self.value.build()?);
        property.display_name = self.display_name.clone();
        property.description = self.description.clone();
        Ok(property)
    }
}
