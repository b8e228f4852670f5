//! Action templates.

use rpg_core::{
    Action, ActionEffect, ActionError, ActionId, CoreResult, EntityId, PropertyValue, Requirement,
    World,
};

/// Serializable form of a [`Requirement`].
///
/// The internal cooldown is implicit and never listed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequirementTemplate {
    /// Spends `quantity` of the resource on use.
    Resource {
        resource: String,
        quantity: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        error: Option<String>,
    },
    /// Needs at least `quantity` but spends nothing.
    MinimumResource {
        resource: String,
        quantity: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        error: Option<String>,
    },
    /// Shares the named resource's cooldown.
    ResourceCooldown {
        resource: String,
        #[cfg_attr(feature = "serde", serde(default))]
        error: Option<String>,
    },
    /// Needs the named flag to hold `value`.
    Flag {
        property: String,
        value: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        error: Option<String>,
    },
}

impl RequirementTemplate {
    pub fn build(&self) -> Requirement {
        let (requirement, error) = match self {
            Self::Resource {
                resource,
                quantity,
                error,
            } => (Requirement::resource(resource.clone(), *quantity), error),
            Self::MinimumResource {
                resource,
                quantity,
                error,
            } => (Requirement::minimum_resource(resource.clone(), *quantity), error),
            Self::ResourceCooldown { resource, error } => {
                (Requirement::resource_cooldown(resource.clone()), error)
            }
            Self::Flag {
                property,
                value,
                error,
            } => (
                Requirement::property_state(property.clone(), PropertyValue::Flag(*value)),
                error,
            ),
        };
        match error {
            Some(message) => requirement.with_error(message.clone()),
            None => requirement,
        }
    }
}

/// Blueprint for an [`Action`].
///
/// RON example:
/// ```ron
/// (
///     name: "Fireball",
///     cooldown: Some(1500.0),
///     requirements: [Resource(resource: "Mana", quantity: 50.0)],
///     end_effects: [(
///         name: "burn",
///         display_name: Some("Burn"),
///         category: Damage,
///         spec: (kind: Shorthand("-12 HP")),
///     )],
/// )
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionTemplate {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    /// Milliseconds; no cooldown when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast_time: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub period_time: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requirements: Vec<RequirementTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub begin_effects: Vec<ActionEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub periodic_effects: Vec<ActionEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub end_effects: Vec<ActionEffect>,
}

impl ActionTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds an unowned action.
    ///
    /// ## Errors
    /// - `ActionError::NegativeCooldown` - the cooldown is negative or NaN
    pub fn build(&self) -> Result<Action, ActionError> {
        let mut action = Action::new(self.name.clone());
        if let Some(display_name) = &self.display_name {
            action = action.with_display_name(display_name.clone());
        }
        if let Some(description) = &self.description {
            action = action.with_description(description.clone());
        }
        if let Some(cooldown) = self.cooldown {
            action = action.with_cooldown(cooldown)?;
        }
        if let Some(cast_time) = self.cast_time {
            action = action.with_cast_time(cast_time);
        }
        if let Some(period_time) = self.period_time {
            action = action.with_period_time(period_time);
        }

        action = self
            .requirements
            .iter()
            .fold(action, |action, requirement| action.with_requirement(requirement.build()));
        action = self
            .begin_effects
            .iter()
            .cloned()
            .fold(action, Action::with_begin_effect);
        action = self
            .periodic_effects
            .iter()
            .cloned()
            .fold(action, Action::with_periodic_effect);
        action = self
            .end_effects
            .iter()
            .cloned()
            .fold(action, Action::with_end_effect);
        Ok(action)
    }

    /// Builds the action and gives it to `owner`.
    pub fn grant(&self, world: &mut World, owner: EntityId) -> CoreResult<ActionId> {
        let action = world.grant_ability(owner, self.build()?)?;
        tracing::debug!(template = %self.name, action = %action, "granted from template");
        Ok(action)
    }
}
