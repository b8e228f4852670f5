//! Gating conditions on actions.
//!
//! Each requirement caches whether it is met. The cache is refreshed by
//! [`World::settle`](crate::World::settle) after every mutation, and by the
//! execution pipeline right before it checks the gate.

use generational_arena::Arena;

use crate::state::{Entity, Property, PropertyId, PropertyValue};
use crate::stats::{Cooldown, Statistic, ValueSource};

#[derive(Clone, Debug, PartialEq)]
pub enum CooldownSource {
    /// The owning action's own cooldown.
    Internal,
    /// Cooldown of a named resource on the owner.
    Resource {
        name: String,
        bound: Option<PropertyId>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceCost {
    resource: String,
    quantity: Statistic,
    bound: Option<PropertyId>,
}

impl ResourceCost {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn quantity(&self) -> &Statistic {
        &self.quantity
    }

    pub fn quantity_mut(&mut self) -> &mut Statistic {
        &mut self.quantity
    }

    pub fn bound(&self) -> Option<PropertyId> {
        self.bound
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StateCheck {
    property: String,
    required: PropertyValue,
    bound: Option<PropertyId>,
}

impl StateCheck {
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn required(&self) -> &PropertyValue {
        &self.required
    }

    pub fn bound(&self) -> Option<PropertyId> {
        self.bound
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequirementKind {
    Cooldown(CooldownSource),
    /// Needs at least the quantity and consumes it on use.
    Resource(ResourceCost),
    /// Needs at least the quantity; never consumes.
    MinimumResource(ResourceCost),
    /// Needs the named property's payload to equal a given value.
    PropertyState(StateCheck),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Requirement {
    kind: RequirementKind,
    error: Option<String>,
    pub(crate) met: bool,
}

impl Requirement {
    fn from_kind(kind: RequirementKind) -> Self {
        Self {
            kind,
            error: None,
            met: false,
        }
    }

    /// Implicit first requirement of every action. A fresh cooldown is available.
    pub fn internal_cooldown() -> Self {
        let mut requirement = Self::from_kind(RequirementKind::Cooldown(CooldownSource::Internal));
        requirement.met = true;
        requirement
    }

    pub fn resource_cooldown(resource: impl Into<String>) -> Self {
        Self::from_kind(RequirementKind::Cooldown(CooldownSource::Resource {
            name: resource.into(),
            bound: None,
        }))
    }

    pub fn resource(resource: impl Into<String>, quantity: f64) -> Self {
        Self::from_kind(RequirementKind::Resource(ResourceCost {
            resource: resource.into(),
            quantity: Statistic::new(quantity),
            bound: None,
        }))
    }

    pub fn minimum_resource(resource: impl Into<String>, quantity: f64) -> Self {
        Self::from_kind(RequirementKind::MinimumResource(ResourceCost {
            resource: resource.into(),
            quantity: Statistic::new(quantity),
            bound: None,
        }))
    }

    pub fn property_state(property: impl Into<String>, required: PropertyValue) -> Self {
        Self::from_kind(RequirementKind::PropertyState(StateCheck {
            property: property.into(),
            required,
            bound: None,
        }))
    }

    /// Overrides the default unmet message.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn kind(&self) -> &RequirementKind {
        &self.kind
    }

    pub fn is_met(&self) -> bool {
        self.met
    }

    /// Whether using this requirement spends something.
    pub fn consumes(&self) -> bool {
        matches!(self.kind, RequirementKind::Resource(_))
    }

    /// Name of the owner property this requirement reads, if any.
    pub fn property_name(&self) -> Option<&str> {
        match &self.kind {
            RequirementKind::Cooldown(CooldownSource::Internal) => None,
            RequirementKind::Cooldown(CooldownSource::Resource { name, .. }) => Some(name),
            RequirementKind::Resource(cost) | RequirementKind::MinimumResource(cost) => {
                Some(&cost.resource)
            }
            RequirementKind::PropertyState(check) => Some(&check.property),
        }
    }

    pub fn bound_property(&self) -> Option<PropertyId> {
        match &self.kind {
            RequirementKind::Cooldown(CooldownSource::Internal) => None,
            RequirementKind::Cooldown(CooldownSource::Resource { bound, .. }) => *bound,
            RequirementKind::Resource(cost) | RequirementKind::MinimumResource(cost) => cost.bound,
            RequirementKind::PropertyState(check) => check.bound,
        }
    }

    pub fn error_message(&self) -> String {
        if let Some(message) = &self.error {
            return message.clone();
        }
        match &self.kind {
            RequirementKind::Cooldown(CooldownSource::Internal) => "Action is on cooldown".into(),
            RequirementKind::Cooldown(CooldownSource::Resource { name, .. }) => {
                format!("{name} is on cooldown")
            }
            RequirementKind::Resource(cost) | RequirementKind::MinimumResource(cost) => {
                format!("Needs at least {} {}", cost.quantity.value(), cost.resource)
            }
            RequirementKind::PropertyState(check) => {
                format!("Requires {} to be {}", check.property, check.required)
            }
        }
    }

    /// Resolves the named property on `owner`. Properties of the wrong
    /// payload leave the requirement unbound.
    pub(crate) fn bind(&mut self, owner: &Entity, properties: &Arena<Property>) {
        let resolve = |name: &str, want_resource: bool| {
            owner.property(name).filter(|id| {
                properties
                    .get(id.0)
                    .is_some_and(|property| !want_resource || property.as_resource().is_some())
            })
        };
        match &mut self.kind {
            RequirementKind::Cooldown(CooldownSource::Internal) => {}
            RequirementKind::Cooldown(CooldownSource::Resource { name, bound }) => {
                *bound = resolve(name, true);
            }
            RequirementKind::Resource(cost) | RequirementKind::MinimumResource(cost) => {
                cost.bound = resolve(&cost.resource, true);
            }
            RequirementKind::PropertyState(check) => {
                check.bound = resolve(&check.property, false);
            }
        }
    }

    pub(crate) fn unbind(&mut self) {
        match &mut self.kind {
            RequirementKind::Cooldown(CooldownSource::Internal) => {}
            RequirementKind::Cooldown(CooldownSource::Resource { bound, .. }) => *bound = None,
            RequirementKind::Resource(cost) | RequirementKind::MinimumResource(cost) => {
                cost.bound = None;
            }
            RequirementKind::PropertyState(check) => check.bound = None,
        }
    }

    /// Pure check against current world data. Unbound requirements are unmet.
    pub(crate) fn evaluate(&self, properties: &Arena<Property>, cooldown: &Cooldown) -> bool {
        let lookup = |bound: Option<PropertyId>| bound.and_then(|id| properties.get(id.0));
        match &self.kind {
            RequirementKind::Cooldown(CooldownSource::Internal) => cooldown.is_available(),
            RequirementKind::Cooldown(CooldownSource::Resource { bound, .. }) => lookup(*bound)
                .and_then(Property::as_resource)
                .is_some_and(|resource| resource.is_available()),
            RequirementKind::Resource(cost) | RequirementKind::MinimumResource(cost) => {
                lookup(cost.bound)
                    .and_then(Property::as_resource)
                    .is_some_and(|resource| {
                        resource.is_available() && resource.current() >= cost.quantity.value()
                    })
            }
            RequirementKind::PropertyState(check) => {
                lookup(check.bound).is_some_and(|property| *property.value() == check.required)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_messages() {
        assert_eq!(
            Requirement::resource("Mana", 50.0).error_message(),
            "Needs at least 50 Mana"
        );
        assert_eq!(
            Requirement::internal_cooldown().error_message(),
            "Action is on cooldown"
        );
        assert_eq!(
            Requirement::property_state("Stance", PropertyValue::Text("Defensive".into()))
                .error_message(),
            "Requires Stance to be Defensive"
        );
        assert_eq!(
            Requirement::minimum_resource("Rage", 10.0)
                .with_error("Not angry enough")
                .error_message(),
            "Not angry enough"
        );
    }

    #[test]
    fn only_resource_requirement_consumes() {
        assert!(Requirement::resource("Mana", 1.0).consumes());
        assert!(!Requirement::minimum_resource("Mana", 1.0).consumes());
        assert!(!Requirement::internal_cooldown().consumes());
    }

    #[test]
    fn unbound_requirements_are_unmet() {
        let properties = Arena::new();
        let cooldown = Cooldown::default();

        assert!(!Requirement::resource("Mana", 0.0).evaluate(&properties, &cooldown));
        assert!(Requirement::internal_cooldown().evaluate(&properties, &cooldown));
    }
}
