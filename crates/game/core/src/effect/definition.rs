use crate::state::{Property, PropertyId};

/// Adds a property to the target if it does not already have one by that name.
///
/// When persisted, the effect remembers the property instance it created and
/// removes only that instance on unapply. A same-named property that existed
/// beforehand is left alone.
#[derive(Clone, Debug, PartialEq)]
pub struct DefinitionEffect {
    template: Property,
    pub(crate) defined: Option<PropertyId>,
}

impl DefinitionEffect {
    pub fn new(template: Property) -> Self {
        Self {
            template,
            defined: None,
        }
    }

    pub fn template(&self) -> &Property {
        &self.template
    }

    pub fn property_name(&self) -> &str {
        self.template.name()
    }

    /// Property instance created by the current persisted application.
    pub fn defined_property(&self) -> Option<PropertyId> {
        self.defined
    }
}
