//! The arena that owns every entity, property, effect and action.
//!
//! Cross-references between objects are generational handles, so the graph
//! (property ↔ parent entity, modifier ↔ bound property, requirement ↔
//! owner resource, accessory ↔ wearer) has no ownership cycles. All
//! mutation goes through `&mut World`; the exclusive borrow is what keeps
//! check-then-act sequences such as resource consumption atomic.

use generational_arena::Arena;

use crate::action::Action;
use crate::config::EngineConfig;
use crate::effect::Effect;
use crate::error::{CoreError, CoreResult};
use crate::stats::{Resource, Statistic, ValueSourceDescriptor};

use super::entity::Entity;
use super::events::{EventObserver, WorldEvent};
use super::ids::{ActionId, EffectId, EntityId, PropertyId, SubscriptionId};
use super::property::{Property, PropertyValue};

pub struct World {
    config: EngineConfig,
    pub(crate) entities: Arena<Entity>,
    pub(crate) properties: Arena<Property>,
    pub(crate) effects: Arena<Effect>,
    pub(crate) actions: Arena<Action>,
    events: Vec<WorldEvent>,
    observers: Arena<Box<dyn EventObserver>>,
    clock: f64,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            entities: Arena::new(),
            properties: Arena::new(),
            effects: Arena::new(),
            actions: Arena::new(),
            events: Vec::new(),
            observers: Arena::new(),
            clock: 0.0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Milliseconds accumulated by [`World::update`].
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub(crate) fn advance_clock(&mut self, elapsed: f64) -> f64 {
        self.clock += elapsed;
        self.clock
    }

    // ========================================================================
    // Entities
    // ========================================================================

    pub fn spawn_entity(&mut self, key: impl Into<String>) -> EntityId {
        self.spawn(Entity::new(key))
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.insert(entity));
        tracing::trace!(entity = %id, "spawned entity");
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains(id.0)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().map(|(index, _)| EntityId(index))
    }

    /// First entity whose key matches.
    pub fn find_entity(&self, key: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, entity)| entity.key() == key)
            .map(|(index, _)| EntityId(index))
    }

    pub(crate) fn entity_ref(&self, id: EntityId) -> CoreResult<&Entity> {
        self.entities.get(id.0).ok_or(CoreError::MissingEntity(id))
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> CoreResult<&mut Entity> {
        self.entities.get_mut(id.0).ok_or(CoreError::MissingEntity(id))
    }

    /// Removes an entity after detaching everything it holds: persistent
    /// effects are unapplied, properties unbound, abilities released and the
    /// entity is unequipped from any wearer. Properties, effects and actions
    /// themselves stay in the arena.
    pub fn despawn_entity(&mut self, id: EntityId) -> CoreResult<()> {
        let entity = self.entity_ref(id)?;
        let held: Vec<EffectId> = entity
            .effects
            .main
            .iter()
            .chain(&entity.effects.inactive_unique)
            .copied()
            .collect();
        let accessories = entity.accessories.clone();
        let abilities = entity.abilities.clone();
        let properties = entity.properties.clone();

        let wearers: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, other)| other.accessories.contains(&id))
            .map(|(index, _)| EntityId(index))
            .collect();
        for wearer in wearers {
            self.remove_accessory(wearer, id)?;
        }
        for accessory in accessories {
            self.remove_accessory(id, accessory)?;
        }
        for effect in held {
            self.remove_persistent_effect(id, effect)?;
        }
        for ability in abilities {
            self.remove_ability(id, ability)?;
        }
        for property in properties {
            self.remove_property_ref(id, property)?;
        }

        self.entities.remove(id.0);
        tracing::debug!(entity = %id, "despawned entity");
        Ok(())
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Stores an unbound property. Bind it with [`World::add_property`].
    pub fn create_property(&mut self, property: Property) -> PropertyId {
        PropertyId(self.properties.insert(property))
    }

    pub fn property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(id.0)
    }

    pub(crate) fn property_ref(&self, id: PropertyId) -> CoreResult<&Property> {
        self.properties.get(id.0).ok_or(CoreError::MissingProperty(id))
    }

    pub(crate) fn property_mut(&mut self, id: PropertyId) -> CoreResult<&mut Property> {
        self.properties
            .get_mut(id.0)
            .ok_or(CoreError::MissingProperty(id))
    }

    /// Handle of the entity's property with this name.
    pub fn entity_property(&self, entity: EntityId, name: &str) -> Option<PropertyId> {
        self.entity(entity)?.property(name)
    }

    pub fn find_property(&self, entity: EntityId, name: &str) -> Option<&Property> {
        self.property(self.entity_property(entity, name)?)
    }

    pub fn statistic(&self, entity: EntityId, name: &str) -> Option<&Statistic> {
        self.find_property(entity, name)?.as_statistic()
    }

    pub fn resource(&self, entity: EntityId, name: &str) -> Option<&Resource> {
        self.find_property(entity, name)?.as_resource()
    }

    /// Resource-typed properties of the entity, in insertion order.
    pub fn resources(&self, entity: EntityId) -> impl Iterator<Item = &Property> + '_ {
        self.entity(entity)
            .into_iter()
            .flat_map(|owner| owner.properties.iter())
            .filter_map(|id| self.property(*id))
            .filter(|property| property.as_resource().is_some())
    }

    /// Reads the described numeric property from `entity`.
    pub fn value_of(&self, entity: EntityId, source: &ValueSourceDescriptor) -> Option<f64> {
        self.find_property(entity, &source.property_name)?
            .value()
            .as_number()
    }

    /// Mutates a property payload in place, then recomputes action readiness.
    ///
    /// Bound modifiers stay applied; the closure should adjust base values,
    /// resource currents or flags, not modifier totals.
    pub fn update_property<R>(
        &mut self,
        id: PropertyId,
        f: impl FnOnce(&mut PropertyValue) -> R,
    ) -> CoreResult<R> {
        let result = f(self.property_mut(id)?.value_mut());
        self.settle();
        Ok(result)
    }

    // ========================================================================
    // Effects
    // ========================================================================

    pub fn create_effect(&mut self, effect: Effect) -> EffectId {
        EffectId(self.effects.insert(effect))
    }

    pub fn effect(&self, id: EffectId) -> Option<&Effect> {
        self.effects.get(id.0)
    }

    pub(crate) fn effect_ref(&self, id: EffectId) -> CoreResult<&Effect> {
        self.effects.get(id.0).ok_or(CoreError::MissingEffect(id))
    }

    pub(crate) fn effect_mut(&mut self, id: EffectId) -> CoreResult<&mut Effect> {
        self.effects.get_mut(id.0).ok_or(CoreError::MissingEffect(id))
    }

    /// Drops an effect that is not held by any entity.
    pub fn destroy_effect(&mut self, id: EffectId) -> CoreResult<Effect> {
        if self.effect_ref(id)?.holder().is_some() {
            return Err(crate::effect::EffectError::AlreadyPersisted.into());
        }
        self.effects.remove(id.0).ok_or(CoreError::MissingEffect(id))
    }

    // ========================================================================
    // Actions
    // ========================================================================

    pub fn create_action(&mut self, action: Action) -> ActionId {
        ActionId(self.actions.insert(action))
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0)
    }

    pub fn action_ids(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.actions.iter().map(|(index, _)| ActionId(index))
    }

    pub(crate) fn action_ref(&self, id: ActionId) -> CoreResult<&Action> {
        self.actions.get(id.0).ok_or(CoreError::MissingAction(id))
    }

    pub(crate) fn action_mut(&mut self, id: ActionId) -> CoreResult<&mut Action> {
        self.actions.get_mut(id.0).ok_or(CoreError::MissingAction(id))
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn subscribe(&mut self, observer: impl EventObserver + 'static) -> SubscriptionId {
        SubscriptionId(self.observers.insert(Box::new(observer)))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id.0).is_some()
    }

    /// Events emitted since the last drain, oldest first.
    pub fn pending_events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: WorldEvent) {
        tracing::trace!(?event, "world event");
        for (_, observer) in self.observers.iter_mut() {
            observer.on_event(&event);
        }
        self.events.push(event);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for World {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("entities", &self.entities.len())
            .field("properties", &self.properties.len())
            .field("effects", &self.effects.len())
            .field("actions", &self.actions.len())
            .field("pending_events", &self.events.len())
            .field("clock", &self.clock)
            .finish()
    }
}
