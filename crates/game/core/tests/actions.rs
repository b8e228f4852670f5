use std::cell::RefCell;
use std::rc::Rc;

use rpg_core::{
    Action, ActionEffect, ActionError, ActionExecutorMap, ActionState, ActionTarget, CastOutcome,
    CoreError, DefaultActionExecutor, EffectCategory, EffectProcessorMap, EffectSpec, EntityId,
    Formula, InstantEffectProcessor, PersistentEffectProcessor, PropertyValue, Requirement,
    ValueSource, World, WorldEvent,
};

type SharedLog = Rc<RefCell<Vec<String>>>;

/// Routes engine logs to the test harness; `RUST_LOG=debug` shows them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn processors(log: &SharedLog) -> EffectProcessorMap {
    EffectProcessorMap::new()
        .with_mapping(EffectCategory::Damage, InstantEffectProcessor::new(log.clone()))
        .and_then(|map| map.with_mapping(EffectCategory::Buff, PersistentEffectProcessor::new(log.clone())))
        .and_then(|map| map.with_mapping(EffectCategory::Debuff, PersistentEffectProcessor::new(log.clone())))
        .expect("categories are distinct")
}

fn executors(log: &SharedLog, names: &[&str]) -> ActionExecutorMap {
    let mut map = ActionExecutorMap::new();
    for name in names {
        map.add_mapping(*name, DefaultActionExecutor::new(processors(log)))
            .expect("names are distinct");
    }
    map
}

fn effect(name: &str, category: EffectCategory, shorthand: &str) -> ActionEffect {
    ActionEffect::new(
        name,
        category,
        EffectSpec::shorthand(shorthand).expect("shorthand parses"),
    )
}

fn stat(world: &World, entity: EntityId, name: &str) -> f64 {
    world
        .statistic(entity, name)
        .expect("statistic should exist")
        .value()
}

fn mana(world: &World, entity: EntityId) -> f64 {
    world.resource(entity, "Mana").expect("Mana exists").current()
}

fn set_mana(world: &mut World, entity: EntityId, current: f64) {
    let mana = world.entity_property(entity, "Mana").expect("Mana exists");
    world
        .update_property(mana, |value| {
            if let PropertyValue::Resource(resource) = value {
                resource.set_current(current);
            }
        })
        .expect("update succeeds");
}

// ============================================================================
// Gating
// ============================================================================

/// Resource gate:
/// 1. Fireball costs 50 Mana; the mage has 10 → failure, nothing consumed
/// 2. Mana raised to 60 → success, 50 consumed, damage dealt and logged
#[test]
fn resource_requirement_gates_and_consumes() {
    init_tracing();
    let log = SharedLog::default();
    let mut world = World::new();
    let mage = world.spawn_entity("mage");
    world.add_resource(mage, "Mana", 10.0, 100.0).expect("Mana added");
    let goblin = world.spawn_entity("goblin");
    world.add_statistic(goblin, "HP", 100.0).expect("HP added");

    let fireball = world
        .grant_ability(
            mage,
            Action::new("Fireball")
                .with_requirement(Requirement::resource("Mana", 50.0))
                .with_end_effect(
                    effect("burn", EffectCategory::Damage, "-12 HP").with_display_name("Burn"),
                ),
        )
        .expect("ability granted");
    assert_eq!(
        world.action(fireball).expect("action").state(),
        ActionState::OnCooldown
    );

    let mut map = executors(&log, &["Fireball"]);
    let target = ActionTarget::Entity(goblin);

    let result = map
        .execute(&mut world, fireball, mage, &target)
        .expect("execution is configured");
    assert!(!result.is_success());
    assert_eq!(
        result.message(),
        Some("Cannot execute Fireball, Needs at least 50 Mana")
    );
    assert_eq!(mana(&world, mage), 10.0);
    assert_eq!(stat(&world, goblin, "HP"), 100.0);

    set_mana(&mut world, mage, 60.0);
    assert_eq!(world.action(fireball).expect("action").state(), ActionState::Ready);

    let result = map
        .execute(&mut world, fireball, mage, &target)
        .expect("execution is configured");
    assert!(result.is_success());
    assert_eq!(mana(&world, mage), 10.0);
    assert_eq!(stat(&world, goblin, "HP"), 88.0);
    assert_eq!(
        log.borrow().as_slice(),
        ["mage's Fireball applies Burn to goblin (-12)"]
    );
    assert_eq!(
        world.action(fireball).expect("action").state(),
        ActionState::OnCooldown
    );
}

#[test]
fn minimum_resource_never_consumes() {
    let log = SharedLog::default();
    let mut world = World::new();
    let warrior = world.spawn_entity("warrior");
    world.add_resource(warrior, "Rage", 30.0, 100.0).expect("Rage added");
    world.add_statistic(warrior, "Strength", 10.0).expect("Strength added");

    let frenzy = world
        .grant_ability(
            warrior,
            Action::new("Frenzy")
                .with_requirement(Requirement::minimum_resource("Rage", 25.0))
                .with_begin_effect(effect("fury", EffectCategory::Buff, "+5 Strength")),
        )
        .expect("ability granted");

    let mut map = executors(&log, &["Frenzy"]);
    let result = map
        .execute(&mut world, frenzy, warrior, &ActionTarget::Actor)
        .expect("execution is configured");
    assert!(result.is_success());
    assert_eq!(
        world.resource(warrior, "Rage").expect("Rage").current(),
        30.0
    );
    assert_eq!(stat(&world, warrior, "Strength"), 15.0);
}

#[test]
fn property_state_requirement_tracks_the_flag() {
    let log = SharedLog::default();
    let mut world = World::new();
    let rogue = world.spawn_entity("rogue");
    let hidden = world.add_flag(rogue, "Stealthed", false).expect("flag added");
    let mark = world.spawn_entity("mark");
    world.add_statistic(mark, "HP", 50.0).expect("HP added");

    let backstab = world
        .grant_ability(
            rogue,
            Action::new("Backstab")
                .with_requirement(Requirement::property_state(
                    "Stealthed",
                    PropertyValue::Flag(true),
                ))
                .with_end_effect(effect("stab", EffectCategory::Damage, "-30 HP")),
        )
        .expect("ability granted");
    let mut map = executors(&log, &["Backstab"]);
    let target = ActionTarget::Entity(mark);

    let result = map
        .execute(&mut world, backstab, rogue, &target)
        .expect("execution is configured");
    assert_eq!(
        result.message(),
        Some("Cannot execute Backstab, Requires Stealthed to be true")
    );

    world
        .update_property(hidden, |value| *value = PropertyValue::Flag(true))
        .expect("flag set");
    assert_eq!(world.action(backstab).expect("action").state(), ActionState::Ready);

    let result = map
        .execute(&mut world, backstab, rogue, &target)
        .expect("execution is configured");
    assert!(result.is_success());
    assert_eq!(stat(&world, mark, "HP"), 20.0);
}

#[test]
fn removing_the_resource_unbinds_the_requirement() {
    let mut world = World::new();
    let mage = world.spawn_entity("mage");
    world.add_resource(mage, "Mana", 100.0, 100.0).expect("Mana added");
    let fireball = world
        .grant_ability(
            mage,
            Action::new("Fireball").with_requirement(Requirement::resource("Mana", 50.0)),
        )
        .expect("ability granted");
    assert_eq!(world.action(fireball).expect("action").state(), ActionState::Ready);

    world.remove_property(mage, "Mana").expect("Mana removed");
    let action = world.action(fireball).expect("action");
    assert_eq!(action.state(), ActionState::OnCooldown);
    assert!(action.requirements()[1].bound_property().is_none());

    world
        .add_resource(mage, "Mana", 100.0, 100.0)
        .expect("Mana re-added");
    assert_eq!(world.action(fireball).expect("action").state(), ActionState::Ready);
}

// ============================================================================
// Cooldown
// ============================================================================

#[test]
fn cooldown_blocks_until_elapsed() {
    let log = SharedLog::default();
    let mut world = World::new();
    let hero = world.spawn_entity("hero");
    world.add_statistic(hero, "Strength", 10.0).expect("Strength added");

    let rally = world
        .grant_ability(
            hero,
            Action::new("Rally")
                .with_cooldown(1000.0)
                .expect("cooldown is valid")
                .with_begin_effect(effect("rally", EffectCategory::Buff, "+5 Strength")),
        )
        .expect("ability granted");
    let mut map = executors(&log, &["Rally"]);

    let first = map
        .execute(&mut world, rally, hero, &ActionTarget::Actor)
        .expect("execution is configured");
    assert!(first.is_success());
    assert_eq!(world.action(rally).expect("action").state(), ActionState::OnCooldown);

    let second = map
        .execute(&mut world, rally, hero, &ActionTarget::Actor)
        .expect("execution is configured");
    assert_eq!(
        second.message(),
        Some("Cannot execute Rally, Action is on cooldown")
    );

    world.update(999.0).expect("tick");
    assert_eq!(world.action(rally).expect("action").state(), ActionState::OnCooldown);
    world.update(1.0).expect("tick");
    assert_eq!(world.action(rally).expect("action").state(), ActionState::Ready);

    let third = map
        .execute(&mut world, rally, hero, &ActionTarget::Actor)
        .expect("execution is configured");
    assert!(third.is_success());
    assert_eq!(stat(&world, hero, "Strength"), 20.0);
}

// ============================================================================
// Casting
// ============================================================================

fn blizzard(world: &mut World, caster: EntityId) -> rpg_core::ActionId {
    world
        .grant_ability(
            caster,
            Action::new("Blizzard")
                .with_cast_time(2000.0)
                .with_period_time(1000.0)
                .with_begin_effect(effect("chill", EffectCategory::Debuff, "-2 Agility"))
                .with_periodic_effect(effect("shard", EffectCategory::Damage, "-5 HP"))
                .with_end_effect(effect("storm", EffectCategory::Damage, "-20 HP")),
        )
        .expect("ability granted")
}

fn victim(world: &mut World) -> EntityId {
    let victim = world.spawn_entity("yeti");
    world.add_statistic(victim, "HP", 100.0).expect("HP added");
    world.add_statistic(victim, "Agility", 10.0).expect("Agility added");
    victim
}

/// Channelled action:
/// 1. Begin effects apply immediately and the cast starts
/// 2. Each elapsed period applies the periodic effects
/// 3. Completion applies the end effects and the action becomes ready again
#[test]
fn cast_runs_periodic_and_end_effects() {
    init_tracing();
    let log = SharedLog::default();
    let mut world = World::new();
    let mage = world.spawn_entity("mage");
    let yeti = victim(&mut world);
    let storm = blizzard(&mut world, mage);
    let mut map = executors(&log, &["Blizzard"]);
    let target = ActionTarget::Entity(yeti);

    let result = map
        .execute(&mut world, storm, mage, &target)
        .expect("execution is configured");
    assert!(result.is_success());
    assert_eq!(world.action(storm).expect("action").state(), ActionState::Casting);
    assert_eq!(stat(&world, yeti, "Agility"), 8.0);
    assert_eq!(stat(&world, yeti, "HP"), 100.0);

    let busy = map
        .execute(&mut world, storm, mage, &target)
        .expect("execution is configured");
    assert_eq!(
        busy.message(),
        Some("Cannot execute Blizzard, it is already in progress")
    );

    world.update(1000.0).expect("tick");
    let events = world.drain_events();
    map.handle_events(&mut world, &events).expect("events handled");
    assert_eq!(stat(&world, yeti, "HP"), 95.0);

    world.update(1000.0).expect("tick");
    let events = world.drain_events();
    map.handle_events(&mut world, &events).expect("events handled");
    assert_eq!(stat(&world, yeti, "HP"), 70.0);
    assert_eq!(world.action(storm).expect("action").state(), ActionState::Ready);
    assert_eq!(log.borrow().len(), 4);
}

#[test]
fn interrupted_cast_skips_end_effects() {
    init_tracing();
    let log = SharedLog::default();
    let mut world = World::new();
    let mage = world.spawn_entity("mage");
    let yeti = victim(&mut world);
    let storm = blizzard(&mut world, mage);
    let mut map = executors(&log, &["Blizzard"]);

    map.execute(&mut world, storm, mage, &ActionTarget::Entity(yeti))
        .expect("execution is configured");
    let outcome = world.cancel_cast(storm, true).expect("cancel succeeds");
    assert_eq!(outcome, Some(CastOutcome::Interrupted));
    assert_eq!(world.action(storm).expect("action").state(), ActionState::Ready);

    let events = world.drain_events();
    map.handle_events(&mut world, &events).expect("events handled");
    world.update(5000.0).expect("tick");
    let events = world.drain_events();
    map.handle_events(&mut world, &events).expect("events handled");
    assert_eq!(stat(&world, yeti, "HP"), 100.0);
}

/// Targeted cast:
/// 1. The host enters targeting, which the executor does not veto
/// 2. Executing from targeting starts the cast
/// 3. Completion runs the end effects and leaves targeting behind for good
#[test]
fn targeting_then_cast_completes() {
    let log = SharedLog::default();
    let mut world = World::new();
    let mage = world.spawn_entity("mage");
    let yeti = victim(&mut world);
    let storm = blizzard(&mut world, mage);
    let mut map = executors(&log, &["Blizzard"]);

    assert!(world.begin_targeting(storm).expect("targeting starts"));
    assert_eq!(world.action(storm).expect("action").state(), ActionState::Targeting);

    let result = map
        .execute(&mut world, storm, mage, &ActionTarget::Entity(yeti))
        .expect("execution is configured");
    assert!(result.is_success());
    assert_eq!(world.action(storm).expect("action").state(), ActionState::Casting);

    world.update(2000.0).expect("tick");
    let events = world.drain_events();
    assert!(events.contains(&WorldEvent::CastFinished {
        action: storm,
        outcome: CastOutcome::Completed
    }));
    map.handle_events(&mut world, &events).expect("events handled");
    assert_eq!(stat(&world, yeti, "HP"), 70.0);
    assert_eq!(world.action(storm).expect("action").state(), ActionState::Ready);
}

#[test]
fn instant_action_from_targeting_ends_targeting() {
    let log = SharedLog::default();
    let mut world = World::new();
    let hero = world.spawn_entity("hero");
    world.add_statistic(hero, "Strength", 10.0).expect("Strength added");
    let shout = world
        .grant_ability(
            hero,
            Action::new("Shout").with_end_effect(effect("rally", EffectCategory::Buff, "+5 Strength")),
        )
        .expect("ability granted");
    let mut map = executors(&log, &["Shout"]);

    world.begin_targeting(shout).expect("targeting starts");
    let result = map
        .execute(&mut world, shout, hero, &ActionTarget::Actor)
        .expect("execution is configured");
    assert!(result.is_success());
    assert_eq!(stat(&world, hero, "Strength"), 15.0);
    assert_eq!(world.action(shout).expect("action").state(), ActionState::Ready);
}

#[test]
fn action_damage_scales_with_caster_intellect() {
    let log = SharedLog::default();
    let mut world = World::new();
    let mage = world.spawn_entity("mage");
    world.add_statistic(mage, "Intellect", 40.0).expect("Intellect added");
    let goblin = world.spawn_entity("goblin");
    world.add_statistic(goblin, "HP", 100.0).expect("HP added");

    let scorch = ActionEffect::new(
        "scorch",
        EffectCategory::Damage,
        EffectSpec::calculated(
            "HP",
            Formula::Negate(Box::new(Formula::source("Intellect", 75.0))),
        ),
    )
    .with_display_name("Scorch");
    let fireball = world
        .grant_ability(mage, Action::new("Fireball").with_end_effect(scorch))
        .expect("ability granted");
    let mut map = executors(&log, &["Fireball"]);

    let result = map
        .execute(&mut world, fireball, mage, &ActionTarget::Entity(goblin))
        .expect("execution is configured");
    assert!(result.is_success());
    assert_eq!(stat(&world, goblin, "HP"), 70.0);
    assert_eq!(
        log.borrow().as_slice(),
        ["mage's Fireball applies Scorch to goblin (-30)"]
    );
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn unmapped_action_is_a_fatal_error() {
    let mut world = World::new();
    let hero = world.spawn_entity("hero");
    let slash = world
        .grant_ability(hero, Action::new("Slash"))
        .expect("ability granted");

    let err = ActionExecutorMap::new()
        .execute(&mut world, slash, hero, &ActionTarget::Actor)
        .expect_err("no executor mapped");
    assert_eq!(
        err,
        CoreError::Action(ActionError::UnmappedAction("Slash".into()))
    );
}

#[test]
fn unmapped_effect_category_is_a_fatal_error() {
    let mut world = World::new();
    let hero = world.spawn_entity("hero");
    world.add_statistic(hero, "HP", 10.0).expect("HP added");
    let mend = world
        .grant_ability(
            hero,
            Action::new("Mend").with_end_effect(effect("mend", EffectCategory::Healing, "+5 HP")),
        )
        .expect("ability granted");

    let mut map = ActionExecutorMap::new();
    map.add_mapping("Mend", DefaultActionExecutor::new(EffectProcessorMap::new()))
        .expect("first mapping");
    let err = map
        .execute(&mut world, mend, hero, &ActionTarget::Actor)
        .expect_err("no processor for healing");
    assert_eq!(
        err,
        CoreError::Action(ActionError::UnmappedEffect(EffectCategory::Healing))
    );

    let duplicate = map
        .add_mapping("Mend", DefaultActionExecutor::new(EffectProcessorMap::new()))
        .expect_err("second mapping");
    assert_eq!(duplicate, ActionError::DuplicateMapping("Mend".into()));
}

#[test]
fn missing_target_fails_without_spending() {
    let log = SharedLog::default();
    let mut world = World::new();
    let mage = world.spawn_entity("mage");
    world.add_resource(mage, "Mana", 100.0, 100.0).expect("Mana added");
    let gone = world.spawn_entity("ghost");
    world.despawn_entity(gone).expect("despawn succeeds");

    let fireball = world
        .grant_ability(
            mage,
            Action::new("Fireball").with_requirement(Requirement::resource("Mana", 50.0)),
        )
        .expect("ability granted");
    let result = executors(&log, &["Fireball"])
        .execute(&mut world, fireball, mage, &ActionTarget::Entity(gone))
        .expect("execution is configured");
    assert_eq!(result.message(), Some("Target does not exist"));
    assert_eq!(mana(&world, mage), 100.0);
}
