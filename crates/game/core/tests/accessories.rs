use rpg_core::{
    CoreError, Effect, EffectError, PropertyError, ValueSource, World, WorldEvent,
};

fn stat(world: &World, entity: rpg_core::EntityId, name: &str) -> f64 {
    world
        .statistic(entity, name)
        .expect("statistic should exist")
        .value()
}

/// Equipment cascade:
/// 1. A ring carries "+50 HP" and "-50% Intellect"
/// 2. Equipping persists both on the wearer
/// 3. Unequipping retracts both; re-equipping applies them again
#[test]
fn equipping_applies_and_unequipping_retracts() {
    let mut world = World::new();
    let hero = world.spawn_entity("hero");
    world.add_statistic(hero, "HP", 100.0).expect("HP added");
    world
        .add_statistic(hero, "Intellect", 100.0)
        .expect("Intellect added");

    let ring = world.spawn_entity("ring");
    let vigor = world.add_equip_effect(ring, "+50 HP").expect("HP effect");
    let dullness = world
        .add_equip_effect(ring, "-50% Intellect")
        .expect("Intellect effect");
    assert!(world.entity(ring).expect("ring exists").has_property("modHP"));

    assert!(world.add_accessory(hero, ring).expect("equip succeeds"));
    assert!(world.has_persistent_effect(hero, vigor));
    assert!(world.has_persistent_effect(hero, dullness));
    assert_eq!(stat(&world, hero, "HP"), 150.0);
    assert_eq!(stat(&world, hero, "Intellect"), 50.0);

    assert!(!world.add_accessory(hero, ring).expect("second equip is a no-op"));
    assert_eq!(stat(&world, hero, "HP"), 150.0);

    assert!(world.remove_accessory(hero, ring).expect("unequip succeeds"));
    assert!(!world.has_persistent_effect(hero, vigor));
    assert_eq!(stat(&world, hero, "HP"), 100.0);
    assert_eq!(stat(&world, hero, "Intellect"), 100.0);
    assert!(!world.remove_accessory(hero, ring).expect("second unequip is a no-op"));

    world.add_accessory(hero, ring).expect("re-equip succeeds");
    assert_eq!(stat(&world, hero, "HP"), 150.0);
    assert_eq!(stat(&world, hero, "Intellect"), 50.0);
}

#[test]
fn accessory_events_bracket_the_effects() {
    let mut world = World::new();
    let hero = world.spawn_entity("hero");
    world.add_statistic(hero, "HP", 100.0).expect("HP added");
    let ring = world.spawn_entity("ring");
    let vigor = world.add_equip_effect(ring, "+50 HP").expect("HP effect");
    world.drain_events();

    world.add_accessory(hero, ring).expect("equip succeeds");
    assert_eq!(
        world.drain_events(),
        vec![
            WorldEvent::EffectActivated {
                entity: hero,
                effect: vigor
            },
            WorldEvent::AccessoryAdded {
                entity: hero,
                accessory: ring
            },
        ]
    );
}

#[test]
fn entity_cannot_wear_itself() {
    let mut world = World::new();
    let hero = world.spawn_entity("hero");

    let err = world
        .add_accessory(hero, hero)
        .expect_err("self accessory must fail");
    assert_eq!(err, CoreError::SelfAccessory(hero));
}

#[test]
fn despawning_an_accessory_unequips_it() {
    let mut world = World::new();
    let hero = world.spawn_entity("hero");
    world.add_statistic(hero, "HP", 100.0).expect("HP added");
    let ring = world.spawn_entity("ring");
    world.add_equip_effect(ring, "+50 HP").expect("HP effect");
    world.add_accessory(hero, ring).expect("equip succeeds");

    world.despawn_entity(ring).expect("despawn succeeds");
    assert!(!world.contains_entity(ring));
    assert!(world.entity(hero).expect("hero exists").accessories().is_empty());
    assert_eq!(stat(&world, hero, "HP"), 100.0);
}

/// Unequipping retracts what equipping contributed:
/// 1. The ring's marker property is removed while the ring is worn
/// 2. The wearer keeps the effect until the ring comes off
/// 3. Unequipping still releases it
#[test]
fn unequip_releases_effects_whose_marker_was_removed() {
    let mut world = World::new();
    let hero = world.spawn_entity("hero");
    world.add_statistic(hero, "HP", 100.0).expect("HP added");
    let ring = world.spawn_entity("ring");
    let vigor = world.add_equip_effect(ring, "+50 HP").expect("HP effect");
    world.add_accessory(hero, ring).expect("equip succeeds");
    assert_eq!(
        world.entity(hero).expect("hero exists").contributed_by(ring),
        [vigor]
    );

    assert!(world.remove_property(ring, "modHP").expect("marker removed"));
    assert_eq!(stat(&world, hero, "HP"), 150.0);

    assert!(world.remove_accessory(hero, ring).expect("unequip succeeds"));
    assert!(!world.has_persistent_effect(hero, vigor));
    assert_eq!(stat(&world, hero, "HP"), 100.0);
    assert!(world.entity(hero).expect("hero exists").contributed_by(ring).is_empty());
}

#[test]
fn worn_accessory_cannot_be_equipped_twice() {
    let mut world = World::new();
    let first = world.spawn_entity("first");
    let second = world.spawn_entity("second");
    for wearer in [first, second] {
        world.add_statistic(wearer, "HP", 100.0).expect("HP added");
    }
    let ring = world.spawn_entity("ring");
    world.add_equip_effect(ring, "+50 HP").expect("HP effect");
    world.add_accessory(first, ring).expect("first equip succeeds");

    let err = world
        .add_accessory(second, ring)
        .expect_err("ring is already worn");
    assert_eq!(err, CoreError::Effect(EffectError::HeldElsewhere));
    assert!(world.entity(second).expect("second exists").accessories().is_empty());
    assert_eq!(stat(&world, first, "HP"), 150.0);
    assert_eq!(stat(&world, second, "HP"), 100.0);
}

/// Failed equip leaves nothing behind:
/// 1. The ring carries "+50 HP" and "+5 Stunned"; the wearer's Stunned is a flag
/// 2. The second effect cannot apply, so equipping fails
/// 3. The first effect is released again and the ring is not listed
#[test]
fn failed_equip_rolls_back_applied_effects() {
    let mut world = World::new();
    let hero = world.spawn_entity("hero");
    world.add_statistic(hero, "HP", 100.0).expect("HP added");
    world.add_flag(hero, "Stunned", false).expect("flag added");
    let ring = world.spawn_entity("ring");
    let vigor = world.add_equip_effect(ring, "+50 HP").expect("HP effect");
    world.add_equip_effect(ring, "+5 Stunned").expect("Stunned effect");

    let err = world.add_accessory(hero, ring).expect_err("flag cannot be modified");
    assert!(matches!(
        err,
        CoreError::Property(PropertyError::PayloadMismatch { .. })
    ));
    assert!(!world.has_persistent_effect(hero, vigor));
    assert_eq!(stat(&world, hero, "HP"), 100.0);
    assert!(world.entity(hero).expect("hero exists").accessories().is_empty());
    assert_eq!(world.effect(vigor).expect("effect exists").holder(), None);
}

/// Timed equip effects expire on every wearing:
/// 1. A 100 ms "+50 HP" charm expires while worn
/// 2. Taking it off and on again restarts the timer
#[test]
fn timed_equip_effect_expires_again_after_reequip() {
    let mut world = World::new();
    let hero = world.spawn_entity("hero");
    world.add_statistic(hero, "HP", 100.0).expect("HP added");
    let charm = world.spawn_entity("charm");
    let surge = world
        .add_equip_effect_from(charm, Effect::add("HP", 50.0).with_duration(100.0))
        .expect("HP effect");

    world.add_accessory(hero, charm).expect("equip succeeds");
    assert_eq!(stat(&world, hero, "HP"), 150.0);
    world.update(100.0).expect("tick");
    assert_eq!(stat(&world, hero, "HP"), 100.0);

    world.remove_accessory(hero, charm).expect("unequip succeeds");
    world.add_accessory(hero, charm).expect("re-equip succeeds");
    assert_eq!(stat(&world, hero, "HP"), 150.0);
    assert_eq!(
        world.effect(surge).and_then(Effect::duration).map(|timer| timer.elapsed()),
        Some(0.0)
    );

    world.update(100.0).expect("tick");
    assert_eq!(stat(&world, hero, "HP"), 100.0);
    assert!(!world.has_persistent_effect(hero, surge));
}
