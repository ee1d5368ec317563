/// Asserts that a creature with the given id is still in the world and alive.
#[macro_export]
macro_rules! assert_creature_alive {
    ($world:expr, $id:expr) => {
        let creature = $world
            .creature($id)
            .unwrap_or_else(|| panic!("Creature {:?} not found in world", $id));
        assert!(creature.alive, "Creature {:?} should be alive", $id);
    };
}

/// Asserts that a creature with the given id has been removed.
#[macro_export]
macro_rules! assert_creature_gone {
    ($world:expr, $id:expr) => {
        assert!(
            $world.creature($id).is_none(),
            "Creature {:?} should be gone but was found",
            $id
        );
    };
}

/// Asserts the number of living creatures.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!($world.living_count(), $count, "Population count mismatch");
    };
}
