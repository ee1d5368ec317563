use evosim_data::{CreatureId, CreatureKind, PlantId};
use evosim_lib::model::spatial_hash::{EntityKind, GridEntity, SpatialHash};
use proptest::prelude::*;

fn plant(id: u64, x: f64, y: f64) -> GridEntity {
    GridEntity::Plant {
        id: PlantId(id),
        x,
        y,
    }
}

#[test]
fn test_local_cell_scenario() {
    let mut grid = SpatialHash::new(50.0, 100.0, 100.0);
    grid.insert(plant(0, 10.0, 10.0));

    let hits = grid.query_local_cell(10.0, 10.0, EntityKind::Plant);
    assert_eq!(hits, &[plant(0, 10.0, 10.0)]);
    assert!(grid.query_local_cell(60.0, 60.0, EntityKind::Plant).is_empty());
}

#[test]
fn test_neighborhood_wraps_around_corners() {
    let mut grid = SpatialHash::new(100.0, 1000.0, 1000.0);
    grid.insert(plant(1, 990.0, 990.0));
    grid.insert(plant(2, 500.0, 500.0));

    let hits = grid.query_neighborhood(5.0, 5.0, EntityKind::Plant);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0], plant(1, 990.0, 990.0));
}

#[test]
fn test_kinds_are_bucketed_separately() {
    let mut grid = SpatialHash::new(100.0, 500.0, 500.0);
    grid.insert(plant(0, 50.0, 50.0));
    grid.insert(GridEntity::Agent {
        index: 0,
        id: CreatureId(7),
        x: 50.0,
        y: 50.0,
        kind: CreatureKind::Carnivore,
    });

    assert_eq!(grid.query_local_cell(50.0, 50.0, EntityKind::Plant).len(), 1);
    assert_eq!(grid.query_local_cell(50.0, 50.0, EntityKind::Carnivore).len(), 1);
    assert!(grid.query_local_cell(50.0, 50.0, EntityKind::Herbivore).is_empty());
}

#[test]
fn test_tiny_grid_visits_each_cell_once() {
    // Two columns and one row: the 3×3 block would otherwise repeat cells.
    let mut grid = SpatialHash::new(50.0, 100.0, 50.0);
    grid.insert(plant(0, 10.0, 10.0));
    grid.insert(plant(1, 60.0, 10.0));

    let hits = grid.query_neighborhood(10.0, 10.0, EntityKind::Plant);
    assert_eq!(hits.len(), 2);
}

#[test]
fn test_non_finite_positions_are_ignored() {
    let mut grid = SpatialHash::new(50.0, 100.0, 100.0);
    assert!(!grid.insert(plant(0, f64::NAN, 10.0)));
    assert!(!grid.insert(plant(1, 10.0, f64::INFINITY)));
    assert!(grid.is_empty());
    assert!(grid
        .query_neighborhood(f64::NAN, 0.0, EntityKind::Plant)
        .is_empty());
}

#[test]
fn test_clear_empties_every_bucket() {
    let mut grid = SpatialHash::new(50.0, 200.0, 200.0);
    for i in 0..20 {
        grid.insert(plant(i, i as f64 * 9.0, i as f64 * 7.0));
    }
    assert_eq!(grid.len(), 20);
    grid.clear();
    assert!(grid.is_empty());
    assert!(grid.query_neighborhood(100.0, 100.0, EntityKind::Plant).is_empty());
}

proptest! {
    #[test]
    fn out_of_range_points_wrap_into_the_grid(
        x in -5000.0f64..5000.0,
        y in -5000.0f64..5000.0
    ) {
        let grid = SpatialHash::new(150.0, 1200.0, 800.0);
        let (col, row) = grid.cell_coords(x, y).expect("finite point has a cell");
        prop_assert!(col < grid.cols);
        prop_assert!(row < grid.rows);
    }

    #[test]
    fn inserted_point_is_in_its_own_neighborhood(
        x in 0.0f64..1200.0,
        y in 0.0f64..800.0
    ) {
        let mut grid = SpatialHash::new(150.0, 1200.0, 800.0);
        grid.insert(plant(0, x, y));
        prop_assert_eq!(grid.query_local_cell(x, y, EntityKind::Plant).len(), 1);
        prop_assert_eq!(grid.query_neighborhood(x, y, EntityKind::Plant).len(), 1);
    }
}
