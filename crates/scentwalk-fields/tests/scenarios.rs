//! End-to-end field construction on grids built from floor-plan geometry.

use scentwalk_core::{Cell, FieldError};
use scentwalk_fields::{
    DistanceAttraction, DistanceField, DistanceFieldConfig, PathAttraction, Pathfinder,
    SmoothingConfig, SniffingMap,
};
use scentwalk_space::{Grid, Obstacle, WorldRect};
use scentwalk_test_utils::{open_grid, wall_with_gap};

/// An 80x60 world at 2 units per cell (40x30 cells) with a wall across
/// y = 30..32 leaving a doorway at x = 30..34. `extra` obstacles are
/// marked in the same pass.
fn corridor_plan_with(extra: &[Obstacle]) -> Grid {
    let mut grid = Grid::build(WorldRect::from_size(80.0, 60.0), 2.0).unwrap();
    let mut obstacles = vec![
        Obstacle::from_rect(0.0, 30.0, 30.0, 2.0).with_id("wall_left"),
        Obstacle::from_rect(34.0, 30.0, 46.0, 2.0).with_id("wall_right"),
    ];
    obstacles.extend_from_slice(extra);
    grid.mark_occupied(&obstacles, (0.0, 0.0));
    grid
}

fn corridor_plan() -> Grid {
    corridor_plan_with(&[])
}

#[test]
fn open_grid_distance_ordering() {
    let g = open_grid(10, 10);
    let df = DistanceField::compute(&g, Cell::new(0, 0), &DistanceFieldConfig::default()).unwrap();
    assert!(df.field().get(Cell::new(9, 9)).unwrap() < df.field().get(Cell::new(1, 1)).unwrap());
}

#[test]
fn path_goes_through_the_gap_and_fails_without_it() {
    let open = wall_with_gap(12, 9, 4, Some(9));
    let path = Pathfinder::default()
        .find_path(&open, Cell::new(1, 1), Cell::new(2, 7))
        .unwrap();
    let crossing: Vec<_> = path.cells().iter().filter(|c| c.y == 4).collect();
    assert_eq!(crossing, vec![&Cell::new(9, 4)]);

    let closed = wall_with_gap(12, 9, 4, None);
    let err = Pathfinder::default()
        .find_path(&closed, Cell::new(1, 1), Cell::new(2, 7))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn floor_plan_doorway_is_used() {
    let g = corridor_plan();
    assert_eq!(g.dims(), (40, 30));
    assert!(g.is_occupied(Cell::new(5, 15)));
    assert!(g.is_free(Cell::new(15, 15)));
    assert!(g.is_free(Cell::new(16, 15)));
    assert!(g.is_occupied(Cell::new(17, 15)));

    let path = Pathfinder::default()
        .find_path(&g, Cell::new(3, 3), Cell::new(3, 27))
        .unwrap();
    assert!(path.cells().iter().all(|&c| g.is_free(c)));
    assert!(path
        .cells()
        .iter()
        .any(|c| c.y == 15 && (c.x == 15 || c.x == 16)));
}

#[test]
fn both_strategies_attract_toward_their_targets() {
    let g = corridor_plan();
    let smoother = SmoothingConfig::default().smoother_for(&g).unwrap();

    let goal = Cell::new(35, 25);
    let path = Pathfinder::default()
        .find_path(&g, Cell::new(3, 3), goal)
        .unwrap();
    let by_path = SniffingMap::build(&g, &PathAttraction::new(path), &smoother).unwrap();
    let by_distance = SniffingMap::build(&g, &DistanceAttraction::new(goal), &smoother).unwrap();

    for map in [&by_path, &by_distance] {
        assert_eq!(map.target(), goal);
        let at_goal = map.value_at(goal).unwrap();
        let far = map.value_at(Cell::new(3, 3)).unwrap();
        assert!(at_goal > far, "{}: {at_goal} <= {far}", map.kind());
    }
}

#[test]
fn sealed_doorway_leaves_far_side_unreached() {
    let g = corridor_plan_with(&[Obstacle::from_rect(30.0, 30.0, 4.0, 2.0).with_id("door")]);
    assert!(g.is_occupied(Cell::new(15, 15)));
    assert!(g.is_occupied(Cell::new(16, 15)));
    let df = DistanceField::compute(&g, Cell::new(3, 3), &DistanceFieldConfig::default()).unwrap();
    assert!(df.is_reached(Cell::new(20, 10)));
    assert!(!df.is_reached(Cell::new(20, 20)));
    assert!(matches!(
        DistanceField::compute(&g, Cell::new(5, 15), &DistanceFieldConfig::default()),
        Err(FieldError::SourceBlocked { .. })
    ));
}
