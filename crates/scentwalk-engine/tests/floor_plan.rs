//! Full pipeline runs: obstacles to grid, anchors to maps, maps to walks.

use std::sync::Arc;

use scentwalk_core::{Cell, FieldError, FieldKey, WalkerId};
use scentwalk_engine::{Session, SessionConfig, SessionError, WalkState, Walker, WalkerConfig};
use scentwalk_fields::{AttractionKind, AttractionSource, Field};
use scentwalk_space::{Affine, AnchorPoint, Grid, Obstacle, WorldRect};

/// Peaks at the east edge of the grid.
struct EastWind;

impl AttractionSource for EastWind {
    fn kind(&self) -> AttractionKind {
        AttractionKind::Custom
    }
    fn target(&self) -> Cell {
        Cell::new(39, 10)
    }
    fn base_surface(&self, grid: &Grid) -> Result<Field, FieldError> {
        let mut values = Vec::with_capacity(grid.cell_count());
        for (cell, _) in grid.iter() {
            values.push(100.0 + f64::from(cell.x));
        }
        Field::from_values(grid.cols(), grid.rows(), values)
    }
}

fn store() -> Session {
    let config = SessionConfig {
        world: WorldRect::from_size(80.0, 50.0),
        worker_count: Some(3),
        ..Default::default()
    };
    let obstacles = [
        // Two shelving rows, the second drawn at half scale.
        Obstacle::from_rect(10.0, 15.0, 50.0, 3.0).with_id("shelf_a"),
        Obstacle::from_transformed_rect(40.0, 60.0, 100.0, 6.0, None, Some((0.5, 0.5)))
            .with_id("shelf_b"),
        // A display stand shifted by a matrix translation.
        Obstacle::from_transformed_rect(
            0.0,
            0.0,
            4.0,
            4.0,
            Some(Affine::matrix(1.0, 0.0, 0.0, 1.0, 65.0, 40.0)),
            None,
        )
        .with_id("stand"),
    ];
    let mut s = Session::new(config, &obstacles).unwrap();
    for (id, x, y) in [
        ("entrance_1", 2.5, 2.5),
        ("attraction_1", 70.5, 10.5),
        ("exit_1", 5.5, 45.5),
    ] {
        s.add_anchor(AnchorPoint::new(id, x, y).with_radius(1.0))
            .unwrap();
    }
    s
}

#[test]
fn obstacles_land_where_drawn() {
    let s = store();
    let g = s.grid();
    assert!(g.is_occupied(Cell::new(30, 16)));
    assert!(g.is_occupied(Cell::new(40, 31)));
    assert!(g.is_free(Cell::new(30, 28)));
    assert!(g.is_occupied(Cell::new(66, 41)));
    assert!(g.is_free(Cell::new(64, 41)));
}

#[test]
fn shopper_visits_attraction_then_leaves() {
    let mut s = store();
    let to_attraction = s.compute_anchor_path("entrance_1", "attraction_1").unwrap();
    let to_exit = s.compute_fragrance("exit_1").unwrap();
    // Greedy steps climb the path ridge, whose smoothed crest sits about
    // five cells short of the attraction.
    let config = WalkerConfig {
        predictability: 0.9,
        arrival_radius: 6.0,
        advance_probability: 1.0,
        seed: 5,
        ..Default::default()
    };
    let id = s
        .spawn_walker_at("entrance_1", &[to_attraction, to_exit], &config)
        .unwrap();
    s.run_walkers().unwrap();
    let out = s.outcome(id).unwrap();
    assert_eq!(out.state, WalkState::Done);
    assert_eq!(out.metrics.arrivals, 2);
    assert!(out.trajectory.iter().all(|&c| s.grid().is_free(c)));
    assert!(out
        .trajectory
        .windows(2)
        .all(|p| p[0].is_adjacent_8(p[1])));
    assert!(out
        .trajectory
        .iter()
        .any(|c| c.euclidean(Cell::new(70, 10)) < 6.0));
    let last = *out.trajectory.last().unwrap();
    assert!(last.euclidean(Cell::new(5, 45)) < 6.0);
}

#[test]
fn custom_map_drives_walker_east() {
    let mut s = store();
    let key = s.add_map(FieldKey::new("east"), &EastWind).unwrap();
    assert!(matches!(
        s.add_map(key.clone(), &EastWind),
        Err(SessionError::DuplicateKey { .. })
    ));
    let config = WalkerConfig {
        predictability: 1.0,
        ..Default::default()
    };
    let id = s.spawn_walker(Cell::new(2, 10), &[key], &config).unwrap();
    s.run_walkers().unwrap();
    let out = s.outcome(id).unwrap();
    assert_eq!(out.state, WalkState::Done);
    assert!(out.trajectory.iter().all(|c| c.y == 10));
}

#[test]
fn standalone_walker_matches_session_walker_zero() {
    let mut s = store();
    let key = s.compute_fragrance("exit_1").unwrap();
    let config = WalkerConfig {
        seed: 99,
        max_steps: 500,
        ..Default::default()
    };
    let start = s.anchor_cell("entrance_1").unwrap();
    let id = s.spawn_walker(start, &[key.clone()], &config).unwrap();
    assert_eq!(id, WalkerId(0));
    s.run_walkers().unwrap();

    let mut alone = Walker::new(
        WalkerId(0),
        Arc::clone(s.grid()),
        start,
        vec![Arc::clone(s.map(&key).unwrap())],
        config,
    )
    .unwrap();
    alone.run();
    assert_eq!(alone.trajectory(), s.outcome(id).unwrap().trajectory.as_slice());
}
