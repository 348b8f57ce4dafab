//! Benchmark floor plans for the scentwalk simulation.
//!
//! - [`reference_plan`]: 100x80 store, rows of shelving, three anchors
//! - [`stress_plan`]: 400x300 store with the same layout repeated
//! - [`shelf_rows`]: deterministic shelving layout used by both

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use scentwalk_engine::{Session, SessionConfig, SessionError};
use scentwalk_space::{AnchorPoint, Obstacle, WorldRect};

/// Everything needed to open a [`Session`] on a synthetic store.
#[derive(Clone, Debug)]
pub struct FloorPlan {
    /// Session parameters.
    pub config: SessionConfig,
    /// Walls and shelving.
    pub obstacles: Vec<Obstacle>,
    /// Entrance, attraction and exit, in that order.
    pub anchors: Vec<AnchorPoint>,
}

impl FloorPlan {
    /// Build the grid and register every anchor.
    pub fn session(&self) -> Result<Session, SessionError> {
        let mut session = Session::new(self.config.clone(), &self.obstacles)?;
        for anchor in &self.anchors {
            session.add_anchor(anchor.clone())?;
        }
        Ok(session)
    }
}

/// Horizontal shelving rows across a `width x height` store.
///
/// Rows are 2 units deep every 10 units, starting at y = 10, and leave an
/// aisle of 6 units at alternating ends so the free space stays connected.
pub fn shelf_rows(width: f64, height: f64) -> Vec<Obstacle> {
    let mut obstacles = Vec::new();
    let mut y = 10.0;
    let mut row = 0;
    while y + 2.0 < height - 8.0 {
        let x = if row % 2 == 0 { 0.0 } else { 6.0 };
        obstacles.push(Obstacle::from_rect(x, y, width - 6.0, 2.0).with_id(format!("shelf_{row}")));
        y += 10.0;
        row += 1;
    }
    obstacles
}

fn plan(width: f64, height: f64) -> FloorPlan {
    FloorPlan {
        config: SessionConfig {
            world: WorldRect::from_size(width, height),
            ..Default::default()
        },
        obstacles: shelf_rows(width, height),
        anchors: vec![
            AnchorPoint::new("entrance_1", 2.5, 2.5).with_radius(1.5),
            AnchorPoint::new("attraction_1", width * 0.5 + 0.5, 5.5).with_radius(1.5),
            AnchorPoint::new("exit_1", width - 3.5, height - 3.5).with_radius(1.5),
        ],
    }
}

/// A 100x80 store with 1-unit cells.
pub fn reference_plan() -> FloorPlan {
    plan(100.0, 80.0)
}

/// A 400x300 store (120K cells).
pub fn stress_plan() -> FloorPlan {
    plan(400.0, 300.0)
}
