//! A simulation session: one grid plus keyed caches of anchors, paths,
//! sniffing maps and finished walks.
//!
//! Maps are built once per key and shared as `Arc<SniffingMap>` by every
//! walker that targets them. Walkers are queued with
//! [`spawn_walker`](Session::spawn_walker) and run as a batch on a pool of
//! scoped threads fed by a crossbeam channel. Each walker's seed is derived
//! from its [`WalkerId`], so results do not depend on the worker count or
//! on thread scheduling.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use log::{debug, info, trace, warn};

use scentwalk_core::{Cell, FieldKey, WalkerId};
use scentwalk_fields::{
    AttractionKind, AttractionSource, DistanceAttraction, GaussianSmoother, PathAttraction,
    PathResult, Pathfinder, SniffingMap,
};
use scentwalk_space::{AnchorPoint, Grid, Obstacle};

use crate::config::{SessionConfig, WalkerConfig};
use crate::error::SessionError;
use crate::walker::{WalkOutcome, Walker};

/// Seed for walker `id` in a batch seeded with `base`. Walker 0 keeps `base`.
pub fn walker_seed(base: u64, id: WalkerId) -> u64 {
    base ^ u64::from(id.0).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Key for a path requested without one: `p-{start}-{end}`.
pub fn default_path_key(start: Cell, end: Cell) -> FieldKey {
    FieldKey::new(format!("p-{start}-{end}"))
}

/// Owns a grid and everything computed on it.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    grid: Arc<Grid>,
    smoother: GaussianSmoother,
    pathfinder: Pathfinder,
    anchors: IndexMap<String, (AnchorPoint, Cell)>,
    paths: IndexMap<FieldKey, PathResult>,
    maps: IndexMap<FieldKey, Arc<SniffingMap>>,
    pending: Vec<Walker>,
    outcomes: IndexMap<WalkerId, WalkOutcome>,
    next_walker: u32,
}

impl Session {
    /// Build the grid for `config.world` and mark `obstacles` on it.
    pub fn new(config: SessionConfig, obstacles: &[Obstacle]) -> Result<Self, SessionError> {
        config.validate()?;
        let mut grid = Grid::build(config.world, config.cell_size)?;
        let marked = grid.mark_occupied(obstacles, config.translation);
        debug!(
            "[Session] grid {}x{} from {} obstacles, {marked} cells occupied",
            grid.cols(),
            grid.rows(),
            obstacles.len()
        );
        Self::with_grid(config, grid)
    }

    /// Use a prebuilt grid. `config.world` and `config.cell_size` are not
    /// consulted for its layout.
    pub fn with_grid(config: SessionConfig, grid: Grid) -> Result<Self, SessionError> {
        config.validate()?;
        let smoother = config.smoothing.smoother_for(&grid)?;
        Ok(Self {
            pathfinder: Pathfinder::new(config.connectivity),
            grid: Arc::new(grid),
            smoother,
            config,
            anchors: IndexMap::new(),
            paths: IndexMap::new(),
            maps: IndexMap::new(),
            pending: Vec::new(),
            outcomes: IndexMap::new(),
            next_walker: 0,
        })
    }

    /// The session's configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The shared occupancy grid.
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// The smoother applied to every map built by this session.
    pub fn smoother(&self) -> &GaussianSmoother {
        &self.smoother
    }

    // ── Anchors ─────────────────────────────────────────────────

    /// Register an anchor and return its cell.
    ///
    /// # Errors
    ///
    /// [`SessionError::DuplicateKey`] if the id is taken, or a grid
    /// `PointOutOfBounds` if the anchor lies outside the grid.
    pub fn add_anchor(&mut self, anchor: AnchorPoint) -> Result<Cell, SessionError> {
        if self.anchors.contains_key(&anchor.id) {
            return Err(SessionError::DuplicateKey { key: anchor.id });
        }
        let cell = self.grid.cell_of(anchor.location())?;
        if !self.grid.is_free(cell) {
            warn!("[Session] anchor '{}' sits on occupied cell {cell}", anchor.id);
        }
        self.anchors.insert(anchor.id.clone(), (anchor, cell));
        Ok(cell)
    }

    /// Anchors in insertion order.
    pub fn anchors(&self) -> impl Iterator<Item = &AnchorPoint> + '_ {
        self.anchors.values().map(|(a, _)| a)
    }

    /// The anchor with this id.
    pub fn anchor(&self, id: &str) -> Option<&AnchorPoint> {
        self.anchors.get(id).map(|(a, _)| a)
    }

    /// The grid cell of the anchor with this id.
    pub fn anchor_cell(&self, id: &str) -> Result<Cell, SessionError> {
        self.anchors
            .get(id)
            .map(|&(_, cell)| cell)
            .ok_or_else(|| SessionError::UnknownAnchor { id: id.to_string() })
    }

    // ── Maps ────────────────────────────────────────────────────

    /// Find a path and build its path-based map, cached under `key` (or
    /// [`default_path_key`]). Repeating a request returns the cached map
    /// without recomputation.
    ///
    /// # Errors
    ///
    /// [`SessionError::DuplicateKey`] if `key` already holds a map built
    /// for a different request.
    pub fn compute_path(
        &mut self,
        start: Cell,
        end: Cell,
        key: Option<FieldKey>,
    ) -> Result<FieldKey, SessionError> {
        let key = key.unwrap_or_else(|| default_path_key(start, end));
        if let Some(map) = self.maps.get(&key) {
            let same = map.kind() == AttractionKind::Path
                && map.target() == end
                && self.paths.get(&key).map(PathResult::start) == Some(start);
            if !same {
                return Err(SessionError::DuplicateKey {
                    key: key.to_string(),
                });
            }
            trace!("[Session] path '{key}' cached");
            return Ok(key);
        }
        let path = self.pathfinder.find_path(&self.grid, start, end)?;
        let map = SniffingMap::build(
            &self.grid,
            &PathAttraction::new(path.clone()),
            &self.smoother,
        )?;
        debug!(
            "[Session] path '{key}': {} cells, {} expanded",
            path.len(),
            path.expanded()
        );
        self.paths.insert(key.clone(), path);
        self.maps.insert(key.clone(), Arc::new(map));
        Ok(key)
    }

    /// Path-based map between two anchors, keyed `"{from}-{to}"`.
    pub fn compute_anchor_path(&mut self, from: &str, to: &str) -> Result<FieldKey, SessionError> {
        let start = self.anchor_cell(from)?;
        let end = self.anchor_cell(to)?;
        self.compute_path(start, end, Some(FieldKey::new(format!("{from}-{to}"))))
    }

    /// Path-based maps for every anchor pair `i < j` in insertion order.
    ///
    /// Pairs with no path (blocked or disconnected endpoints) are skipped
    /// with a warning; any other failure aborts the batch.
    pub fn compute_pairwise_paths(&mut self) -> Result<Vec<FieldKey>, SessionError> {
        let ids: Vec<String> = self.anchors.keys().cloned().collect();
        let mut keys = Vec::new();
        for (i, from) in ids.iter().enumerate() {
            for to in &ids[i + 1..] {
                match self.compute_anchor_path(from, to) {
                    Ok(key) => keys.push(key),
                    Err(SessionError::Path(e)) if e.is_not_found() => {
                        warn!("[Session] skipping path {from}-{to}: {e}");
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(keys)
    }

    /// Distance-based ("fragrance") map from an anchor, keyed by its id.
    pub fn compute_fragrance(&mut self, anchor_id: &str) -> Result<FieldKey, SessionError> {
        let cell = self.anchor_cell(anchor_id)?;
        self.compute_fragrance_at(cell, FieldKey::new(anchor_id))
    }

    /// Distance-based map from an arbitrary cell. Cached like
    /// [`compute_path`](Self::compute_path), with the same
    /// [`SessionError::DuplicateKey`] when `key` holds another request.
    pub fn compute_fragrance_at(
        &mut self,
        source: Cell,
        key: FieldKey,
    ) -> Result<FieldKey, SessionError> {
        if let Some(map) = self.maps.get(&key) {
            if map.kind() != AttractionKind::Distance || map.target() != source {
                return Err(SessionError::DuplicateKey {
                    key: key.to_string(),
                });
            }
            trace!("[Session] fragrance '{key}' cached");
            return Ok(key);
        }
        let strategy = DistanceAttraction::new(source).with_config(self.config.distance);
        let map = SniffingMap::build(&self.grid, &strategy, &self.smoother)?;
        self.maps.insert(key.clone(), Arc::new(map));
        Ok(key)
    }

    /// Build a map from a caller-supplied strategy.
    ///
    /// # Errors
    ///
    /// [`SessionError::DuplicateKey`] if `key` is already cached.
    pub fn add_map(
        &mut self,
        key: FieldKey,
        source: &dyn AttractionSource,
    ) -> Result<FieldKey, SessionError> {
        if self.maps.contains_key(&key) {
            return Err(SessionError::DuplicateKey {
                key: key.to_string(),
            });
        }
        let map = SniffingMap::build(&self.grid, source, &self.smoother)?;
        self.maps.insert(key.clone(), Arc::new(map));
        Ok(key)
    }

    /// The cached map under `key`.
    pub fn map(&self, key: &FieldKey) -> Result<&Arc<SniffingMap>, SessionError> {
        self.maps.get(key).ok_or_else(|| SessionError::UnknownField {
            key: key.to_string(),
        })
    }

    /// Cached map keys in insertion order.
    pub fn map_keys(&self) -> impl Iterator<Item = &FieldKey> + '_ {
        self.maps.keys()
    }

    /// The path a path-based map was built from.
    pub fn path(&self, key: &FieldKey) -> Option<&PathResult> {
        self.paths.get(key)
    }

    // ── Walkers ─────────────────────────────────────────────────

    /// Queue a walker at `start` heading for the maps under `targets`.
    ///
    /// The walker's seed is [`walker_seed`]`(config.seed, id)`.
    pub fn spawn_walker(
        &mut self,
        start: Cell,
        targets: &[FieldKey],
        config: &WalkerConfig,
    ) -> Result<WalkerId, SessionError> {
        let maps = targets
            .iter()
            .map(|k| self.map(k).map(Arc::clone))
            .collect::<Result<Vec<_>, _>>()?;
        let id = WalkerId(self.next_walker);
        let walker = Walker::new(
            id,
            Arc::clone(&self.grid),
            start,
            maps,
            config.with_seed(walker_seed(config.seed, id)),
        )?;
        self.next_walker += 1;
        self.pending.push(walker);
        Ok(id)
    }

    /// Queue a walker starting at an anchor.
    pub fn spawn_walker_at(
        &mut self,
        anchor_id: &str,
        targets: &[FieldKey],
        config: &WalkerConfig,
    ) -> Result<WalkerId, SessionError> {
        let start = self.anchor_cell(anchor_id)?;
        self.spawn_walker(start, targets, config)
    }

    /// Number of queued walkers.
    pub fn pending_walkers(&self) -> usize {
        self.pending.len()
    }

    /// Run every queued walker to completion. Returns how many finished.
    pub fn run_walkers(&mut self) -> Result<usize, SessionError> {
        self.run_walkers_cancellable(&AtomicBool::new(false))
    }

    /// Run every queued walker; once `cancel` is set, walkers still running
    /// stop at their next tick with `Aborted(Cancelled)`.
    pub fn run_walkers_cancellable(&mut self, cancel: &AtomicBool) -> Result<usize, SessionError> {
        let walkers = std::mem::take(&mut self.pending);
        if walkers.is_empty() {
            return Ok(0);
        }
        let workers = self.config.resolved_worker_count().min(walkers.len());
        let started = Instant::now();

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Walker>();
        let (out_tx, out_rx) = crossbeam_channel::unbounded::<WalkOutcome>();
        for walker in walkers {
            // job_rx is alive, so the send cannot fail.
            let _ = job_tx.send(walker);
        }
        drop(job_tx);

        let panicked = std::thread::scope(|s| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let rx = job_rx.clone();
                    let tx = out_tx.clone();
                    s.spawn(move || {
                        for mut walker in rx.iter() {
                            walker.run_cancellable(cancel);
                            if tx.send(walker.into_outcome()).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join()).filter(Result::is_err).count()
        });
        drop(out_tx);

        let mut finished: Vec<WalkOutcome> = out_rx.iter().collect();
        finished.sort_by_key(|o| o.id);
        let count = finished.len();
        let done = finished.iter().filter(|o| o.is_done()).count();
        for outcome in finished {
            self.outcomes.insert(outcome.id, outcome);
        }
        info!(
            "[Session] ran {count} walkers on {workers} threads in {} ms: {done} done, {} aborted",
            started.elapsed().as_millis(),
            count - done
        );
        if panicked > 0 {
            return Err(SessionError::WorkerPanicked);
        }
        Ok(count)
    }

    /// The outcome of a finished walker.
    pub fn outcome(&self, id: WalkerId) -> Option<&WalkOutcome> {
        self.outcomes.get(&id)
    }

    /// Finished walks, ordered by walker id within each batch.
    pub fn outcomes(&self) -> impl Iterator<Item = &WalkOutcome> + '_ {
        self.outcomes.values()
    }

    /// Remove and return every finished walk.
    pub fn take_outcomes(&mut self) -> Vec<WalkOutcome> {
        self.outcomes.drain(..).map(|(_, o)| o).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::{AbortReason, WalkState};
    use scentwalk_core::{GridError, PathError};
    use scentwalk_space::{Point, WorldRect};

    /// 60 x 40 world with a wall at y = 20..22 and a doorway at x = 40..44.
    fn plan(worker_count: Option<usize>) -> Session {
        let config = SessionConfig {
            world: WorldRect::from_size(60.0, 40.0),
            worker_count,
            ..Default::default()
        };
        let obstacles = [
            Obstacle::from_rect(0.0, 20.0, 40.0, 2.0),
            Obstacle::from_rect(44.0, 20.0, 16.0, 2.0),
        ];
        let mut s = Session::new(config, &obstacles).unwrap();
        s.add_anchor(AnchorPoint::new("entrance", 5.5, 5.5)).unwrap();
        s.add_anchor(AnchorPoint::new("shelf", 50.5, 8.5)).unwrap();
        s.add_anchor(AnchorPoint::new("exit", 10.5, 35.5)).unwrap();
        s
    }

    // ── Anchors ─────────────────────────────────────────────────

    #[test]
    fn anchors_map_through_frame() {
        let s = plan(None);
        assert_eq!(s.anchor_cell("shelf").unwrap(), Cell::new(50, 8));
        let ids: Vec<_> = s.anchors().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["entrance", "shelf", "exit"]);
        assert!(matches!(
            s.anchor_cell("nowhere"),
            Err(SessionError::UnknownAnchor { .. })
        ));
    }

    #[test]
    fn anchor_errors() {
        let mut s = plan(None);
        assert_eq!(
            s.add_anchor(AnchorPoint::new("shelf", 1.0, 1.0)),
            Err(SessionError::DuplicateKey {
                key: "shelf".into()
            })
        );
        assert!(matches!(
            s.add_anchor(AnchorPoint::new("outside", 75.0, 1.0)),
            Err(SessionError::Grid(GridError::PointOutOfBounds { .. }))
        ));
    }

    #[test]
    fn translation_shifts_anchor_cells() {
        let config = SessionConfig {
            world: WorldRect::from_size(20.0, 20.0),
            translation: (5.0, 0.0),
            ..Default::default()
        };
        let mut s = Session::new(config, &[]).unwrap();
        let cell = s.add_anchor(AnchorPoint::new("a", 0.5, 0.5)).unwrap();
        assert_eq!(cell, Cell::new(5, 0));
        assert_eq!(s.grid().cell_of(Point::new(-5.0, 0.0)).unwrap(), Cell::new(0, 0));
    }

    // ── Maps ────────────────────────────────────────────────────

    #[test]
    fn default_path_key_and_cache() {
        let mut s = plan(None);
        let key = s.compute_path(Cell::new(1, 1), Cell::new(5, 30), None).unwrap();
        assert_eq!(key.as_str(), "p-(1, 1)-(5, 30)");
        let first = Arc::clone(s.map(&key).unwrap());
        let again = s.compute_path(Cell::new(1, 1), Cell::new(5, 30), None).unwrap();
        assert!(Arc::ptr_eq(&first, s.map(&again).unwrap()));
        let path = s.path(&key).unwrap();
        assert!(path.cells().iter().any(|c| c.y == 20 && (40..44).contains(&c.x)));
    }

    #[test]
    fn reused_path_key_rejects_other_requests() {
        let mut s = plan(None);
        let goal = FieldKey::new("goal");
        s.compute_path(Cell::new(1, 1), Cell::new(25, 5), Some(goal.clone()))
            .unwrap();
        let first = Arc::clone(s.map(&goal).unwrap());

        let dup: Result<FieldKey, SessionError> =
            Err(SessionError::DuplicateKey { key: "goal".into() });
        assert_eq!(
            s.compute_path(Cell::new(1, 1), Cell::new(3, 28), Some(goal.clone())),
            dup
        );
        assert_eq!(
            s.compute_path(Cell::new(2, 2), Cell::new(25, 5), Some(goal.clone())),
            dup
        );
        assert_eq!(s.compute_fragrance_at(Cell::new(25, 5), goal.clone()), dup);

        let map = s.map(&goal).unwrap();
        assert!(Arc::ptr_eq(&first, map));
        assert_eq!(map.kind(), AttractionKind::Path);
        assert_eq!(map.target(), Cell::new(25, 5));

        let again = s
            .compute_path(Cell::new(1, 1), Cell::new(25, 5), Some(goal.clone()))
            .unwrap();
        assert!(Arc::ptr_eq(&first, s.map(&again).unwrap()));
    }

    #[test]
    fn reused_fragrance_key_rejects_other_requests() {
        let mut s = plan(None);
        let goal = FieldKey::new("goal");
        s.compute_fragrance_at(Cell::new(10, 10), goal.clone()).unwrap();
        let first = Arc::clone(s.map(&goal).unwrap());

        let dup: Result<FieldKey, SessionError> =
            Err(SessionError::DuplicateKey { key: "goal".into() });
        assert_eq!(s.compute_fragrance_at(Cell::new(12, 10), goal.clone()), dup);
        assert_eq!(
            s.compute_path(Cell::new(1, 1), Cell::new(10, 10), Some(goal.clone())),
            dup
        );
        assert!(s.path(&goal).is_none());

        s.compute_fragrance_at(Cell::new(10, 10), goal.clone()).unwrap();
        let map = s.map(&goal).unwrap();
        assert!(Arc::ptr_eq(&first, map));
        assert_eq!(map.kind(), AttractionKind::Distance);
    }

    #[test]
    fn pairwise_paths_follow_insertion_order() {
        let mut s = plan(None);
        let keys = s.compute_pairwise_paths().unwrap();
        let names: Vec<_> = keys.iter().map(FieldKey::as_str).collect();
        assert_eq!(names, ["entrance-shelf", "entrance-exit", "shelf-exit"]);
    }

    #[test]
    fn pairwise_skips_blocked_anchor() {
        let mut s = plan(None);
        s.add_anchor(AnchorPoint::new("in_wall", 10.5, 20.5)).unwrap();
        let keys = s.compute_pairwise_paths().unwrap();
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().all(|k| !k.as_str().contains("in_wall")));
    }

    #[test]
    fn fragrance_keyed_by_anchor() {
        let mut s = plan(None);
        let key = s.compute_fragrance("exit").unwrap();
        assert_eq!(key.as_str(), "exit");
        assert_eq!(s.map(&key).unwrap().target(), Cell::new(10, 35));
        assert!(matches!(
            s.compute_path(Cell::new(10, 20), Cell::new(1, 1), None),
            Err(SessionError::Path(PathError::StartBlocked { .. }))
        ));
        assert!(matches!(
            s.map(&FieldKey::new("missing")),
            Err(SessionError::UnknownField { .. })
        ));
    }

    // ── Walkers ─────────────────────────────────────────────────

    fn batch(worker_count: Option<usize>) -> Vec<WalkOutcome> {
        let mut s = plan(worker_count);
        let to_shelf = s.compute_anchor_path("entrance", "shelf").unwrap();
        let to_exit = s.compute_fragrance("exit").unwrap();
        let config = WalkerConfig {
            max_steps: 3000,
            seed: 11,
            ..Default::default()
        };
        for _ in 0..6 {
            s.spawn_walker_at("entrance", &[to_shelf.clone(), to_exit.clone()], &config)
                .unwrap();
        }
        assert_eq!(s.pending_walkers(), 6);
        assert_eq!(s.run_walkers().unwrap(), 6);
        assert_eq!(s.pending_walkers(), 0);
        let out = s.take_outcomes();
        assert_eq!(s.outcomes().count(), 0);
        out
    }

    #[test]
    fn batch_is_independent_of_worker_count() {
        let strip = |v: Vec<WalkOutcome>| -> Vec<(WalkerId, WalkState, Vec<Cell>)> {
            v.into_iter().map(|o| (o.id, o.state, o.trajectory)).collect()
        };
        let one = strip(batch(Some(1)));
        let four = strip(batch(Some(4)));
        assert_eq!(one, four);
        let ids: Vec<_> = one.iter().map(|o| o.0).collect();
        assert_eq!(ids, (0..6).map(WalkerId).collect::<Vec<_>>());
    }

    #[test]
    fn walkers_get_distinct_streams() {
        let out = batch(Some(2));
        assert_ne!(out[0].trajectory, out[1].trajectory);
        assert!(out.iter().all(|o| o.state.is_terminal()));
    }

    #[test]
    fn cancelled_batch_aborts_every_walker() {
        let mut s = plan(Some(2));
        let key = s.compute_fragrance("exit").unwrap();
        for _ in 0..3 {
            s.spawn_walker_at("entrance", &[key.clone()], &WalkerConfig::default())
                .unwrap();
        }
        let cancel = AtomicBool::new(true);
        assert_eq!(s.run_walkers_cancellable(&cancel).unwrap(), 3);
        assert!(s
            .outcomes()
            .all(|o| o.abort_reason() == Some(AbortReason::Cancelled)));
    }

    #[test]
    fn spawn_rejects_unknown_target() {
        let mut s = plan(None);
        assert!(matches!(
            s.spawn_walker(Cell::new(1, 1), &[FieldKey::new("nope")], &WalkerConfig::default()),
            Err(SessionError::UnknownField { .. })
        ));
        assert_eq!(s.run_walkers().unwrap(), 0);
    }

    #[test]
    fn seed_derivation() {
        assert_eq!(walker_seed(42, WalkerId(0)), 42);
        assert_ne!(walker_seed(42, WalkerId(1)), walker_seed(42, WalkerId(2)));
    }
}
