//! End-to-end store walk example.
//!
//! Demonstrates: floor plan → session → pairwise paths + fragrance maps →
//! a batch of walkers → per-walker summaries and an ASCII footprint.

use scentwalk_bench::reference_plan;
use scentwalk_engine::WalkerConfig;

fn main() {
    println!("=== scentwalk store walk ===\n");

    let mut session = reference_plan().session().unwrap();
    let grid = session.grid().clone();
    println!(
        "Grid {}x{}: {} occupied, {} free",
        grid.cols(),
        grid.rows(),
        grid.occupied_count(),
        grid.free_count()
    );

    let paths = session.compute_pairwise_paths().unwrap();
    for key in &paths {
        let path = session.path(key).unwrap();
        println!("  path {key}: {} cells", path.len());
    }
    let to_attraction = session
        .compute_anchor_path("entrance_1", "attraction_1")
        .unwrap();
    let to_exit = session.compute_fragrance("exit_1").unwrap();

    let config = WalkerConfig {
        seed: 2024,
        ..Default::default()
    };
    for _ in 0..8 {
        session
            .spawn_walker_at("entrance_1", &[to_attraction.clone(), to_exit.clone()], &config)
            .unwrap();
    }
    let finished = session.run_walkers().unwrap();
    println!("\nRan {finished} walkers:");

    let mut visits = vec![0u32; grid.cell_count()];
    for outcome in session.outcomes() {
        println!(
            "  walker {}: {:?}, {} steps, {} lingering, {} fallback, {} us",
            outcome.id,
            outcome.state,
            outcome.metrics.total_steps,
            outcome.metrics.lingering_ticks,
            outcome.metrics.fallback_steps,
            outcome.metrics.elapsed_us
        );
        for &cell in &outcome.trajectory {
            if let Some(i) = grid.index(cell) {
                visits[i] += 1;
            }
        }
    }

    println!("\nFootprint (# wall, . unvisited, 1-9 visits):");
    for y in (0..grid.rows()).step_by(2) {
        let row: String = (0..grid.cols())
            .map(|x| {
                let i = (y * grid.cols() + x) as usize;
                if grid.is_occupied(grid.cell_at(i)) {
                    '#'
                } else {
                    match visits[i] {
                        0 => '.',
                        n => char::from_digit(n.min(9), 10).unwrap_or('9'),
                    }
                }
            })
            .collect();
        println!("{row}");
    }
}
