//! Property-based invariant tests for the maze engine.
//!
//! Verifies:
//! 1. Every trace ends within the (room, heading) state bound
//! 2. `trapped` is set exactly when there is no exit hole
//! 3. Wall mazes never trap and pair holes up (h -> h2 implies h2 -> h)
//! 4. Building a mapping is pure and tracks the grid it came from
//! 5. A grid compared with itself is a perfect match
//! 6. `next_symbol` cycles back to empty within one alphabet
//! 7. Generated mazes stay inside their difficulty and alphabet

use mouse_maze::consts::HOLE_COUNT;
use mouse_maze::sim::{
    Cell, CellPos, Difficulty, Grid, Hole, MAX_PATH_LEN, MazeType, Verdict, build_mapping,
    compare, generate, has_opposing_arrows, next_symbol, trace,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_maze_type() -> impl Strategy<Value = MazeType> {
    prop_oneof![Just(MazeType::Walls), Just(MazeType::Arrows)]
}

fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Beginner),
        Just(Difficulty::Intermediate),
        Just(Difficulty::Expert),
    ]
}

fn arb_cell(maze_type: MazeType) -> impl Strategy<Value = Cell> {
    let symbols = maze_type.symbol_cycle().to_vec();
    (0..symbols.len()).prop_map(move |i| symbols[i])
}

fn arb_grid_of(maze_type: MazeType) -> impl Strategy<Value = Grid> {
    prop::collection::vec(arb_cell(maze_type), 16).prop_map(|cells| {
        let mut grid = Grid::new();
        for (pos, cell) in CellPos::all().zip(cells) {
            grid.set(pos, cell);
        }
        grid
    })
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    arb_maze_type().prop_flat_map(arb_grid_of)
}

fn arb_hole() -> impl Strategy<Value = Hole> {
    (1u8..=16).prop_map(Hole::new)
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn trace_terminates_within_state_bound(grid in arb_grid(), hole in arb_hole()) {
        let out = trace(&grid, hole);
        prop_assert!(!out.path.is_empty());
        prop_assert!(out.path.len() <= MAX_PATH_LEN);
    }

    #[test]
    fn trapped_iff_no_exit(grid in arb_grid(), hole in arb_hole()) {
        let out = trace(&grid, hole);
        prop_assert_eq!(out.trapped, out.exit_hole.is_none());
    }

    #[test]
    fn path_starts_at_entry_room(grid in arb_grid(), hole in arb_hole()) {
        let out = trace(&grid, hole);
        prop_assert_eq!(out.path[0], hole.entry().0);
    }

    #[test]
    fn wall_mazes_pair_up_holes(grid in arb_grid_of(MazeType::Walls)) {
        let mapping = build_mapping(&grid);
        for (start, out) in mapping.iter() {
            let exit = out.exit_hole;
            prop_assert!(exit.is_some(), "hole {} trapped in wall maze\n{}", start, grid);
            if let Some(exit) = exit {
                prop_assert_ne!(exit, start);
                prop_assert_eq!(mapping.outcome(exit).exit_hole, Some(start));
            }
        }
    }

    #[test]
    fn wall_reverse_path_is_the_forward_path_backwards(grid in arb_grid_of(MazeType::Walls), hole in arb_hole()) {
        let forward = trace(&grid, hole);
        if let Some(exit) = forward.exit_hole {
            let mut backward = trace(&grid, exit).path;
            backward.reverse();
            prop_assert_eq!(backward, forward.path);
        }
    }

    #[test]
    fn mapping_is_pure(grid in arb_grid(), pos_idx in 0usize..16) {
        let first = build_mapping(&grid);
        prop_assert_eq!(&build_mapping(&grid), &first);

        let mut edited = grid;
        let pos = CellPos::all().nth(pos_idx).unwrap();
        edited.set(pos, next_symbol(edited.get(pos), MazeType::Arrows));
        let edited_mapping = build_mapping(&edited);
        for hole in Hole::all() {
            prop_assert_eq!(edited_mapping.outcome(hole), &trace(&edited, hole));
        }
        prop_assert_eq!(build_mapping(&grid), first);
    }

    #[test]
    fn self_comparison_is_perfect(grid in arb_grid()) {
        let mapping = build_mapping(&grid);
        let cmp = compare(&grid, &mapping, &grid);
        prop_assert_eq!(cmp.match_count, HOLE_COUNT);
        prop_assert_eq!(cmp.verdict(), Verdict::Perfect);
    }

    #[test]
    fn symbol_cycle_returns_to_empty(maze_type in arb_maze_type(), start in 0usize..5) {
        let cycle = maze_type.symbol_cycle();
        let mut cell = cycle[start % cycle.len()];
        let first = cell;
        for _ in 0..cycle.len() {
            cell = next_symbol(cell, maze_type);
            prop_assert!(maze_type.allows(cell));
        }
        prop_assert_eq!(cell, first);
    }

    #[test]
    fn generated_mazes_respect_settings(
        maze_type in arb_maze_type(),
        difficulty in arb_difficulty(),
        seed in any::<u64>(),
    ) {
        let maze = generate(maze_type, difficulty, &mut Pcg32::seed_from_u64(seed));
        prop_assert!(maze.grid.uses_only(maze_type));
        prop_assert!(difficulty.obstacle_range().contains(&maze.grid.obstacle_count()));
        prop_assert!(maze.mapping.has_escape());
        prop_assert_eq!(&maze.mapping, &build_mapping(&maze.grid));
        if maze_type == MazeType::Arrows && difficulty == Difficulty::Beginner {
            prop_assert!(!has_opposing_arrows(&maze.grid));
        }
    }
}
