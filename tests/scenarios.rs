use mowersim::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

fn cells(pairs: &[[i32; 2]]) -> Vec<Cell> {
    pairs.iter().copied().map(Cell::from).collect()
}

fn run(height: i32, width: i32, rocks: &[[i32; 2]], start: [i32; 2], moves: &[&str]) -> SimStatus {
    Engine::new("Scenario", height, width, cells(rocks), Cell::from(start))
        .execute_tokens(moves)
        .unwrap()
}

#[test]
fn valid_path_cuts_all_grass() {
    let status = run(3, 2, &[[1, 1], [0, 1]], [0, 0], &["down", "down", "right"]);
    assert!(status.all_grass_cut);
    assert!(!status.did_mower_crash);
    assert_eq!(status.uncut_grass_remaining, 0);
    assert_eq!(status.crash_reason, CrashReason::None);
}

#[test]
fn leaving_the_lawn_is_a_fence_crash() {
    let status = run(5, 5, &[], [0, 0], &["up"]);
    assert!(status.did_mower_crash);
    assert_eq!(status.crash_reason.label(), "Crashed into Fence");
    assert_eq!(status.last_pos, Cell::new(-1, 0));
    assert_eq!(status.pos_history, cells(&[[0, 0], [-1, 0]]));
    assert_eq!(status.visited_cells, cells(&[[0, 0]]));
}

#[test]
fn hitting_a_rock_is_a_rock_crash() {
    let status = run(5, 5, &[[1, 1]], [0, 0], &["down", "right"]);
    assert!(status.did_mower_crash);
    assert_eq!(status.crash_reason.label(), "Crashed into Rock");
    assert_eq!(status.last_pos, Cell::new(1, 1));
    assert!(!status.visited_cells.contains(&Cell::new(1, 1)));
}

#[test]
fn partial_path_leaves_grass_uncut() {
    let status = run(3, 2, &[[1, 1], [0, 1]], [0, 0], &["down"]);
    assert!(!status.all_grass_cut);
    assert_eq!(status.uncut_grass_remaining, 2);
}

#[test]
fn mixed_case_tokens_are_accepted() {
    let status = run(3, 2, &[[1, 1], [0, 1]], [0, 0], &["Down", "DOWN", "Right"]);
    assert!(status.all_grass_cut);
}

#[test]
fn moves_after_a_crash_are_not_attempted() {
    let status = run(3, 3, &[], [0, 0], &["left", "down", "down", "right"]);
    assert!(status.did_mower_crash);
    assert_eq!(status.pos_history.len(), 2);
    assert_eq!(status.visited_cells.len(), 1);
    assert!(status.messages.iter().any(|m| m.contains("Simulator Fail due Crash")));
    assert!(!status.messages.iter().any(|m| m.contains("Move index 1")));
}

#[test]
fn out_of_bounds_input_degrades_gracefully() {
    let status = run(2, 2, &[[5, 5], [1, 1], [-1, 0]], [9, 9], &["right"]);
    assert_eq!(status.rock_locations, cells(&[[5, 5], [1, 1], [-1, 0]]));
    assert_eq!(status.valid_rocks, cells(&[[1, 1]]));
    assert_eq!(status.start_pos, Cell::ORIGIN);
    assert_eq!(status.total_grass_squares, 3);
    assert_eq!(status.uncut_grass_remaining, 1);
}

#[test]
fn revisits_are_idempotent() {
    let once = run(3, 3, &[], [1, 1], &["up"]);
    let back_and_forth = run(3, 3, &[], [1, 1], &["up", "down", "up", "down", "up"]);
    assert_eq!(once.uncut_grass_remaining, back_and_forth.uncut_grass_remaining);
    assert_eq!(once.all_grass_cut, back_and_forth.all_grass_cut);
    assert_eq!(back_and_forth.visited_cells, cells(&[[1, 1], [0, 1]]));
    assert_eq!(back_and_forth.pos_history.len(), 6);
}

#[test]
fn random_paths_hold_the_invariants() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let height = rng.gen_range(1..6);
        let width = rng.gen_range(1..6);
        let rocks: Vec<Cell> = (0..rng.gen_range(0..6))
            .map(|_| Cell::new(rng.gen_range(-1..height + 1), rng.gen_range(-1..width + 1)))
            .collect();
        let start = Cell::new(rng.gen_range(-1..height + 1), rng.gen_range(-1..width + 1));
        let moves: Vec<Direction> = (0..rng.gen_range(0..25))
            .map(|_| Direction::ALL[rng.gen_range(0..4)])
            .collect();

        let status = Engine::new("Random", height, width, rocks.clone(), start).execute_path(&moves);
        let bounds = LawnBounds::new(height, width);

        assert!(status.valid_rocks.iter().all(|r| bounds.contains(*r)));
        assert!(status.valid_rocks.len() <= status.rock_locations.len());
        assert_eq!(
            status.total_grass_squares,
            (height * width) as usize - status.valid_rocks.len()
        );
        assert!(status.visited_cells.iter().all(|c| bounds.contains(*c)));
        assert!(status.visited_cells.iter().all(|c| !status.valid_rocks.contains(c)));
        assert_eq!(
            status.uncut_grass_remaining,
            status.total_grass_squares - status.visited_cells.len()
        );
        assert_eq!(status.all_grass_cut, status.uncut_grass_remaining == 0);
        assert!(status.visited_cells.len() <= status.pos_history.len());
        assert_eq!(status.last_pos, *status.pos_history.last().unwrap());

        if status.did_mower_crash {
            assert!(status.pos_history.len() <= moves.len() + 1);
            assert_ne!(status.crash_reason, CrashReason::None);
            assert!(!status.visited_cells.contains(&status.last_pos));
        } else {
            assert_eq!(status.pos_history.len(), moves.len() + 1);
            assert_eq!(status.crash_reason, CrashReason::None);
        }
    }
}
