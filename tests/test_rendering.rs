mod common;

use common::strip_track;
use racetrack_rl::simulation::car::Vehicle;
use racetrack_rl::simulation::frontend::Snapshot;
use racetrack_rl::simulation::settings::CarSettings;
use racetrack_rl::ui::field::compute_track_grid;
use racetrack_rl::ui::render::{hud_lines, overlay_car};

#[test]
fn test_track_grid_computation() {
    let track = strip_track();
    let rows = 10;
    let cols = 40;

    let grid = compute_track_grid(&track, rows, cols);

    assert_eq!(grid.len(), rows);
    assert_eq!(grid[0].len(), cols);

    for row in &grid {
        for c in row.chars() {
            assert!(" .+=".contains(c));
        }
    }
    // Rows 3..7 sample the road band (y = 30..70), the rest is grass.
    assert!(grid[0].chars().all(|c| c == ' '));
    assert!(grid[4].chars().all(|c| c == '.'));
    assert!(grid[9].chars().all(|c| c == ' '));
}

#[test]
fn test_empty_grid() {
    assert!(compute_track_grid(&strip_track(), 0, 10).is_empty());
}

#[test]
fn test_overlay_marks_car_and_sensor_hits() {
    let track = strip_track();
    let car = Vehicle::new(&track, &CarSettings::default()).unwrap();
    let snapshot = Snapshot::capture(&car, &track);

    let mut grid = compute_track_grid(&track, 10, 40);
    overlay_car(&mut grid, &snapshot, 400.0, 100.0);

    // Car at (30, 50) lands in row 5, column 3.
    assert_eq!(grid[5].chars().nth(3), Some('O'));
    assert!(grid.iter().any(|row| row.contains('*')));
}

#[test]
fn test_hud_shows_mode_and_sensors() {
    let track = strip_track();
    let car = Vehicle::new(&track, &CarSettings::default()).unwrap();
    let mut snapshot = Snapshot::capture(&car, &track);
    snapshot.training = true;
    snapshot.total_episodes = 50;

    let [status, sensors] = hud_lines(&snapshot);
    assert!(status.starts_with("Training 1/50"));
    assert!(sensors.contains("S4: 200"));
    assert!(sensors.contains("S8: 80"));
}
