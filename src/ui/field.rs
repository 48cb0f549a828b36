use crate::simulation::track::{Cell, Track};
use rayon::prelude::*;

const OFF_ROAD: char = ' ';
const ROAD: char = '.';
const CHECKPOINT: char = '+';
const START: char = '=';

#[must_use]
pub const fn cell_char(cell: Cell) -> char {
    match cell {
        Cell::Road => ROAD,
        Cell::Checkpoint => CHECKPOINT,
        Cell::Start => START,
        Cell::OffRoad => OFF_ROAD,
    }
}

/// Downsamples the track to `rows × cols` characters, one sample per cell.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn compute_track_grid(track: &Track, rows: usize, cols: usize) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let scale_y = f64::from(track.height()) / rows as f64;
    let scale_x = f64::from(track.width()) / cols as f64;

    // Use rayon to compute rows in parallel
    (0..rows)
        .into_par_iter()
        .map(|r| {
            let mut line = String::with_capacity(cols);
            for c in 0..cols {
                let world_y = r as f64 * scale_y;
                let world_x = c as f64 * scale_x;
                line.push(cell_char(track.classify_point(world_x, world_y)));
            }
            line
        })
        .collect()
}
