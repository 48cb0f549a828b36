//! Shared fixtures: small synthetic tracks built cell by cell.

#![allow(dead_code)]

use racetrack_rl::simulation::track::{Cell, Track};

pub const STRIP_WIDTH: u32 = 400;
pub const STRIP_HEIGHT: u32 = 100;
pub const ROAD_TOP: u32 = 30;
pub const ROAD_BOTTOM: u32 = 70;
pub const START: (u32, u32) = (30, 50);

const EPSILON: f64 = 1e-10;

pub fn assert_float_eq(a: f64, b: f64, msg: &str) {
    assert!((a - b).abs() < EPSILON, "{msg}: expected {b}, got {a}");
}

/// A horizontal road band (rows 30..70) across the whole image, with a
/// start cell at (30, 50) facing east and grass above and below.
pub fn strip_track() -> Track {
    Track::from_fn(STRIP_WIDTH, STRIP_HEIGHT, |x, y| {
        if (x, y) == START {
            Cell::Start
        } else if (x, y) == (START.0 - 1, START.1) {
            // Keeps the start cell from seeing road on its west side.
            Cell::Checkpoint
        } else if (ROAD_TOP..ROAD_BOTTOM).contains(&y) {
            Cell::Road
        } else {
            Cell::OffRoad
        }
    })
}

/// Nothing but grass.
pub fn grass_track(width: u32, height: u32) -> Track {
    Track::from_fn(width, height, |_, _| Cell::OffRoad)
}
