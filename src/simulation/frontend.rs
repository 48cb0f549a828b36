//! The seam between the simulation and whatever drives or displays it.
//!
//! A frontend is asked for the user's intent at the start of every tick and
//! handed a read-only [`Snapshot`] at the end of it. It performs no
//! simulation logic.

use crate::error::Result;
use crate::simulation::action::ManualInput;
use crate::simulation::car::{RoadStatus, Vehicle};
use crate::simulation::params::SENSOR_COUNT;
use crate::simulation::settings::Settings;
use crate::simulation::track::Track;

/// What the user asked for during input intake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Keep going; carries the keyboard state for manual driving.
    Continue(ManualInput),
    /// Stop the whole session after this tick.
    EndSession,
    /// Abandon the current episode and run it again.
    RestartEpisode,
    /// The display went away.
    Close,
}

/// Read-only view of one tick for presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub speed: f64,
    pub score: f64,
    pub collided: bool,
    pub road_status: RoadStatus,
    /// Signed sensor distances in sensor order.
    pub sensor_distances: [f64; SENSOR_COUNT],
    pub sensor_offsets: [f64; SENSOR_COUNT],
    pub time_left: f64,
    /// Zero-based.
    pub episode: u32,
    pub total_episodes: u32,
    pub exploration_rate: f64,
    pub manual_control: bool,
    pub training: bool,
}

impl Snapshot {
    #[must_use]
    pub fn capture(car: &Vehicle, track: &Track) -> Self {
        let sensors = *car.sensors();
        Self {
            x: car.x,
            y: car.y,
            heading: car.heading,
            speed: car.speed,
            score: car.score,
            collided: car.collided,
            road_status: car.road_status(car.x, car.y, track),
            sensor_distances: sensors.map(|s| s.distance),
            sensor_offsets: sensors.map(|s| s.angle_offset()),
            time_left: 0.0,
            episode: 0,
            total_episodes: 0,
            exploration_rate: 0.0,
            manual_control: false,
            training: false,
        }
    }
}

/// Input intake and presentation handoff for the episode loop.
pub trait Frontend {
    /// Samples user intent without blocking. May flip live settings such as
    /// manual control.
    fn poll(&mut self, settings: &mut Settings) -> Result<Intent>;

    /// Receives the state after a tick. Pacing to a frame rate happens here.
    fn present(&mut self, snapshot: &Snapshot, track: &Track) -> Result<()>;
}

/// Runs the simulation as fast as possible with no input or output.
#[derive(Clone, Copy, Debug, Default)]
pub struct Headless;

impl Frontend for Headless {
    fn poll(&mut self, _settings: &mut Settings) -> Result<Intent> {
        Ok(Intent::Continue(ManualInput::default()))
    }

    fn present(&mut self, _snapshot: &Snapshot, _track: &Track) -> Result<()> {
        Ok(())
    }
}
