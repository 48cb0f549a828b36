use crate::error::Result;
use crate::simulation::action::{Action, ManualInput, Steer};
use crate::simulation::checkpoint::Location;
use crate::simulation::params::{SENSOR_COUNT, STATE_LEN};
use crate::simulation::sensor::Sensor;
use crate::simulation::settings::{CarSettings, CollisionMode};
use crate::simulation::track::{StartPose, Track};

/// Discrete observation: speed bucket followed by one bucket per sensor.
pub type State = [i32; STATE_LEN];

/// Validates that a value is finite (not NaN or infinite).
/// Returns a safe fallback (0.0) in release mode if the value is non-finite.
#[inline]
fn assert_finite(value: f64, context: &str) -> f64 {
    debug_assert!(value.is_finite(), "Non-finite value in {context}: {value}");
    if value.is_finite() { value } else { 0.0 }
}

/// Wraps a heading in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_heading(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Where the car's bounding rectangle sits relative to the road.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoadStatus {
    OnRoad,
    PartiallyOff,
    CompletelyOff,
}

/// The simulated car.
///
/// Kinematics are forward Euler in screen coordinates: heading is in degrees
/// counter-clockwise and y grows downwards. Leaving the road never blocks
/// movement, it only lowers the speed cap.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub speed: f64,
    pub score: f64,
    pub collided: bool,
    pub last_checkpoint: Option<Location>,
    max_speed: f64,
    sensors: [Sensor; SENSOR_COUNT],
    spawn: StartPose,
    params: CarSettings,
}

impl Vehicle {
    /// Creates a car on the track's start line.
    ///
    /// Fails with `NoStartFound` when the track has no usable start cell.
    pub fn new(track: &Track, params: &CarSettings) -> Result<Self> {
        let start = track.find_start()?;
        let spawn = StartPose {
            heading: normalize_heading(start.heading),
            ..start
        };
        let mut car = Self {
            x: spawn.x,
            y: spawn.y,
            heading: spawn.heading,
            speed: 0.0,
            score: 0.0,
            collided: false,
            last_checkpoint: None,
            max_speed: params.max_speed,
            sensors: Sensor::standard_set(),
            spawn,
            params: params.clone(),
        };
        car.reset(track);
        Ok(car)
    }

    /// Puts the car back on the start line for a new episode.
    pub fn reset(&mut self, track: &Track) {
        self.x = self.spawn.x;
        self.y = self.spawn.y;
        self.heading = self.spawn.heading;
        self.speed = 0.0;
        self.score = 0.0;
        self.collided = false;
        self.last_checkpoint = None;
        self.max_speed = self.params.max_speed;
        self.update_sensors(track);
    }

    #[must_use]
    pub const fn sensors(&self) -> &[Sensor; SENSOR_COUNT] {
        &self.sensors
    }

    /// Speed cap set by the last move.
    #[must_use]
    pub const fn current_max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn accelerate(&mut self) {
        self.speed = (self.speed + self.params.acceleration).min(self.max_speed);
    }

    pub fn decelerate(&mut self) {
        self.speed *= self.params.deceleration;
    }

    /// Turns by `delta` degrees scaled by the fraction of full speed, so a
    /// stationary car cannot turn.
    pub fn rotate(&mut self, delta: f64) {
        if self.params.max_speed != 0.0 {
            let turn = assert_finite(delta * (self.speed / self.params.max_speed), "turn");
            self.heading = normalize_heading(self.heading + turn);
        }
    }

    /// Applies one agent action and advances the car by one tick.
    pub fn apply(&mut self, action: Action, track: &Track) {
        match action {
            Action::Accelerate => self.accelerate(),
            Action::RotateLeft => self.rotate(self.params.rotation_speed),
            Action::RotateRight => self.rotate(-self.params.rotation_speed),
            Action::Decelerate => self.decelerate(),
        }
        self.update(track);
    }

    /// Applies keyboard input and advances the car by one tick.
    pub fn apply_manual(&mut self, input: ManualInput, track: &Track) {
        if input.throttle {
            self.accelerate();
        } else {
            self.decelerate();
        }
        match input.steer {
            Some(Steer::Left) => self.rotate(self.params.rotation_speed),
            Some(Steer::Right) => self.rotate(-self.params.rotation_speed),
            None => {}
        }
        self.update(track);
    }

    /// One kinematics tick: move, re-sense, check for a crash.
    pub fn update(&mut self, track: &Track) {
        self.update_position(track);
        self.update_sensors(track);
        self.check_collision(track);
    }

    fn update_position(&mut self, track: &Track) {
        let rad = self.heading.to_radians();
        let new_x = assert_finite(self.x + self.speed * rad.cos(), "x");
        let new_y = assert_finite(self.y - self.speed * rad.sin(), "y");

        self.max_speed = match self.road_status(new_x, new_y, track) {
            RoadStatus::OnRoad => self.params.max_speed,
            RoadStatus::PartiallyOff => self.params.max_speed_partially_off,
            RoadStatus::CompletelyOff => self.params.max_speed_completely_off,
        };
        self.speed = self.speed.min(self.max_speed);
        self.x = new_x;
        self.y = new_y;
    }

    pub fn update_sensors(&mut self, track: &Track) {
        let (x, y, heading) = (self.x, self.y, self.heading);
        for sensor in &mut self.sensors {
            sensor.update(x, y, heading, track);
        }
    }

    pub fn check_collision(&mut self, track: &Track) {
        self.collided = match self.params.collision {
            CollisionMode::Track => {
                self.road_status(self.x, self.y, track) == RoadStatus::CompletelyOff
            }
            CollisionMode::Window => {
                let half_w = self.params.width / 2.0;
                let half_h = self.params.height / 2.0;
                let inside = half_w < self.x
                    && self.x < f64::from(track.width()) - half_w
                    && half_h < self.y
                    && self.y < f64::from(track.height()) - half_h;
                !inside
            }
        };
    }

    /// Corners of the car rectangle centred on `(x, y)`, rotated by the
    /// current heading: top-left, top-right, bottom-right, bottom-left.
    #[must_use]
    pub fn corners(&self, x: f64, y: f64) -> [(f64, f64); 4] {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        let half_w = self.params.width / 2.0;
        let half_h = self.params.height / 2.0;
        [(-half_w, -half_h), (half_w, -half_h), (half_w, half_h), (-half_w, half_h)]
            .map(|(dx, dy)| (x + dx * cos - dy * sin, y + dx * sin + dy * cos))
    }

    /// Road status of the car rectangle if it were centred on `(x, y)`.
    #[must_use]
    pub fn road_status(&self, x: f64, y: f64, track: &Track) -> RoadStatus {
        let on_road = self
            .corners(x, y)
            .iter()
            .filter(|(cx, cy)| track.is_on_road(*cx, *cy))
            .count();
        match on_road {
            4 => RoadStatus::OnRoad,
            0 => RoadStatus::CompletelyOff,
            _ => RoadStatus::PartiallyOff,
        }
    }

    /// Discretizes speed and sensor readings. Truncation, not rounding.
    #[must_use]
    pub fn state(&self) -> State {
        let mut state = [0; STATE_LEN];
        state[0] = self.speed as i32;
        for (slot, sensor) in state[1..].iter_mut().zip(&self.sensors) {
            *slot = sensor.bucket();
        }
        state
    }

    /// Adds a reward to the running score, kept at one decimal place.
    pub fn add_score(&mut self, delta: f64) {
        self.score = crate::simulation::reward::round1(self.score + delta);
    }
}
