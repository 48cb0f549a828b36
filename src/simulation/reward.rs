//! Reward model.
//!
//! The learning signal is `speed × lateral clearance`, minus a penalty on a
//! crash. Road adherence and checkpoint bonuses are computed alongside it as
//! separate telemetry and are not added to the learning signal or the score.

use crate::simulation::car::{RoadStatus, Vehicle};
use crate::simulation::params::{
    CLEARANCE_REWARD_DIVISOR, COLLISION_PENALTY, LATERAL_SENSORS, ROAD_CHECK_INTERVAL,
    ROAD_REWARD_OFF, ROAD_REWARD_ON, ROAD_REWARD_PARTIAL, SENSOR_COUNT, SPEED_REWARD_DIVISOR,
};
use crate::simulation::sensor::Sensor;

/// Rounds to one decimal place.
///
/// The decision is made on the exact binary value, so `0.45` (stored just
/// above the tie) rounds up and `0.15` (stored just below) rounds down.
/// Only exactly representable ties such as `0.25` go to even.
#[must_use]
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[must_use]
pub fn speed_component(speed: f64) -> f64 {
    round1(speed / SPEED_REWARD_DIVISOR)
}

/// Smallest reading among the lateral sensors, scaled to roughly `[0, 1]`.
/// Negative when the car is off the road.
#[must_use]
pub fn clearance_component(sensors: &[Sensor; SENSOR_COUNT]) -> f64 {
    let min_distance = LATERAL_SENSORS
        .iter()
        .map(|&i| sensors[i].distance)
        .fold(f64::INFINITY, f64::min);
    round1(min_distance / CLEARANCE_REWARD_DIVISOR)
}

/// The per-tick learning reward.
#[must_use]
pub fn tick_reward(car: &Vehicle) -> f64 {
    let mut reward = round1(speed_component(car.speed) * clearance_component(car.sensors()));
    if car.collided {
        reward -= COLLISION_PENALTY;
    }
    reward
}

/// Rate-limited road-adherence signal.
#[derive(Clone, Copy, Debug)]
pub struct RoadAdherence {
    last_check: f64,
}

impl RoadAdherence {
    /// Starts the rate-limit window at `now`.
    #[must_use]
    pub const fn new(now: f64) -> Self {
        Self { last_check: now }
    }

    /// Returns the adherence reward if at least [`ROAD_CHECK_INTERVAL`]
    /// simulated seconds have passed since the last sample, else 0.
    pub fn sample(&mut self, status: RoadStatus, now: f64) -> f64 {
        if now - self.last_check < ROAD_CHECK_INTERVAL {
            return 0.0;
        }
        self.last_check = now;
        match status {
            RoadStatus::OnRoad => ROAD_REWARD_ON,
            RoadStatus::PartiallyOff => ROAD_REWARD_PARTIAL,
            RoadStatus::CompletelyOff => ROAD_REWARD_OFF,
        }
    }
}

/// Auxiliary signals of one tick. Telemetry only; never part of the
/// learning reward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickSignals {
    pub road_adherence: f64,
    pub checkpoint_bonus: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1_exact_ties_to_even() {
        assert_eq!(round1(0.25), 0.2);
        assert_eq!(round1(0.75), 0.8);
        assert_eq!(round1(1.04), 1.0);
        assert_eq!(round1(-0.26), -0.3);
    }

    #[test]
    fn test_round1_uses_stored_value_near_ties() {
        assert_eq!(round1(0.45), 0.5);
        assert_eq!(round1(0.15), 0.1);
        assert_eq!(round1(0.05), 0.1);
        assert_eq!(round1(0.35), 0.3);
        assert_eq!(round1(0.1 * 0.5), 0.1);
        assert_eq!(round1(-0.45), -0.5);
    }

    #[test]
    fn test_clearance_near_tie() {
        let mut sensors = Sensor::standard_set();
        for s in &mut sensors {
            s.distance = 150.0;
        }
        sensors[1].distance = 45.0;
        assert_eq!(clearance_component(&sensors), 0.5);
        sensors[1].distance = 15.0;
        assert_eq!(clearance_component(&sensors), 0.1);
    }

    #[test]
    fn test_speed_component() {
        assert_eq!(speed_component(0.0), 0.0);
        assert_eq!(speed_component(1.5), 0.2);
        assert_eq!(speed_component(1.2), 0.2);
    }

    #[test]
    fn test_clearance_uses_lateral_sensors_only() {
        let mut sensors = Sensor::standard_set();
        for (i, s) in sensors.iter_mut().enumerate() {
            s.distance = 100.0 + i as f64;
        }
        // Sensors 2 and 5..7 are ignored even when they are the closest.
        sensors[2].distance = 1.0;
        sensors[7].distance = 1.0;
        sensors[3].distance = 60.0;
        assert_eq!(clearance_component(&sensors), 0.6);
    }

    #[test]
    fn test_road_adherence_rate_limited() {
        let mut adherence = RoadAdherence::new(0.0);
        assert_eq!(adherence.sample(RoadStatus::OnRoad, 0.1), 0.0);
        assert_eq!(adherence.sample(RoadStatus::OnRoad, 0.25), 0.5);
        assert_eq!(adherence.sample(RoadStatus::PartiallyOff, 0.3), 0.0);
        assert_eq!(adherence.sample(RoadStatus::PartiallyOff, 0.5), -0.5);
        assert_eq!(adherence.sample(RoadStatus::CompletelyOff, 0.75), -1.0);
    }
}
