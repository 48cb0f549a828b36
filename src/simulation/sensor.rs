//! Ray sensors.

use crate::simulation::params::{SENSOR_BUCKET, SENSOR_COUNT, SENSOR_SPECS};
use crate::simulation::track::Track;

/// A ray cast from the car at a fixed angle relative to its heading.
///
/// `distance` is signed:
/// - `> 0`: the car is on the road and the first off-road pixel is this far
///   away (`length` when nothing was hit).
/// - `< 0`: the car is off the road and road was found this far away.
/// - `0`: off-road with no road in range, or a wall right at the car.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sensor {
    angle_offset: f64,
    length: f64,
    pub distance: f64,
}

impl Sensor {
    #[must_use]
    pub const fn new(angle_offset: f64, length: f64) -> Self {
        Self {
            angle_offset,
            length,
            distance: 0.0,
        }
    }

    /// The standard set of eight sensors, in state-tuple order.
    #[must_use]
    pub fn standard_set() -> [Self; SENSOR_COUNT] {
        SENSOR_SPECS.map(|(angle, length)| Self::new(angle, length))
    }

    #[must_use]
    pub const fn angle_offset(&self) -> f64 {
        self.angle_offset
    }

    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Re-measures the distance from the car pose `(x, y, heading)`.
    pub fn update(&mut self, x: f64, y: f64, heading: f64, track: &Track) {
        self.distance = self.measure(x, y, heading, track);
    }

    /// Casts the ray one pixel step at a time. Samples outside the track are
    /// skipped rather than treated as hits.
    #[must_use]
    pub fn measure(&self, x: f64, y: f64, heading: f64, track: &Track) -> f64 {
        let rad = (heading + self.angle_offset).to_radians();
        let (sin, cos) = rad.sin_cos();
        let on_road = track.is_on_road(x, y);
        let steps = self.length as i64;

        for step in 0..steps {
            let s = step as f64;
            let px = (x + s * cos) as i64;
            let py = (y - s * sin) as i64;
            if !track.in_bounds(px, py) {
                continue;
            }
            let is_road = track.classify(px, py).is_road();
            if on_road && !is_road {
                return s;
            }
            if !on_road && is_road {
                return -s;
            }
        }

        if on_road {
            self.length
        } else {
            0.0
        }
    }

    /// Bucketed distance used in the state tuple.
    #[must_use]
    pub fn bucket(&self) -> i32 {
        (self.distance / SENSOR_BUCKET) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::track::Cell;

    fn road_strip() -> Track {
        // Road on columns 0..50, grass beyond.
        Track::from_fn(100, 20, |x, _| if x < 50 { Cell::Road } else { Cell::OffRoad })
    }

    #[test]
    fn test_standard_set_order() {
        let sensors = Sensor::standard_set();
        assert_eq!(sensors[0].angle_offset(), -135.0);
        assert_eq!(sensors[3].length(), 200.0);
        assert_eq!(sensors[7].angle_offset(), 180.0);
    }

    #[test]
    fn test_on_road_hits_wall() {
        let track = road_strip();
        let sensor = Sensor::new(0.0, 100.0);
        // Heading east from x=40: first off-road pixel at x=50.
        assert_eq!(sensor.measure(40.0, 10.0, 0.0, &track), 10.0);
    }

    #[test]
    fn test_off_road_finds_road_negative() {
        let track = road_strip();
        let sensor = Sensor::new(180.0, 100.0);
        // Facing east, sensor points west; from x=60 road starts at x=49.
        let d = sensor.measure(60.5, 10.0, 0.0, &track);
        assert_eq!(d, -11.0);
    }

    #[test]
    fn test_negative_distance_buckets_truncate_towards_zero() {
        let mut sensor = Sensor::new(0.0, 100.0);
        sensor.distance = -19.0;
        assert_eq!(sensor.bucket(), -1);
        sensor.distance = 99.0;
        assert_eq!(sensor.bucket(), 9);
    }
}
