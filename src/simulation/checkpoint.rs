//! Checkpoint crossing bookkeeping.
//!
//! Every grey pixel on the track is a potential checkpoint location. A
//! location is registered the first time the car passes over it and then
//! pays out again only after a cooldown, and never twice in a row.

use std::collections::HashMap;

use crate::simulation::params::{CHECKPOINT_BONUS, CHECKPOINT_COOLDOWN, CHECKPOINT_RADIUS};
use crate::simulation::track::{Cell, Track};

/// Integer pixel location of a checkpoint.
pub type Location = (i64, i64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    pub location: Location,
    /// Simulated time of the last rewarded crossing.
    pub last_crossed: f64,
}

impl Checkpoint {
    #[must_use]
    pub fn is_active(&self, now: f64) -> bool {
        now - self.last_crossed >= CHECKPOINT_COOLDOWN
    }
}

/// Result of presenting one checkpoint pixel to the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    /// New or cooled-down checkpoint; bonus paid.
    Rewarded,
    /// Same location as the previous crossing; stop looking.
    Repeat,
    /// Known location still in cooldown; other pixels may still count.
    CoolingDown,
}

/// Session-wide set of checkpoint locations seen so far.
#[derive(Clone, Debug, Default)]
pub struct CheckpointRegistry {
    checkpoints: HashMap<Location, Checkpoint>,
}

impl CheckpointRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    #[must_use]
    pub fn get(&self, location: Location) -> Option<&Checkpoint> {
        self.checkpoints.get(&location)
    }

    /// Registers or re-triggers `location`, updating `last` on success.
    pub fn cross(&mut self, location: Location, now: f64, last: &mut Option<Location>) -> Crossing {
        if *last == Some(location) {
            return Crossing::Repeat;
        }
        let checkpoint = self.checkpoints.entry(location).or_insert(Checkpoint {
            location,
            last_crossed: f64::NEG_INFINITY,
        });
        if !checkpoint.is_active(now) {
            return Crossing::CoolingDown;
        }
        checkpoint.last_crossed = now;
        *last = Some(location);
        Crossing::Rewarded
    }

    /// Scans the disc of radius [`CHECKPOINT_RADIUS`] around `(x, y)` and
    /// returns the checkpoint bonus, or 0 when nothing pays out.
    pub fn check(
        &mut self,
        track: &Track,
        x: f64,
        y: f64,
        now: f64,
        last: &mut Option<Location>,
    ) -> f64 {
        let r = CHECKPOINT_RADIUS;
        for dx in -r..=r {
            for dy in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let location = ((x + dx as f64) as i64, (y + dy as f64) as i64);
                if track.classify(location.0, location.1) != Cell::Checkpoint {
                    continue;
                }
                match self.cross(location, now, last) {
                    Crossing::Rewarded => return CHECKPOINT_BONUS,
                    Crossing::Repeat => return 0.0,
                    Crossing::CoolingDown => {}
                }
            }
        }
        0.0
    }
}
