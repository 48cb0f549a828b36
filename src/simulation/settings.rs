//! Session configuration.
//!
//! A single [`Settings`] value is built at startup (defaults, optionally
//! overlaid by a JSON file) and handed by reference to the constructors that
//! need it. Live changes go through [`Settings::apply`], which clamps every
//! value into the range the settings menu allows.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How a terminal collision is detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// Collided when the car rectangle is completely off the road.
    Track,
    /// Collided when the car centre leaves the window.
    Window,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarSettings {
    pub width: f64,
    pub height: f64,
    /// Speed cap while fully on the road.
    pub max_speed: f64,
    pub max_speed_partially_off: f64,
    pub max_speed_completely_off: f64,
    pub acceleration: f64,
    /// Multiplicative factor applied on each decelerate.
    pub deceleration: f64,
    /// Degrees per tick at full speed.
    pub rotation_speed: f64,
    pub collision: CollisionMode,
}

impl Default for CarSettings {
    fn default() -> Self {
        Self {
            width: 25.0,
            height: 10.0,
            max_speed: 1.5,
            max_speed_partially_off: 0.2,
            max_speed_completely_off: 0.1,
            acceleration: 0.2,
            deceleration: 0.95,
            rotation_speed: 5.0,
            collision: CollisionMode::Track,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningSettings {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub exploration_rate: f64,
    pub exploration_decay: f64,
    pub min_exploration_rate: f64,
    pub q_table_path: PathBuf,
}

impl Default for LearningSettings {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount_factor: 0.95,
            exploration_rate: 1.0,
            exploration_decay: 0.995,
            min_exploration_rate: 0.1,
            q_table_path: PathBuf::from("q_tables/q_table.json"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub training_mode: bool,
    pub num_episodes: u32,
    /// Episode length in simulated seconds.
    pub episode_duration: f64,
    /// Read every tick; may be toggled while an episode runs.
    pub manual_control: bool,
    /// Simulation ticks per simulated second.
    pub fps: u32,
    pub log_dir: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            training_mode: true,
            num_episodes: 50,
            episode_duration: 10.0,
            manual_control: false,
            fps: 240,
            log_dir: PathBuf::from("q_learning_logs"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
        }
    }
}

/// All configuration for one session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub car: CarSettings,
    pub learning: LearningSettings,
    pub session: SessionSettings,
    pub window: WindowSettings,
}

/// A single named change to the settings.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingUpdate {
    EpisodeDuration(f64),
    NumEpisodes(u32),
    ManualControl(bool),
    TrainingMode(bool),
    LearningRate(f64),
    DiscountFactor(f64),
    ExplorationRate(f64),
    ExplorationDecay(f64),
    MinExplorationRate(f64),
    MaxSpeed(f64),
    Acceleration(f64),
    Deceleration(f64),
    RotationSpeed(f64),
    QTablePath(PathBuf),
    LogDir(PathBuf),
}

impl Settings {
    /// Reads settings from a JSON file. Missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Applies one update, clamping numeric values into their allowed range.
    pub fn apply(&mut self, update: SettingUpdate) {
        match update {
            SettingUpdate::EpisodeDuration(v) => self.session.episode_duration = v.clamp(5.0, 120.0),
            SettingUpdate::NumEpisodes(v) => self.session.num_episodes = v.clamp(1, 500),
            SettingUpdate::ManualControl(v) => self.session.manual_control = v,
            SettingUpdate::TrainingMode(v) => self.session.training_mode = v,
            SettingUpdate::LearningRate(v) => self.learning.learning_rate = v.clamp(0.01, 1.0),
            SettingUpdate::DiscountFactor(v) => self.learning.discount_factor = v.clamp(0.5, 1.0),
            SettingUpdate::ExplorationRate(v) => self.learning.exploration_rate = v.clamp(0.0, 1.0),
            SettingUpdate::ExplorationDecay(v) => {
                self.learning.exploration_decay = v.clamp(0.90, 1.0);
            }
            SettingUpdate::MinExplorationRate(v) => {
                self.learning.min_exploration_rate = v.clamp(0.0, 0.5);
            }
            SettingUpdate::MaxSpeed(v) => self.car.max_speed = v.clamp(0.1, 5.0),
            SettingUpdate::Acceleration(v) => self.car.acceleration = v.clamp(0.01, 1.0),
            SettingUpdate::Deceleration(v) => self.car.deceleration = v.clamp(0.80, 1.0),
            SettingUpdate::RotationSpeed(v) => self.car.rotation_speed = v.clamp(1.0, 20.0),
            SettingUpdate::QTablePath(p) => self.learning.q_table_path = p,
            SettingUpdate::LogDir(p) => self.session.log_dir = p,
        }
    }

    /// Flips manual control; used by the frontend's toggle key.
    pub fn toggle_manual_control(&mut self) {
        let current = self.session.manual_control;
        self.apply(SettingUpdate::ManualControl(!current));
    }

    /// Duration of one tick in simulated seconds.
    #[must_use]
    pub fn tick_seconds(&self) -> f64 {
        1.0 / f64::from(self.session.fps.max(1))
    }

    /// Episodes to run: a manual session is a single episode.
    #[must_use]
    pub const fn episodes_to_run(&self) -> u32 {
        if self.session.manual_control {
            1
        } else {
            self.session.num_episodes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.car.max_speed, 1.5);
        assert_eq!(s.learning.learning_rate, 0.5);
        assert_eq!(s.session.fps, 240);
        assert_eq!(s.window.width, 900);
        assert_eq!(s.car.collision, CollisionMode::Track);
    }

    #[test]
    fn test_apply_clamps_to_menu_ranges() {
        let mut s = Settings::default();
        s.apply(SettingUpdate::LearningRate(3.0));
        s.apply(SettingUpdate::ExplorationDecay(0.1));
        s.apply(SettingUpdate::NumEpisodes(0));
        assert_eq!(s.learning.learning_rate, 1.0);
        assert_eq!(s.learning.exploration_decay, 0.90);
        assert_eq!(s.session.num_episodes, 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{"car": {"max_speed": 2.0}, "session": {"fps": 60}}"#).unwrap();
        assert_eq!(s.car.max_speed, 2.0);
        assert_eq!(s.car.acceleration, 0.2);
        assert_eq!(s.session.fps, 60);
        assert_eq!(s.learning, LearningSettings::default());
    }

    #[test]
    fn test_manual_session_runs_one_episode() {
        let mut s = Settings::default();
        s.toggle_manual_control();
        assert_eq!(s.episodes_to_run(), 1);
    }
}
