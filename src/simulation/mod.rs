pub mod action;
pub mod car;
pub mod checkpoint;
pub mod frontend;
pub mod learning;
pub mod params;
pub mod reward;
pub mod score_log;
pub mod sensor;
pub mod session;
pub mod settings;
pub mod track;

pub use action::Action;
pub use car::{RoadStatus, State, Vehicle};
pub use session::Session;
pub use track::{Cell, Track};
