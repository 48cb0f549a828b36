//! Terminal presentation: a downsampled track, the car, its sensor hits and
//! a HUD, drawn from read-only snapshots.

pub mod field;
pub mod render;
pub mod terminal;

pub use terminal::TerminalFrontend;
