//! Simulation constants.

/// Number of ray sensors mounted on the car.
pub const SENSOR_COUNT: usize = 8;
/// Sensor mounting table: (angle offset in degrees, ray length in pixels).
///
/// Order matters: the lateral-clearance reward reads indices 0, 1, 3, 4 and
/// the state tuple lays sensors out in this order.
pub const SENSOR_SPECS: [(f64, f64); SENSOR_COUNT] = [
    (-135.0, 100.0), // back-left
    (-90.0, 100.0),  // left
    (-45.0, 150.0),  // front-left
    (0.0, 200.0),    // front
    (45.0, 150.0),   // front-right
    (90.0, 100.0),   // right
    (135.0, 100.0),  // back-right
    (180.0, 80.0),   // back
];
/// Sensors consulted by the lateral-clearance reward.
pub const LATERAL_SENSORS: [usize; 4] = [0, 1, 3, 4];

/// Number of discrete actions.
pub const ACTION_COUNT: usize = 4;
/// Length of the discrete observation: speed bucket plus one bucket per sensor.
pub const STATE_LEN: usize = SENSOR_COUNT + 1;
/// Sensor distances are bucketed by this many pixels.
pub const SENSOR_BUCKET: f64 = 10.0;

/// Divisor turning speed into the speed reward component.
pub const SPEED_REWARD_DIVISOR: f64 = 6.0;
/// Divisor turning clearance in pixels into the clearance component.
pub const CLEARANCE_REWARD_DIVISOR: f64 = 100.0;
pub const COLLISION_PENALTY: f64 = 25.0;

pub const ROAD_CHECK_INTERVAL: f64 = 0.25; // simulated seconds
pub const ROAD_REWARD_ON: f64 = 0.5;
pub const ROAD_REWARD_PARTIAL: f64 = -0.5;
pub const ROAD_REWARD_OFF: f64 = -1.0;

pub const CHECKPOINT_RADIUS: i64 = 2;
pub const CHECKPOINT_COOLDOWN: f64 = 2.0; // simulated seconds
pub const CHECKPOINT_BONUS: f64 = 10.0;

/// Palette used by track images.
pub const ROAD_COLOUR: [u8; 3] = [0, 0, 0];
pub const CHECKPOINT_COLOUR: [u8; 3] = [128, 128, 128];
pub const START_COLOUR: [u8; 3] = [255, 255, 0];
