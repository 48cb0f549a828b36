mod common;

use common::{assert_float_eq, grass_track, strip_track};
use racetrack_rl::simulation::action::{Action, ManualInput, Steer};
use racetrack_rl::simulation::car::{normalize_heading, RoadStatus, Vehicle};
use racetrack_rl::simulation::reward::tick_reward;
use racetrack_rl::simulation::settings::{CarSettings, CollisionMode};
use racetrack_rl::simulation::track::{Cell, Track};
use racetrack_rl::Error;

fn car_on_strip() -> (Track, Vehicle) {
    let track = strip_track();
    let car = Vehicle::new(&track, &CarSettings::default()).unwrap();
    (track, car)
}

#[test]
fn test_vehicle_spawns_on_start() {
    let (_, car) = car_on_strip();
    assert_float_eq(car.x, 30.0, "x");
    assert_float_eq(car.y, 50.0, "y");
    assert_float_eq(car.heading, 0.0, "heading");
    assert_eq!(car.speed, 0.0);
    assert_eq!(car.score, 0.0);
    assert!(!car.collided);
    assert!(car.last_checkpoint.is_none());
}

#[test]
fn test_vehicle_without_start_fails() {
    let track = grass_track(50, 50);
    assert!(matches!(
        Vehicle::new(&track, &CarSettings::default()),
        Err(Error::NoStartFound)
    ));
}

#[test]
fn test_initial_state_encoding() {
    let (_, car) = car_on_strip();
    // Diagonals leave the band after 29 px, left after 20, right after 21,
    // front sees 200 px of road, back runs off the image and reports its
    // full 80 px.
    assert_eq!(car.state(), [0, 2, 2, 2, 20, 2, 2, 2, 8]);
}

#[test]
fn test_rotation_needs_speed() {
    let (track, mut car) = car_on_strip();
    car.apply(Action::RotateLeft, &track);
    assert_float_eq(car.heading, 0.0, "no turn at rest");
    car.rotate(-45.0);
    assert_float_eq(car.heading, 0.0, "no turn at rest");
}

#[test]
fn test_rotation_scales_with_speed() {
    let (_, mut car) = car_on_strip();
    car.speed = 1.5;
    car.rotate(5.0);
    assert_float_eq(car.heading, 5.0, "full speed turn");
    car.speed = 0.75;
    car.rotate(-20.0);
    assert_float_eq(car.heading, 355.0, "half speed turn wraps");
}

#[test]
fn test_accelerate_is_capped() {
    let (_, mut car) = car_on_strip();
    car.accelerate();
    assert_float_eq(car.speed, 0.2, "one step");
    for _ in 0..20 {
        car.accelerate();
    }
    assert_float_eq(car.speed, 1.5, "capped at max speed");
}

#[test]
fn test_decelerate_is_multiplicative() {
    let (_, mut car) = car_on_strip();
    car.speed = 1.0;
    car.decelerate();
    assert_float_eq(car.speed, 0.95, "one decay");
    car.decelerate();
    assert_float_eq(car.speed, 0.9025, "two decays");
    assert!(car.speed > 0.0);
}

#[test]
fn test_move_forward_euler_screen_coords() {
    let (track, mut car) = car_on_strip();
    car.x = 200.0;
    car.speed = 1.0;
    car.heading = 90.0;
    car.update(&track);
    // Heading 90 points up the screen.
    assert_float_eq(car.x, 200.0, "x unchanged");
    assert_float_eq(car.y, 49.0, "y decreases");
}

#[test]
fn test_partially_off_lowers_cap_but_moves() {
    let (track, mut car) = car_on_strip();
    car.x = 200.0;
    car.y = 32.0;
    car.speed = 1.5;
    car.update(&track);
    assert_eq!(car.road_status(car.x, car.y, &track), RoadStatus::PartiallyOff);
    assert_float_eq(car.current_max_speed(), 0.2, "partial cap");
    assert_float_eq(car.speed, 0.2, "clamped");
    assert_float_eq(car.x, 201.5, "moved with pre-clamp speed");
    assert!(!car.collided);
}

#[test]
fn test_fully_off_road_collides_after_one_update() {
    let (track, mut car) = car_on_strip();
    car.x = 200.0;
    car.y = 10.0;
    car.update(&track);
    assert!(car.collided);
    assert_float_eq(car.current_max_speed(), 0.1, "off-road cap");
}

#[test]
fn test_window_collision_mode() {
    let track = strip_track();
    let params = CarSettings {
        collision: CollisionMode::Window,
        ..CarSettings::default()
    };
    let mut car = Vehicle::new(&track, &params).unwrap();
    car.x = 200.0;
    car.y = 10.0;
    car.update(&track);
    assert!(!car.collided, "off-road but inside window");
    car.x = 5.0;
    car.update(&track);
    assert!(car.collided);
}

#[test]
fn test_road_status_corners() {
    let (track, car) = car_on_strip();
    assert_eq!(car.road_status(200.0, 50.0, &track), RoadStatus::OnRoad);
    assert_eq!(car.road_status(200.0, 10.0, &track), RoadStatus::CompletelyOff);
    assert_eq!(car.road_status(200.0, 68.0, &track), RoadStatus::PartiallyOff);
    let corners = car.corners(100.0, 50.0);
    assert_float_eq(corners[0].0, 87.5, "top-left x");
    assert_float_eq(corners[0].1, 45.0, "top-left y");
    assert_float_eq(corners[2].0, 112.5, "bottom-right x");
    assert_float_eq(corners[2].1, 55.0, "bottom-right y");
}

#[test]
fn test_manual_input() {
    let (track, mut car) = car_on_strip();
    let input = ManualInput {
        throttle: true,
        steer: Some(Steer::Left),
    };
    car.apply_manual(input, &track);
    assert_float_eq(car.speed, 0.2, "throttle accelerates");
    assert!(car.heading > 0.0, "steered left after speeding up");
    car.apply_manual(ManualInput::default(), &track);
    assert_float_eq(car.speed, 0.19, "coasting decelerates");
}

#[test]
fn test_reset_restores_episode_state() {
    let (track, mut car) = car_on_strip();
    car.x = 200.0;
    car.y = 10.0;
    car.speed = 1.0;
    car.score = 12.3;
    car.last_checkpoint = Some((1, 1));
    car.update(&track);
    assert!(car.collided);

    car.reset(&track);
    assert_float_eq(car.x, 30.0, "x");
    assert_float_eq(car.y, 50.0, "y");
    assert_eq!(car.speed, 0.0);
    assert_eq!(car.score, 0.0);
    assert!(!car.collided);
    assert!(car.last_checkpoint.is_none());
    assert_float_eq(car.current_max_speed(), 1.5, "cap restored");
    assert_eq!(car.state(), [0, 2, 2, 2, 20, 2, 2, 2, 8]);
}

#[test]
fn test_tick_reward_and_score() {
    let (track, mut car) = car_on_strip();
    car.x = 200.0;
    car.update_sensors(&track);
    car.speed = 6.0;
    // Speed component 1.0, closest lateral sensor 20 px -> 0.2.
    assert_float_eq(tick_reward(&car), 0.2, "reward");
    car.collided = true;
    assert_float_eq(tick_reward(&car), -24.8, "collision penalty");

    car.add_score(0.1);
    car.add_score(0.1);
    car.add_score(0.1);
    assert_eq!(car.score, 0.3);
}

#[test]
fn test_tick_reward_near_rounding_tie() {
    // Road from the top edge down to row 95: the right-hand sensor sees the
    // verge 45 px away, every other lateral sensor sees further.
    let track = Track::from_fn(400, 200, |x, y| match (x, y) {
        (30, 50) => Cell::Start,
        (29, 50) => Cell::Checkpoint,
        (_, y) if y < 95 => Cell::Road,
        _ => Cell::OffRoad,
    });
    let mut car = Vehicle::new(&track, &CarSettings::default()).unwrap();
    car.x = 200.0;
    car.update_sensors(&track);
    car.speed = 0.6;

    assert_float_eq(car.sensors()[1].distance, 45.0, "right sensor");
    // 0.1 speed component times 0.5 clearance is 0.05, which rounds up.
    assert_eq!(tick_reward(&car), 0.1);
    car.add_score(tick_reward(&car));
    assert_eq!(car.score, 0.1);
}

#[test]
fn test_normalize_heading_examples() {
    assert_eq!(normalize_heading(0.0), 0.0);
    assert_eq!(normalize_heading(360.0), 0.0);
    assert_eq!(normalize_heading(-90.0), 270.0);
    assert_eq!(normalize_heading(725.0), 5.0);
    assert_eq!(normalize_heading(-1e-20), 0.0);
}
