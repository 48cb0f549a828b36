use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::simulation::frontend::Snapshot;
use crate::simulation::params::SENSOR_COUNT;

const CAR: char = 'O';
const SENSOR_HIT: char = '*';

/// Maps a track pixel to a `(row, col)` in a grid of the given size.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn world_to_grid_coords(
    x: f64,
    y: f64,
    world_width: f64,
    world_height: f64,
    rows: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    if rows == 0 || cols == 0 || x < 0.0 || y < 0.0 || x >= world_width || y >= world_height {
        return None;
    }
    let r = (y / world_height * rows as f64) as usize;
    let c = (x / world_width * cols as f64) as usize;
    Some((r.min(rows - 1), c.min(cols - 1)))
}

fn put(grid: &mut [String], r: usize, c: usize, ch: char) {
    if let Some(line) = grid.get_mut(r) {
        if c < line.len() && line.is_char_boundary(c) && line.is_char_boundary(c + 1) {
            line.replace_range(c..=c, ch.encode_utf8(&mut [0; 4]));
        }
    }
}

/// Draws sensor wall hits and the car over a precomputed track grid.
pub fn overlay_car(
    grid: &mut [String],
    snapshot: &Snapshot,
    world_width: f64,
    world_height: f64,
) {
    let rows = grid.len();
    let cols = grid.first().map_or(0, String::len);

    for i in 0..SENSOR_COUNT {
        let distance = snapshot.sensor_distances[i];
        if distance <= 0.0 {
            continue;
        }
        let rad = (snapshot.heading + snapshot.sensor_offsets[i]).to_radians();
        let hx = snapshot.x + distance * rad.cos();
        let hy = snapshot.y - distance * rad.sin();
        if let Some((r, c)) = world_to_grid_coords(hx, hy, world_width, world_height, rows, cols) {
            put(grid, r, c, SENSOR_HIT);
        }
    }

    if let Some((r, c)) =
        world_to_grid_coords(snapshot.x, snapshot.y, world_width, world_height, rows, cols)
    {
        put(grid, r, c, CAR);
    }
}

/// HUD text: score/time/speed on the first line, sensors on the second.
#[must_use]
pub fn hud_lines(snapshot: &Snapshot) -> [String; 2] {
    let mode = match (snapshot.manual_control, snapshot.training) {
        (true, _) => "Manual",
        (false, true) => "Training",
        (false, false) => "Evaluation",
    };
    let status = format!(
        "{mode} {}/{} | Score: {:.1} | Time: {:.1} | Speed: {:.1} | Heading: {:.0} | Eps: {:.3} | {:?}",
        snapshot.episode + 1,
        snapshot.total_episodes,
        snapshot.score,
        snapshot.time_left,
        snapshot.speed,
        snapshot.heading,
        snapshot.exploration_rate,
        snapshot.road_status,
    );
    let sensors: Vec<String> = snapshot
        .sensor_distances
        .iter()
        .enumerate()
        .map(|(i, d)| format!("S{}: {d:.0}", i + 1))
        .collect();
    let help = "[E] end  [R] restart  [M] manual  [Q] quit";
    [status, format!("{} | {help}", sensors.join(" "))]
}

pub fn draw_ui(f: &mut Frame, grid_lines: Vec<String>, hud: &[String; 2]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // HUD
            Constraint::Min(0),    // Track
        ])
        .split(f.area());

    let hud_text: Vec<Line> = hud
        .iter()
        .map(|s| Line::from(Span::styled(s.as_str(), Style::default().add_modifier(Modifier::REVERSED))))
        .collect();
    f.render_widget(Paragraph::new(hud_text), chunks[0]);

    let text: Vec<Line> = grid_lines
        .into_iter()
        .map(|s| Line::from(Span::raw(s)))
        .collect();

    let field = Paragraph::new(text)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    f.render_widget(field, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_grid_coords_bounds() {
        assert_eq!(world_to_grid_coords(0.0, 0.0, 900.0, 600.0, 30, 90), Some((0, 0)));
        assert_eq!(world_to_grid_coords(899.9, 599.9, 900.0, 600.0, 30, 90), Some((29, 89)));
        assert_eq!(world_to_grid_coords(-1.0, 0.0, 900.0, 600.0, 30, 90), None);
        assert_eq!(world_to_grid_coords(10.0, 10.0, 900.0, 600.0, 0, 90), None);
    }
}
