//! Interactive terminal frontend.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::error::Result;
use crate::simulation::action::{ManualInput, Steer};
use crate::simulation::frontend::{Frontend, Intent, Snapshot};
use crate::simulation::settings::Settings;
use crate::simulation::track::Track;
use crate::ui::field::compute_track_grid;
use crate::ui::render::{draw_ui, hud_lines, overlay_car};

/// Terminals report key presses, not key state, so a press counts as held
/// for this many ticks.
const KEY_HOLD_TICKS: u32 = 24;

/// Draws the track in the terminal and reads the keyboard.
///
/// Keys: `e` ends the session, `r` restarts the episode, `q`/Esc closes,
/// `m` toggles manual control, arrows drive.
pub struct TerminalFrontend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
    last_tick: Instant,
    throttle_ticks: u32,
    steer_ticks: u32,
    steer: Option<Steer>,
    /// Track raster cached per terminal size.
    grid_cache: Option<((usize, usize), Vec<String>)>,
    restored: bool,
}

impl TerminalFrontend {
    /// Switches the terminal to raw mode on the alternate screen.
    pub fn new(fps: u32) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            tick_rate: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            last_tick: Instant::now(),
            throttle_ticks: 0,
            steer_ticks: 0,
            steer: None,
            grid_cache: None,
            restored: false,
        })
    }

    /// Gives the terminal back to the shell.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn held_input(&mut self) -> ManualInput {
        let input = ManualInput {
            throttle: self.throttle_ticks > 0,
            steer: if self.steer_ticks > 0 { self.steer } else { None },
        };
        self.throttle_ticks = self.throttle_ticks.saturating_sub(1);
        self.steer_ticks = self.steer_ticks.saturating_sub(1);
        input
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl Frontend for TerminalFrontend {
    fn poll(&mut self, settings: &mut Settings) -> Result<Intent> {
        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match key.code {
                KeyCode::Char('e') => return Ok(Intent::EndSession),
                KeyCode::Char('r') => return Ok(Intent::RestartEpisode),
                KeyCode::Char('q') | KeyCode::Esc => return Ok(Intent::Close),
                KeyCode::Char('m') => settings.toggle_manual_control(),
                KeyCode::Up => self.throttle_ticks = KEY_HOLD_TICKS,
                KeyCode::Left => {
                    self.steer = Some(Steer::Left);
                    self.steer_ticks = KEY_HOLD_TICKS;
                }
                KeyCode::Right => {
                    self.steer = Some(Steer::Right);
                    self.steer_ticks = KEY_HOLD_TICKS;
                }
                _ => {}
            }
        }
        Ok(Intent::Continue(self.held_input()))
    }

    fn present(&mut self, snapshot: &Snapshot, track: &Track) -> Result<()> {
        let world_w = f64::from(track.width());
        let world_h = f64::from(track.height());
        let cache = &mut self.grid_cache;

        self.terminal.draw(|f| {
            let area = f.area();
            let rows = area.height.saturating_sub(2) as usize; // -2 for HUD
            let cols = area.width as usize;

            let fresh = matches!(cache, Some((size, _)) if *size == (rows, cols));
            if !fresh {
                *cache = Some(((rows, cols), compute_track_grid(track, rows, cols)));
            }
            let mut grid = cache.as_ref().map(|(_, g)| g.clone()).unwrap_or_default();
            overlay_car(&mut grid, snapshot, world_w, world_h);
            draw_ui(f, grid, &hud_lines(snapshot));
        })?;

        // Frame pacing
        let timeout = self
            .tick_rate
            .checked_sub(self.last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if !timeout.is_zero() {
            event::poll(timeout)?;
        }
        self.last_tick = Instant::now();
        Ok(())
    }
}
