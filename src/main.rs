#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use racetrack_rl::simulation::frontend::Headless;
use racetrack_rl::simulation::settings::{SettingUpdate, Settings};
use racetrack_rl::simulation::{Session, Track};
use racetrack_rl::ui::TerminalFrontend;
use racetrack_rl::Error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Track image (black road, grey checkpoints, yellow start)
    #[arg(short, long)]
    track: PathBuf,

    /// JSON settings file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Q-table file to load and save
    #[arg(long)]
    q_table: Option<PathBuf>,

    /// Directory for the score log
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Run the saved policy greedily without learning
    #[arg(long)]
    evaluate: bool,

    /// Number of episodes
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Episode length in simulated seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Drive with the arrow keys instead of the agent
    #[arg(long)]
    manual: bool,

    /// Run without the terminal UI, as fast as possible
    #[arg(long)]
    headless: bool,

    /// Seed for the exploration RNG
    #[arg(long)]
    seed: Option<u64>,
}

fn build_settings(args: &Args) -> Result<Settings, Error> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(path) = &args.q_table {
        settings.apply(SettingUpdate::QTablePath(path.clone()));
    }
    if let Some(dir) = &args.log_dir {
        settings.apply(SettingUpdate::LogDir(dir.clone()));
    }
    if let Some(n) = args.episodes {
        settings.apply(SettingUpdate::NumEpisodes(n));
    }
    if let Some(d) = args.duration {
        settings.apply(SettingUpdate::EpisodeDuration(d));
    }
    if args.evaluate {
        settings.apply(SettingUpdate::TrainingMode(false));
    }
    if args.manual {
        settings.apply(SettingUpdate::ManualControl(true));
    }
    Ok(settings)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The terminal UI owns the screen, so keep stderr quiet unless asked.
    let default_filter = if args.headless { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let settings = build_settings(&args)?;
    log::info!("Starting simulation with track: {}", args.track.display());
    let track = Track::load(&args.track, settings.window.width, settings.window.height)?;

    let fps = settings.session.fps;
    let mut session = match Session::new(track, settings, args.seed) {
        Ok(session) => session,
        Err(Error::MissingQTable(path)) => {
            log::warn!("No Q-table found for evaluation mode at {}", path.display());
            eprintln!("Warning: no Q-table found for evaluation mode ({})", path.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let summary = if args.headless {
        session.run(&mut Headless)?
    } else {
        let mut frontend = TerminalFrontend::new(fps)?;
        let res = session.run(&mut frontend);
        frontend.restore()?;
        res?
    };

    let best = summary.scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    println!(
        "Completed {} episode(s); best score {}; exploration rate {:.4}",
        summary.scores.len(),
        if summary.scores.is_empty() { "n/a".to_string() } else { format!("{best:.1}") },
        summary.final_exploration_rate
    );
    if let Some(end) = summary.interrupted_by {
        println!("Session interrupted: {end:?}");
    }
    Ok(())
}
