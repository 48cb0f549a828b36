//! Episode loop and session orchestration.
//!
//! Each tick runs, in order: input intake, decision, kinematics (which
//! re-senses), reward, learning (training only), termination check and
//! presentation. The Q-table is written only when a training episode runs
//! to completion, so abandoning an episode discards just its own updates.

use log::{debug, info};

use crate::error::{Error, Result};
use crate::simulation::action::ManualInput;
use crate::simulation::car::Vehicle;
use crate::simulation::checkpoint::CheckpointRegistry;
use crate::simulation::frontend::{Frontend, Intent, Snapshot};
use crate::simulation::learning::{AgentConfig, QLearningAgent};
use crate::simulation::reward::{round1, tick_reward, RoadAdherence, TickSignals};
use crate::simulation::score_log::ScoreLog;
use crate::simulation::settings::Settings;
use crate::simulation::track::Track;

/// Simulated time, advanced one fixed step per tick.
#[derive(Clone, Copy, Debug)]
pub struct SimClock {
    tick: u64,
    dt: f64,
}

impl SimClock {
    #[must_use]
    pub const fn new(dt: f64) -> Self {
        Self { tick: 0, dt }
    }

    #[must_use]
    pub fn now(&self) -> f64 {
        self.tick as f64 * self.dt
    }

    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }
}

/// Why an episode stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeEnd {
    TimeUp,
    Collision,
    Restart,
    EndSession,
    Closed,
}

impl EpisodeEnd {
    /// Time-up and collision are the only natural endings; the rest are
    /// user interruptions.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::TimeUp | Self::Collision)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeOutcome {
    pub score: f64,
    pub ticks: u64,
    pub end: EpisodeEnd,
    /// Sum of the road-adherence telemetry over the episode.
    pub road_adherence: f64,
    /// Sum of checkpoint bonuses over the episode.
    pub checkpoint_bonus: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSummary {
    /// Scores of completed episodes, in order.
    pub scores: Vec<f64>,
    pub final_exploration_rate: f64,
    pub interrupted_by: Option<EpisodeEnd>,
}

/// One training or evaluation session on one track.
pub struct Session {
    track: Track,
    car: Vehicle,
    agent: QLearningAgent,
    checkpoints: CheckpointRegistry,
    settings: Settings,
    score_log: ScoreLog,
    /// Simulated seconds since the session began; checkpoint cooldowns
    /// span episodes so they run on this clock.
    session_time: f64,
}

impl Session {
    /// Builds the car and agent and loads any saved Q-table.
    ///
    /// In evaluation mode a missing Q-table is `MissingQTable`; in training
    /// mode it is a cold start.
    pub fn new(track: Track, settings: Settings, seed: Option<u64>) -> Result<Self> {
        let car = Vehicle::new(&track, &settings.car)?;
        let config = AgentConfig::from(&settings.learning);
        let mut agent = match seed {
            Some(seed) => QLearningAgent::with_seed(config, seed),
            None => QLearningAgent::new(config),
        };

        let q_path = settings.learning.q_table_path.clone();
        let loaded = agent.load(&q_path)?;
        if settings.session.training_mode {
            if loaded {
                info!("Training mode: Q-table loaded from {}", q_path.display());
            } else {
                info!("Training mode: no previous Q-table found, starting fresh");
            }
        } else if loaded {
            info!("Evaluation mode: using saved Q-table from {}", q_path.display());
        } else {
            return Err(Error::MissingQTable(q_path));
        }

        let score_log = ScoreLog::for_q_table(&settings.session.log_dir, &q_path)?;
        Ok(Self {
            track,
            car,
            agent,
            checkpoints: CheckpointRegistry::new(),
            settings,
            score_log,
            session_time: 0.0,
        })
    }

    #[must_use]
    pub const fn car(&self) -> &Vehicle {
        &self.car
    }

    #[must_use]
    pub const fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    #[must_use]
    pub const fn track(&self) -> &Track {
        &self.track
    }

    #[must_use]
    pub const fn score_log(&self) -> &ScoreLog {
        &self.score_log
    }

    /// Runs episodes until the configured count completes or the user stops.
    pub fn run<F: Frontend>(&mut self, frontend: &mut F) -> Result<SessionSummary> {
        let total = self.settings.episodes_to_run();
        let mut summary = SessionSummary::default();
        let mut episode = 0;

        while episode < total {
            info!("Starting episode {}/{}", episode + 1, total);
            let outcome = self.run_episode(episode, total, frontend)?;

            match outcome.end {
                EpisodeEnd::Closed => {
                    info!("Window closed, ending session");
                    summary.interrupted_by = Some(outcome.end);
                    break;
                }
                EpisodeEnd::EndSession => {
                    info!("Simulation ended by user");
                    summary.interrupted_by = Some(outcome.end);
                    break;
                }
                EpisodeEnd::Restart => {
                    info!("Restarting episode by user request");
                    continue;
                }
                EpisodeEnd::TimeUp | EpisodeEnd::Collision => {}
            }

            let training = self.settings.session.training_mode;
            if training && !self.settings.session.manual_control {
                self.agent.save(&self.settings.learning.q_table_path)?;
                self.score_log.append(outcome.score)?;
            }

            let mode = if training { "Training" } else { "Evaluation" };
            info!("{mode} episode {} completed. Score: {:?}", episode + 1, outcome.score);
            debug!(
                "episode {} ended by {:?} after {} ticks, exploration rate {:.4}, road adherence {:.1}, checkpoints {:.1}",
                episode + 1,
                outcome.end,
                outcome.ticks,
                self.agent.exploration_rate(),
                outcome.road_adherence,
                outcome.checkpoint_bonus
            );
            summary.scores.push(outcome.score);
            episode += 1;
        }

        summary.final_exploration_rate = self.agent.exploration_rate();
        Ok(summary)
    }

    /// Resets the car and ticks until the episode ends.
    pub fn run_episode<F: Frontend>(
        &mut self,
        episode: u32,
        total_episodes: u32,
        frontend: &mut F,
    ) -> Result<EpisodeOutcome> {
        self.car.reset(&self.track);
        let mut clock = SimClock::new(self.settings.tick_seconds());
        let mut adherence = RoadAdherence::new(clock.now());
        let mut outcome = EpisodeOutcome {
            score: 0.0,
            ticks: 0,
            end: EpisodeEnd::TimeUp,
            road_adherence: 0.0,
            checkpoint_bonus: 0.0,
        };

        let end = loop {
            let input = match frontend.poll(&mut self.settings)? {
                Intent::Continue(input) => input,
                Intent::EndSession => break EpisodeEnd::EndSession,
                Intent::RestartEpisode => break EpisodeEnd::Restart,
                Intent::Close => break EpisodeEnd::Closed,
            };

            let now = clock.now();
            let time_left = (self.settings.session.episode_duration - now).max(0.0);
            if time_left <= 0.0 {
                break EpisodeEnd::TimeUp;
            }

            let signals = self.step(input, now, &mut adherence);
            outcome.road_adherence += signals.road_adherence;
            outcome.checkpoint_bonus += signals.checkpoint_bonus;
            clock.advance();
            self.session_time += self.settings.tick_seconds();

            if self.car.collided {
                break EpisodeEnd::Collision;
            }

            let mut snapshot = Snapshot::capture(&self.car, &self.track);
            snapshot.time_left = time_left;
            snapshot.episode = episode;
            snapshot.total_episodes = total_episodes;
            snapshot.exploration_rate = self.agent.exploration_rate();
            snapshot.manual_control = self.settings.session.manual_control;
            snapshot.training = self.settings.session.training_mode;
            frontend.present(&snapshot, &self.track)?;
        };

        outcome.end = end;
        outcome.score = self.car.score;
        outcome.ticks = clock.ticks();
        Ok(outcome)
    }

    /// One tick of decide, act, reward and learn. `now` is the episode time;
    /// the returned signals are telemetry.
    pub fn step(&mut self, input: ManualInput, now: f64, adherence: &mut RoadAdherence) -> TickSignals {
        let training = self.settings.session.training_mode;

        if self.settings.session.manual_control {
            self.car.apply_manual(input, &self.track);
            let reward = tick_reward(&self.car);
            self.car.add_score(reward);
        } else {
            let state = self.car.state();
            let action = self.agent.select_action(state, training);
            self.car.apply(action, &self.track);
            let reward = tick_reward(&self.car);
            self.car.add_score(reward);
            let next_state = self.car.state();
            if training {
                self.agent.update(state, action, round1(reward), next_state);
                self.agent.decay_exploration();
            }
        }

        let status = self.car.road_status(self.car.x, self.car.y, &self.track);
        let road_adherence = adherence.sample(status, now);
        let checkpoint_bonus = self.checkpoints.check(
            &self.track,
            self.car.x,
            self.car.y,
            self.session_time,
            &mut self.car.last_checkpoint,
        );

        TickSignals {
            road_adherence,
            checkpoint_bonus,
        }
    }
}
