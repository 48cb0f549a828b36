use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::simulation::action::Action;
use crate::simulation::car::State;
use crate::simulation::learning::q_table::{ActionValues, QTable};
use crate::simulation::settings::LearningSettings;

/// Hyperparameters of the learner. Only `exploration_rate` changes during a
/// run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub exploration_rate: f64,
    pub exploration_decay: f64,
    pub min_exploration_rate: f64,
}

impl From<&LearningSettings> for AgentConfig {
    fn from(settings: &LearningSettings) -> Self {
        Self {
            learning_rate: settings.learning_rate,
            discount_factor: settings.discount_factor,
            exploration_rate: settings.exploration_rate,
            exploration_decay: settings.exploration_decay,
            min_exploration_rate: settings.min_exploration_rate,
        }
    }
}

/// Epsilon-greedy tabular Q-learning agent.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    config: AgentConfig,
    q_table: QTable,
    rng: StdRng,
}

impl QLearningAgent {
    /// Creates an agent with an empty table and an OS-seeded RNG.
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates an agent whose exploration is reproducible.
    #[must_use]
    pub fn with_seed(config: AgentConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: AgentConfig, rng: StdRng) -> Self {
        Self {
            config,
            q_table: QTable::new(),
            rng,
        }
    }

    #[must_use]
    pub const fn exploration_rate(&self) -> f64 {
        self.config.exploration_rate
    }

    #[must_use]
    pub const fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    /// Action values of `state`, materializing a zero row if unseen.
    pub fn q_values(&mut self, state: State) -> ActionValues {
        *self.q_table.get_or_insert_default(state)
    }

    /// Epsilon-greedy when `explore` is set, greedy otherwise.
    pub fn select_action(&mut self, state: State, explore: bool) -> Action {
        if explore && self.rng.random::<f64>() < self.config.exploration_rate {
            return Action::ALL[self.rng.random_range(0..Action::ALL.len())];
        }
        self.q_table.best_action(state)
    }

    /// Bellman update:
    /// `Q[s][a] += α · (r + γ · max Q[s'] − Q[s][a])`.
    pub fn update(&mut self, state: State, action: Action, reward: f64, next_state: State) {
        let max_next = self.q_table.max_value(next_state);
        let AgentConfig {
            learning_rate: alpha,
            discount_factor: gamma,
            ..
        } = self.config;
        let q = &mut self.q_table.get_or_insert_default(state)[action.index()];
        *q += alpha * (reward + gamma * max_next - *q);
    }

    /// Multiplies the exploration rate by the decay, never going below the
    /// minimum.
    pub fn decay_exploration(&mut self) {
        self.config.exploration_rate = self
            .config
            .min_exploration_rate
            .max(self.config.exploration_rate * self.config.exploration_decay);
    }

    /// Replaces the table with the one stored at `path`.
    ///
    /// Returns `false` (and keeps the current table) when there is no file.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<bool> {
        match QTable::load(path)? {
            Some(table) => {
                self.q_table = table;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.q_table.save(path)
    }
}
