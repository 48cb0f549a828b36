//! Tabular Q-learning.
//!
//! This module provides:
//! - The lazily-populated action-value table and its JSON store
//! - The epsilon-greedy agent with Bellman updates and exploration decay

mod agent;
mod q_table;

pub use agent::{AgentConfig, QLearningAgent};
pub use q_table::{encode_key, parse_key, ActionValues, QTable};
