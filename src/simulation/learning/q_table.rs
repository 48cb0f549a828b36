//! Tabular action-value store with JSON persistence.
//!
//! On disk the table is a JSON object whose keys are the literal tuple text
//! of a state, e.g. `"(3, -2, 10, 20, 20, 5, 10, 8, 8)"`, and whose values
//! are the action values in [`Action`] order.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::simulation::action::Action;
use crate::simulation::car::State;
use crate::simulation::params::{ACTION_COUNT, STATE_LEN};

/// Action values of one state, indexed by [`Action::index`].
pub type ActionValues = [f64; ACTION_COUNT];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QTable {
    entries: HashMap<State, ActionValues>,
}

impl QTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only lookup; does not materialize missing states.
    #[must_use]
    pub fn get(&self, state: &State) -> Option<&ActionValues> {
        self.entries.get(state)
    }

    /// Returns the row for `state`, inserting a zero row if it is unseen.
    pub fn get_or_insert_default(&mut self, state: State) -> &mut ActionValues {
        self.entries.entry(state).or_insert([0.0; ACTION_COUNT])
    }

    pub fn insert(&mut self, state: State, values: ActionValues) {
        self.entries.insert(state, values);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&State, &ActionValues)> {
        self.entries.iter()
    }

    /// Largest action value of `state` (0 for an unseen state, which is
    /// materialized).
    pub fn max_value(&mut self, state: State) -> f64 {
        self.get_or_insert_default(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action for `state`; ties go to the lowest index.
    pub fn best_action(&mut self, state: State) -> Action {
        let row = self.get_or_insert_default(state);
        let mut best = 0;
        for (i, value) in row.iter().enumerate().skip(1) {
            if *value > row[best] {
                best = i;
            }
        }
        Action::ALL[best]
    }

    /// Writes the table as JSON, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let sorted: BTreeMap<String, Vec<f64>> = self
            .entries
            .iter()
            .map(|(state, values)| (encode_key(state), values.to_vec()))
            .collect();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &sorted)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a table saved by [`QTable::save`].
    ///
    /// Returns `Ok(None)` when the file does not exist (cold start). Any
    /// malformed entry fails the whole load with `CorruptState`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let raw: HashMap<String, Vec<f64>> = serde_json::from_reader(BufReader::new(file))?;

        let mut table = Self::new();
        for (key, values) in raw {
            let state = parse_key(&key)?;
            let values: ActionValues = values.try_into().map_err(|v: Vec<f64>| {
                Error::CorruptState {
                    key: key.clone(),
                    reason: format!("expected {ACTION_COUNT} action values, got {}", v.len()),
                }
            })?;
            table.insert(state, values);
        }
        Ok(Some(table))
    }
}

/// Formats a state as tuple text: `(a, b, c)`.
#[must_use]
pub fn encode_key(state: &State) -> String {
    let parts: Vec<String> = state.iter().map(ToString::to_string).collect();
    format!("({})", parts.join(", "))
}

/// Parses tuple text back into a state.
pub fn parse_key(key: &str) -> Result<State> {
    let corrupt = |reason: String| Error::CorruptState {
        key: key.to_string(),
        reason,
    };

    let inner = key
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| corrupt("not a parenthesized tuple".to_string()))?;

    // A single trailing comma is valid tuple text; any other gap is not.
    let inner = inner.trim();
    let inner = inner.strip_suffix(',').unwrap_or(inner);

    let mut state = [0; STATE_LEN];
    let mut count = 0;
    for part in inner.split(',').map(str::trim) {
        if part.is_empty() {
            return Err(corrupt(format!("empty element at position {count}")));
        }
        if count == STATE_LEN {
            return Err(corrupt(format!("more than {STATE_LEN} elements")));
        }
        state[count] = part
            .parse()
            .map_err(|e| corrupt(format!("element {part:?}: {e}")))?;
        count += 1;
    }
    if count != STATE_LEN {
        return Err(corrupt(format!("expected {STATE_LEN} elements, got {count}")));
    }
    Ok(state)
}
