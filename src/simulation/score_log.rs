//! Append-only score log, one line per completed training episode.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Clone, Debug)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    /// Opens (and creates the directory for) a log at `path`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Log paired with a Q-table file: `<log_dir>/<table stem>.txt`.
    pub fn for_q_table(log_dir: &Path, q_table_path: &Path) -> Result<Self> {
        let stem = q_table_path
            .file_stem()
            .map_or_else(|| "training_log".into(), |s| s.to_string_lossy());
        Self::new(log_dir.join(format!("{stem}.txt")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, score: f64) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{score:?}")?;
        Ok(())
    }

    /// Last logged score, or 0.0 when the log is missing, empty or the last
    /// line is not a number.
    #[must_use]
    pub fn last_score(&self) -> f64 {
        let Ok(file) = File::open(&self.path) else {
            return 0.0;
        };
        BufReader::new(file)
            .lines()
            .map_while(std::result::Result::ok)
            .filter(|line| !line.trim().is_empty())
            .last()
            .and_then(|line| line.trim().parse().ok())
            .unwrap_or(0.0)
    }
}
