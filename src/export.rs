use chrono::Local;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::session::Session;
use crate::stats::{format_median, SessionStats};
use crate::store::StoreError;

/// One line of the results log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub date: String,
    pub mode: String,
    pub end_option: String,
    pub skip_mode: bool,
    pub darts_thrown: usize,
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: String,
    pub median_darts_per_round: String,
    pub skipped: usize,
}

impl ResultRecord {
    pub fn from_session(session: &Session) -> Self {
        let stats = SessionStats::from_session(session);
        let config = session.config();
        Self {
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            mode: config.mode.to_string(),
            end_option: config.end_option.to_string(),
            skip_mode: config.skip_mode,
            darts_thrown: stats.darts_thrown,
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate.to_string(),
            median_darts_per_round: format_median(stats.median_round_length),
            skipped: stats.skipped.len(),
        }
    }
}

/// Append-only CSV log of finished sessions
#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new() -> Option<Self> {
        AppDirs::results_path().map(Self::with_path)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &ResultRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_all(&self) -> Result<Vec<csv::StringRecord>, StoreError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
