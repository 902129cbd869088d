use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::session::SessionConfig;
use crate::store::{KeyValueStore, StoreError};
use crate::targets::{EndOption, GameMode};

/// Entries kept per leaderboard
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "username")]
    pub name: String,
    #[serde(rename = "darts")]
    pub darts_thrown: usize,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, darts_thrown: usize) -> Self {
        Self {
            name: name.into(),
            darts_thrown,
        }
    }
}

/// Which leaderboard a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeaderboardKey {
    pub mode: GameMode,
    pub end_option: EndOption,
    pub skip_mode: bool,
}

impl LeaderboardKey {
    pub fn new(mode: GameMode, end_option: EndOption, skip_mode: bool) -> Self {
        Self {
            mode,
            end_option,
            skip_mode,
        }
    }

    /// Storage key, e.g. `leaderboard_singles_skip_bull`
    pub fn storage_key(&self) -> String {
        let skip = if self.skip_mode { "_skip" } else { "" };
        format!("leaderboard_{}{}_{}", self.mode, skip, self.end_option)
    }
}

impl From<&SessionConfig> for LeaderboardKey {
    fn from(config: &SessionConfig) -> Self {
        Self::new(config.mode, config.end_option, config.skip_mode)
    }
}

impl fmt::Display for LeaderboardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// Insert `entry`, keep ascending by darts thrown, cap at `MAX_ENTRIES`.
/// Equal scores keep their arrival order.
pub fn rank(mut entries: Vec<LeaderboardEntry>, entry: LeaderboardEntry) -> Vec<LeaderboardEntry> {
    entries.push(entry);
    entries.sort_by_key(|e| e.darts_thrown);
    entries.truncate(MAX_ENTRIES);
    entries
}

/// Best-of-ten results per game configuration
#[derive(Debug)]
pub struct Leaderboard<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Leaderboard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored entries, or empty when nothing (readable) is stored
    pub fn load(&self, key: LeaderboardKey) -> Vec<LeaderboardEntry> {
        match self.try_load(key) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key = %key, error = %e, "leaderboard unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    fn try_load(&self, key: LeaderboardKey) -> Result<Vec<LeaderboardEntry>, StoreError> {
        match self.store.get(&key.storage_key())? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Add a result and persist the updated board
    pub fn submit(
        &mut self,
        name: &str,
        darts_thrown: usize,
        key: LeaderboardKey,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let updated = rank(self.load(key), LeaderboardEntry::new(name, darts_thrown));
        let raw = serde_json::to_string(&updated)?;
        self.store.set(&key.storage_key(), &raw)?;
        debug!(key = %key, name, darts_thrown, "leaderboard updated");
        Ok(updated)
    }
}
