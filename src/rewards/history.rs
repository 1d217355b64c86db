//! Reward history: a rolling in-memory window plus an append-only JSON-lines log.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::warn, prelude::*};
use serde::Serialize;

use crate::core::SimulationClock;

use super::{
    events::LedgerEntryRecorded,
    ledger::{CreditSource, LedgerEntry},
};

const DEFAULT_REWARD_HISTORY_CAPACITY: usize = 64;

/// Most recent ledger movements, oldest dropped first.
#[derive(Resource, Debug)]
pub struct RewardHistory {
    capacity: usize,
    records: VecDeque<RewardHistoryRecord>,
}

impl RewardHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: RewardHistoryRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn records(&self) -> impl Iterator<Item = &RewardHistoryRecord> {
        self.records.iter()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl Default for RewardHistory {
    fn default() -> Self {
        Self::new(DEFAULT_REWARD_HISTORY_CAPACITY)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RewardHistoryRecord {
    pub occurred_at_seconds: f64,
    pub entry: LedgerEntry,
}

/// Buffered writer for `logs/reward_history.jsonl`.
#[derive(Resource, Debug)]
pub struct RewardHistoryLog {
    output_path: PathBuf,
    pending: Vec<RewardHistoryRecord>,
}

impl RewardHistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, record: RewardHistoryRecord) {
        self.pending.push(record);
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        for record in std::mem::take(&mut self.pending) {
            serde_json::to_writer(&mut file, &SerializableHistoryRecord::from(record))?;
            file.write_all(b"\n")?;
        }

        file.flush()
    }
}

/// Copies every ledger movement into the rolling window and the log buffer.
pub fn record_reward_history(
    clock: Res<SimulationClock>,
    mut entries: MessageReader<LedgerEntryRecorded>,
    mut history: ResMut<RewardHistory>,
    mut log: ResMut<RewardHistoryLog>,
) {
    let now = clock.elapsed().as_secs_f64();
    for message in entries.read() {
        let record = RewardHistoryRecord {
            occurred_at_seconds: now,
            entry: message.entry,
        };
        log.push(record);
        history.push(record);
    }
}

pub fn flush_reward_history_log(mut log: ResMut<RewardHistoryLog>) {
    if let Err(err) = log.flush() {
        warn!(
            target: "rewards",
            "Failed to persist reward history to {:?}: {}",
            log.path(),
            err
        );
    }
}

#[derive(Serialize)]
struct SerializableHistoryRecord {
    occurred_at_seconds: f64,
    #[serde(flatten)]
    entry: SerializableEntry,
}

#[derive(Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
enum SerializableEntry {
    Credit {
        source: CreditSource,
        amount_nanotons: u64,
        amount: String,
        balance_after: String,
    },
    Withdrawal {
        amount_nanotons: u64,
        amount: String,
        balance_after: String,
    },
}

impl From<RewardHistoryRecord> for SerializableHistoryRecord {
    fn from(value: RewardHistoryRecord) -> Self {
        let entry = match value.entry {
            LedgerEntry::Credit {
                source,
                amount,
                balance_after,
            } => SerializableEntry::Credit {
                source,
                amount_nanotons: amount.nanotons(),
                amount: amount.to_string(),
                balance_after: balance_after.to_string(),
            },
            LedgerEntry::Withdrawal {
                amount,
                balance_after,
            } => SerializableEntry::Withdrawal {
                amount_nanotons: amount.nanotons(),
                amount: amount.to_string(),
                balance_after: balance_after.to_string(),
            },
        };
        Self {
            occurred_at_seconds: value.occurred_at_seconds,
            entry,
        }
    }
}
