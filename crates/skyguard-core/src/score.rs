//! Run statistics, score formula and the best-run record.

use serde::{Deserialize, Serialize};

use crate::constants::{SCORE_PER_KILL, SCORE_PER_LEAK, SCORE_PER_WAVE};

/// Counters for one session. Reset when a new session starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Wall clock at session start (unix ms).
    pub started_at: u64,
    pub kills: u32,
    pub leaks: u32,
    pub waves_completed: u32,
    pub reward: u32,
}

/// Best results across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    pub best_score: u32,
    pub best_waves: u32,
    pub best_kills: u32,
    /// Unix seconds of the last best-score change; 0 if never.
    pub updated_at: u64,
}

/// Outcome of merging a finished run into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    pub record: Record,
    pub score: u32,
    pub new_best_score: bool,
    pub changed: bool,
}

/// `max(0, round(waves*1000 + kills*40 - leaks*120))`.
pub fn compute_score(run: &RunStats) -> u32 {
    let raw = f64::from(run.waves_completed) * SCORE_PER_WAVE + f64::from(run.kills) * SCORE_PER_KILL
        - f64::from(run.leaks) * SCORE_PER_LEAK;
    raw.round().max(0.0) as u32
}

/// Merge `run` into `prev`. Best score only moves on a strictly greater
/// score; best waves and kills always take the max.
pub fn merge_record(prev: Record, run: &RunStats, now_secs: u64) -> RecordUpdate {
    let score = compute_score(run);
    let mut record = prev;
    let new_best_score = score > prev.best_score;
    if new_best_score {
        record.best_score = score;
        record.updated_at = now_secs;
    }
    record.best_waves = record.best_waves.max(run.waves_completed);
    record.best_kills = record.best_kills.max(run.kills);
    RecordUpdate {
        record,
        score,
        new_best_score,
        changed: record != prev,
    }
}
