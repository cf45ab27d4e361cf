//! Per-wave bookkeeping.

use skyguard_core::components::SpawnEvent;
use skyguard_core::enums::EnemyKind;
use skyguard_core::events::WaveSummary;

/// Counters for the wave in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveState {
    pub wave: u32,
    pub total: u32,
    pub kills: u32,
    pub leaks: u32,
    pub reward: u32,
    pub standard: u32,
    pub fast: u32,
    pub armored: u32,
    pub boss: u32,
    pub start_health: i32,
    /// Set once the summary for this wave was emitted.
    pub summary_emitted: bool,
}

impl WaveState {
    pub fn new(wave: u32, events: &[SpawnEvent], start_health: i32) -> Self {
        let mut state = Self {
            wave,
            total: u32::try_from(events.len()).unwrap_or(u32::MAX),
            start_health,
            ..Self::default()
        };
        for event in events {
            match event.stats.kind {
                EnemyKind::Standard => state.standard += 1,
                EnemyKind::Fast => state.fast += 1,
                EnemyKind::Armored => state.armored += 1,
                EnemyKind::Boss => state.boss += 1,
            }
        }
        state
    }

    pub fn bosses(&self) -> u32 {
        self.boss
    }

    pub fn summary(&self, end_health: i32) -> WaveSummary {
        WaveSummary {
            wave: self.wave,
            total: self.total,
            kills: self.kills,
            leaks: self.leaks,
            reward: self.reward,
            standard: self.standard,
            fast: self.fast,
            armored: self.armored,
            boss: self.boss,
            start_health: self.start_health,
            end_health,
        }
    }
}
