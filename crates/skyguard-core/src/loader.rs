//! Tolerant loading of the balance tables.
//!
//! Any table that cannot be read or parsed falls back to its built-in
//! default; loading never fails as a whole.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::balance::{BalanceConfig, TowerType};
use crate::enums::EnemyKind;
use crate::error::BalanceError;

pub const TOWERS_FILE: &str = "towers.json";
pub const WAVES_FILE: &str = "waves.json";

/// Where balance tables come from.
pub trait BalanceSource {
    /// Raw contents of `file`.
    fn read(&self, file: &str) -> Result<String, BalanceError>;
}

/// Reads tables from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl BalanceSource for DirectorySource {
    fn read(&self, file: &str) -> Result<String, BalanceError> {
        std::fs::read_to_string(self.dir.join(file)).map_err(|source| BalanceError::Io {
            file: file.to_string(),
            source,
        })
    }
}

/// No data at all; every table uses its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl BalanceSource for NoSource {
    fn read(&self, _file: &str) -> Result<String, BalanceError> {
        Err(BalanceError::Unavailable)
    }
}

/// In-memory tables, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file: &str, contents: impl Into<String>) -> Self {
        self.files.insert(file.to_string(), contents.into());
        self
    }
}

impl BalanceSource for MemorySource {
    fn read(&self, file: &str) -> Result<String, BalanceError> {
        self.files
            .get(file)
            .cloned()
            .ok_or(BalanceError::Unavailable)
    }
}

impl BalanceConfig {
    /// Load both tables from `source`, falling back per table (and per
    /// section within `waves.json`) to the defaults.
    pub fn load(source: &dyn BalanceSource) -> Self {
        let mut config = BalanceConfig::default();

        match read_json(source, TOWERS_FILE).and_then(|v| parse_towers(&v)) {
            Ok(towers) => {
                info!("loaded {} tower types from {TOWERS_FILE}", towers.len());
                config.towers = towers;
            }
            Err(e) => report_fallback(TOWERS_FILE, &e),
        }

        match read_json(source, WAVES_FILE) {
            Ok(value) => apply_waves(&mut config, &value),
            Err(e) => report_fallback(WAVES_FILE, &e),
        }

        config
    }
}

fn report_fallback(file: &str, err: &BalanceError) {
    match err {
        BalanceError::Unavailable => debug!("{file}: no source, using defaults"),
        other => warn!("{other}; using default {file}"),
    }
}

fn read_json(source: &dyn BalanceSource, file: &str) -> Result<Value, BalanceError> {
    let raw = source.read(file)?;
    serde_json::from_str(&raw).map_err(|source| BalanceError::Json {
        file: file.to_string(),
        source,
    })
}

/// Each entry is parsed on its own; broken or unnamed entries are dropped.
fn parse_towers(value: &Value) -> Result<Vec<TowerType>, BalanceError> {
    let entries = value.as_array().ok_or_else(|| BalanceError::Shape {
        file: TOWERS_FILE.to_string(),
        reason: "expected an array of tower types".into(),
    })?;

    let towers: Vec<TowerType> = entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<TowerType>(entry.clone()) {
            Ok(t) if !t.name.trim().is_empty() => Some(t),
            Ok(_) => {
                warn!("{TOWERS_FILE}[{i}]: missing name, skipped");
                None
            }
            Err(e) => {
                warn!("{TOWERS_FILE}[{i}]: {e}, skipped");
                None
            }
        })
        .collect();

    if towers.is_empty() {
        return Err(BalanceError::Shape {
            file: TOWERS_FILE.to_string(),
            reason: "no usable tower entries".into(),
        });
    }
    Ok(towers)
}

fn apply_waves(config: &mut BalanceConfig, value: &Value) {
    let Some(root) = value.as_object() else {
        warn!("{WAVES_FILE}: expected an object; using defaults");
        return;
    };

    apply_section(root.get("economy"), "economy", &mut config.economy);
    apply_section(root.get("wave"), "wave", &mut config.wave);
    apply_section(root.get("scaling"), "scaling", &mut config.scaling);
    apply_section(root.get("chances"), "chances", &mut config.chances);

    if let Some(archetypes) = root.get("archetypes") {
        match archetypes.as_object() {
            Some(map) => {
                for kind in EnemyKind::ALL {
                    let label = format!("archetypes.{}", kind.as_str());
                    apply_section(map.get(kind.as_str()), &label, config.archetypes.get_mut(kind));
                }
            }
            None => warn!("{WAVES_FILE}: archetypes is not an object; using defaults"),
        }
    }
}

/// Replace `target` with the parsed section; keep it on absence or error.
fn apply_section<T: DeserializeOwned>(raw: Option<&Value>, label: &str, target: &mut T) {
    let Some(raw) = raw else {
        return;
    };
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(parsed) => *target = parsed,
        Err(e) => warn!("{WAVES_FILE}: section {label} invalid ({e}); using default"),
    }
}

/// Memoises the first load so every session in a process shares one
/// frozen balance.
#[derive(Debug, Default)]
pub struct BalanceCache {
    loaded: Mutex<Option<Arc<BalanceConfig>>>,
}

impl BalanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached balance, loading it from `source` on first use.
    pub fn get_or_load(&self, source: &dyn BalanceSource) -> Arc<BalanceConfig> {
        let mut slot = self.loaded.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(config) = slot.as_ref() {
            return Arc::clone(config);
        }
        let config = Arc::new(BalanceConfig::load(source));
        *slot = Some(Arc::clone(&config));
        config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Forget the cached balance; the next call reloads.
    pub fn reset(&self) {
        *self.loaded.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ENEMY_HEALTH_FLOOR, ENEMY_SPEED_FLOOR, MAX_WAVE_ENEMIES};
    use crate::enums::{TargetingMode, WeaponDelivery};

    #[test]
    fn no_source_gives_defaults() {
        assert_eq!(BalanceConfig::load(&NoSource), BalanceConfig::default());
    }

    #[test]
    fn bad_tower_entries_are_dropped() {
        let src = MemorySource::new().with(
            TOWERS_FILE,
            r#"[
                {"name": "Flak", "range": 150, "damage": 20, "firerate": 1.5, "cost": 300,
                 "targetingDefault": "sideways"},
                {"name": "   ", "range": 10},
                {"name": "Broken", "range": "far"},
                {"name": "Rail", "range": 300, "damage": 90, "firerate": 0.3, "cost": 900,
                 "delivery": "missile"}
            ]"#,
        );
        let cfg = BalanceConfig::load(&src);
        assert_eq!(cfg.towers.len(), 2);
        assert_eq!(cfg.towers[0].name, "Flak");
        assert_eq!(cfg.towers[0].targeting_default, TargetingMode::Nearest);
        assert_eq!(cfg.towers[0].upgrade.damage_step, 0.35);
        assert_eq!(cfg.towers[1].delivery, WeaponDelivery::Missile);
    }

    #[test]
    fn tower_table_with_no_survivors_falls_back() {
        let src = MemorySource::new().with(TOWERS_FILE, r#"[{"range": 5}]"#);
        assert_eq!(BalanceConfig::load(&src).towers.len(), 3);

        let src = MemorySource::new().with(TOWERS_FILE, r#"{"name": "not a list"}"#);
        assert_eq!(BalanceConfig::load(&src).towers.len(), 3);
    }

    #[test]
    fn waves_sections_fall_back_independently() {
        let src = MemorySource::new().with(
            WAVES_FILE,
            r#"{
                "economy": {"startResources": 2000, "upgradeCostMul": {"to3": 1.2}},
                "wave": "garbage",
                "scaling": {"baseHealth": 80},
                "archetypes": {"fast": {"speedMul": 2.0, "reward": 10}, "boss": 7}
            }"#,
        );
        let cfg = BalanceConfig::load(&src);
        assert_eq!(cfg.economy.start_resources, 2000);
        assert_eq!(cfg.economy.start_health, 100);
        assert_eq!(cfg.economy.upgrade_cost_mul.to2, 0.6);
        assert_eq!(cfg.economy.upgrade_cost_mul.to3, 1.2);
        assert_eq!(cfg.wave, crate::balance::WaveParams::default());
        assert_eq!(cfg.scaling.base_health, 80.0);
        assert_eq!(cfg.scaling.base_speed, 1.2);
        assert_eq!(cfg.archetypes.fast.speed_mul, 2.0);
        assert_eq!(cfg.archetypes.fast.reward, 10);
        assert!(cfg.archetypes.boss.is_boss);
        assert_eq!(cfg.archetypes.standard.reward, 75);
    }

    #[test]
    fn hostile_scaling_still_floors_enemies() {
        let src = MemorySource::new().with(
            WAVES_FILE,
            r#"{"scaling": {"baseSpeed": -5, "speedPerWave": 0, "minSpeed": 0,
                            "baseHealth": 0, "healthPerWave": 0, "minHealth": 0}}"#,
        );
        let cfg = BalanceConfig::load(&src);
        assert_eq!(cfg.scaling.min_speed, 0.0);
        for kind in EnemyKind::ALL {
            let stats = cfg.enemy_stats(kind, 1);
            assert!(stats.speed > 0.0, "{kind:?} speed {}", stats.speed);
            assert_eq!(stats.speed, ENEMY_SPEED_FLOOR);
            if !stats.is_boss {
                assert_eq!(stats.health, ENEMY_HEALTH_FLOOR, "{kind:?}");
            }
            assert!(stats.health >= ENEMY_HEALTH_FLOOR);
        }
    }

    #[test]
    fn configured_minimums_above_floor_apply() {
        let src = MemorySource::new().with(
            WAVES_FILE,
            r#"{"scaling": {"baseSpeed": 0, "speedPerWave": 0, "minSpeed": 0.4,
                            "baseHealth": 1, "healthPerWave": 0, "minHealth": 40}}"#,
        );
        let stats = BalanceConfig::load(&src).enemy_stats(EnemyKind::Standard, 3);
        assert_eq!(stats.speed, 0.4);
        assert_eq!(stats.health, 40.0);
    }

    #[test]
    fn huge_wave_counts_are_capped() {
        let src = MemorySource::new().with(
            WAVES_FILE,
            r#"{"wave": {"baseEnemies": 4294967295, "enemiesPerWave": 4000000000,
                         "bossEvery": 1, "bossCount": 4000000000}}"#,
        );
        let cfg = BalanceConfig::load(&src);
        assert_eq!(cfg.wave.enemies_per_wave, 4_000_000_000);
        for wave in [1, 2, u32::MAX] {
            assert_eq!(cfg.wave.regular_count(wave), MAX_WAVE_ENEMIES);
            assert_eq!(cfg.wave.boss_count_for(wave), MAX_WAVE_ENEMIES);
        }
    }

    #[test]
    fn unparsable_json_falls_back() {
        let src = MemorySource::new()
            .with(TOWERS_FILE, "[{")
            .with(WAVES_FILE, "not json");
        assert_eq!(BalanceConfig::load(&src), BalanceConfig::default());
    }

    #[test]
    fn cache_freezes_until_reset() {
        let cache = BalanceCache::new();
        assert!(!cache.is_loaded());
        let first = cache.get_or_load(&NoSource);

        let src = MemorySource::new().with(WAVES_FILE, r#"{"economy": {"startHealth": 5}}"#);
        let second = cache.get_or_load(&src);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.economy.start_health, 100);

        cache.reset();
        let third = cache.get_or_load(&src);
        assert_eq!(third.economy.start_health, 5);
    }

    #[test]
    fn directory_source_reads_files() {
        let dir = std::env::temp_dir().join("skyguard_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(WAVES_FILE), r#"{"wave": {"bossEvery": 3}}"#).unwrap();
        let _ = std::fs::remove_file(dir.join(TOWERS_FILE));

        let cfg = BalanceConfig::load(&DirectorySource::new(&dir));
        assert_eq!(cfg.wave.boss_every, 3);
        assert_eq!(cfg.towers.len(), 3);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
