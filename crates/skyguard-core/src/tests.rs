#[cfg(test)]
mod tests {
    use crate::balance::*;
    use crate::commands::PlayerCommand;
    use crate::components::{OnHitEffect, TowerId};
    use crate::enums::*;
    use crate::error::PlacementRejection;
    use crate::events::GameEvent;
    use crate::score::{compute_score, merge_record, Record, RunStats};
    use crate::types::{round_to, FieldSize, Position};

    #[test]
    fn test_targeting_mode_parses_unknown_as_nearest() {
        assert_eq!(TargetingMode::parse("first"), TargetingMode::First);
        assert_eq!(TargetingMode::parse(" Strongest "), TargetingMode::Strongest);
        assert_eq!(TargetingMode::parse("weakest"), TargetingMode::Nearest);
        assert_eq!(TargetingMode::parse(""), TargetingMode::Nearest);

        let mode: TargetingMode = serde_json::from_str("\"last\"").unwrap();
        assert_eq!(mode, TargetingMode::Last);
        let mode: TargetingMode = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(mode, TargetingMode::Nearest);
        assert_eq!(serde_json::to_string(&TargetingMode::First).unwrap(), "\"first\"");
    }

    #[test]
    fn test_command_wire_format() {
        let cmd: PlayerCommand =
            serde_json::from_str(r#"{"type":"SetTargeting","tower_id":3,"mode":"strongest"}"#)
                .unwrap();
        assert_eq!(
            cmd,
            PlayerCommand::SetTargeting {
                tower_id: TowerId(3),
                mode: TargetingMode::Strongest
            }
        );
        let cmd: PlayerCommand = serde_json::from_str(r#"{"type":"TogglePause"}"#).unwrap();
        assert_eq!(cmd, PlayerCommand::TogglePause);
    }

    #[test]
    fn test_event_is_tagged() {
        let json = serde_json::to_value(GameEvent::TowerSold {
            tower_id: TowerId(1),
            refund: 420,
        })
        .unwrap();
        assert_eq!(json["type"], "TowerSold");
        assert_eq!(json["refund"], 420);
    }

    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn test_spawn_band() {
        let (lo, hi) = FieldSize::new(960.0, 600.0).spawn_band();
        assert_eq!(lo, 108.0);
        assert_eq!(hi, 492.0);

        // Short field: padding floor, band still at least 20 px tall.
        let (lo, hi) = FieldSize::new(800.0, 100.0).spawn_band();
        assert_eq!(lo, 50.0);
        assert_eq!(hi, 70.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.3649, 3), 1.365);
        assert_eq!(round_to(2.596, 2), 2.6);
    }

    #[test]
    fn test_default_roster() {
        let cfg = BalanceConfig::default();
        assert_eq!(cfg.towers.len(), 3);
        assert_eq!(cfg.towers[0].targeting_default, TargetingMode::First);
        assert_eq!(cfg.towers[1].targeting_default, TargetingMode::Nearest);
        assert_eq!(cfg.towers[2].targeting_default, TargetingMode::Strongest);
        assert_eq!(cfg.towers[2].delivery, WeaponDelivery::Missile);
        assert_eq!(cfg.tower_type(3), None);
    }

    #[test]
    fn test_tower_stats_per_level() {
        let radar = &BalanceConfig::default().towers[0];
        let l1 = radar.stats_at(1);
        assert_eq!((l1.range, l1.damage, l1.firerate), (280.0, 15.0, 1.0));
        let l2 = radar.stats_at(2);
        assert_eq!((l2.range, l2.damage, l2.firerate), (314.0, 20.0, 1.18));
        let l3 = radar.stats_at(3);
        assert_eq!((l3.range, l3.firerate), (347.0, 1.36));
        assert!(l3.damage > l2.damage);
        assert_eq!(radar.stats_at(9), l3);
    }

    #[test]
    fn test_slow_scales_with_level_and_clamps() {
        let guidance = &BalanceConfig::default().towers[1];
        assert_eq!(
            guidance.effects_at(1),
            vec![OnHitEffect::Slow {
                mult: 0.75,
                duration_ms: 900.0
            }]
        );
        match guidance.effects_at(3)[0] {
            OnHitEffect::Slow { mult, duration_ms } => {
                assert!((mult - 0.65).abs() < 1e-9);
                assert_eq!(duration_ms, 1300.0);
            }
        }

        let harsh = TowerType {
            effects: EffectDescriptors {
                slow: Some(SlowDescriptor {
                    mult: 0.2,
                    duration_ms: 100.0,
                    scale: SlowScale::default(),
                }),
            },
            ..TowerType::default()
        };
        assert_eq!(
            harsh.effects_at(1),
            vec![OnHitEffect::Slow {
                mult: 0.35,
                duration_ms: 250.0
            }]
        );
        assert!(BalanceConfig::default().towers[0].effects_at(2).is_empty());
    }

    #[test]
    fn test_enemy_stats() {
        let cfg = BalanceConfig::default();
        let s = cfg.enemy_stats(EnemyKind::Standard, 1);
        assert_eq!(s.speed, 1.35);
        assert_eq!(s.health, 72.0);
        assert_eq!(s.reward, 75);
        assert_eq!(s.leak_damage, 15);

        let boss = cfg.enemy_stats(EnemyKind::Boss, 5);
        assert_eq!(boss.health, 904.0);
        assert_eq!(boss.speed, 1.365);
        assert!(boss.is_boss);
        assert_eq!(boss.damage_mul, 0.65);
    }

    #[test]
    fn test_enemy_stats_floors() {
        let mut cfg = BalanceConfig::default();
        cfg.scaling.base_health = 1.0;
        cfg.scaling.health_per_wave = 0.0;
        cfg.scaling.base_speed = 0.0;
        cfg.scaling.speed_per_wave = 0.0;
        cfg.archetypes.standard.size = 2.0;
        cfg.archetypes.standard.leak_damage = 0;
        let s = cfg.enemy_stats(EnemyKind::Standard, 1);
        assert_eq!(s.health, 10.0);
        assert!(s.speed > 0.0);
        assert_eq!(s.size, 8.0);
        assert_eq!(s.leak_damage, 1);
    }

    #[test]
    fn test_chances() {
        let ch = Chances::default();
        assert_eq!(ch.armored_chance(3), 0.0);
        assert!((ch.armored_chance(4) - 0.07).abs() < 1e-9);
        assert!((ch.armored_chance(100) - 0.30).abs() < 1e-9);
        assert!((ch.fast_chance(4) - 0.18).abs() < 1e-9);
        assert!((ch.fast_chance(50) - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_wave_counts() {
        let w = WaveParams::default();
        assert_eq!(w.regular_count(1), 5);
        assert_eq!(w.boss_count_for(4), 0);
        assert_eq!(w.boss_count_for(5), 1);
        let no_boss = WaveParams {
            boss_every: 0,
            ..w
        };
        assert_eq!(no_boss.boss_count_for(5), 0);
    }

    #[test]
    fn test_score_formula() {
        let run = RunStats {
            waves_completed: 5,
            kills: 40,
            leaks: 2,
            ..RunStats::default()
        };
        assert_eq!(compute_score(&run), 6360);

        let bad = RunStats {
            leaks: 10,
            ..RunStats::default()
        };
        assert_eq!(compute_score(&bad), 0);
    }

    #[test]
    fn test_record_merge() {
        let run = RunStats {
            waves_completed: 3,
            kills: 10,
            leaks: 0,
            ..RunStats::default()
        };
        let first = merge_record(Record::default(), &run, 1_700_000_000);
        assert!(first.new_best_score);
        assert!(first.changed);
        assert_eq!(first.record.best_score, 3400);
        assert_eq!(first.record.updated_at, 1_700_000_000);

        // Equal score: best unchanged, nothing written.
        let again = merge_record(first.record, &run, 1_800_000_000);
        assert!(!again.new_best_score);
        assert!(!again.changed);
        assert_eq!(again.record.updated_at, 1_700_000_000);

        // Lower score but more kills: kills move, score and stamp do not.
        let grindy = RunStats {
            waves_completed: 1,
            kills: 30,
            leaks: 20,
            ..RunStats::default()
        };
        let merged = merge_record(first.record, &grindy, 1_900_000_000);
        assert!(!merged.new_best_score);
        assert!(merged.changed);
        assert_eq!(merged.record.best_score, 3400);
        assert_eq!(merged.record.best_kills, 30);
        assert_eq!(merged.record.best_waves, 3);
        assert_eq!(merged.record.updated_at, 1_700_000_000);
    }

    #[test]
    fn test_placement_codes() {
        assert_eq!(PlacementRejection::Edge.code(), "edge");
        assert_eq!(PlacementRejection::EntryZone.code(), "entry-zone");
        assert_eq!(PlacementRejection::ExitZone.code(), "exit-zone");
        assert_eq!(
            PlacementRejection::InsufficientResources.code(),
            "insufficient-resources"
        );
        assert_eq!(PlacementRejection::TooClose.code(), "too-close");
    }
}
