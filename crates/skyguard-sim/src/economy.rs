//! Tower economy: placement rules, upgrade pricing, sell refunds.
//!
//! Pure functions over the tower list; the engine owns the resources and
//! applies the results.

use skyguard_core::balance::{Economy, TowerType};
use skyguard_core::components::{Tower, TowerId};
use skyguard_core::constants::*;
use skyguard_core::error::PlacementRejection;
use skyguard_core::state::TowerPanelView;
use skyguard_core::types::{FieldSize, Position};

/// Check whether `tower_type` may be placed at `pos`. Rules are checked in
/// order and the first failure is reported.
pub fn validate_placement(
    pos: Position,
    tower_type: &TowerType,
    field: FieldSize,
    resources: u32,
    towers: &[Tower],
) -> Result<(), PlacementRejection> {
    let m = PLACEMENT_EDGE_MARGIN;
    if pos.x < m || pos.y < m || pos.x > field.width - m || pos.y > field.height - m {
        return Err(PlacementRejection::Edge);
    }
    if pos.x < NO_BUILD_ZONE_WIDTH {
        return Err(PlacementRejection::EntryZone);
    }
    if pos.x > field.width - NO_BUILD_ZONE_WIDTH {
        return Err(PlacementRejection::ExitZone);
    }
    if resources < tower_type.cost {
        return Err(PlacementRejection::InsufficientResources);
    }
    if towers
        .iter()
        .any(|t| t.position.distance_to(&pos) < MIN_TOWER_SPACING)
    {
        return Err(PlacementRejection::TooClose);
    }
    Ok(())
}

/// A level-1 tower of `tower_type` at `pos`.
pub fn build_tower(id: TowerId, type_index: usize, tower_type: &TowerType, pos: Position) -> Tower {
    Tower {
        id,
        position: pos,
        type_index,
        level: 1,
        spent: tower_type.cost,
        stats: tower_type.stats_at(1),
        effects: tower_type.effects_at(1),
        targeting: tower_type.targeting_default,
        delivery: tower_type.delivery,
        last_fire_ms: 0.0,
    }
}

/// Price of the next level. `None` at max level.
pub fn upgrade_cost(tower: &Tower, tower_type: &TowerType, economy: &Economy) -> Option<u32> {
    let mul = match tower.level {
        1 => economy.upgrade_cost_mul.to2,
        2 => economy.upgrade_cost_mul.to3,
        _ => return None,
    };
    Some((f64::from(tower_type.cost) * mul).round().max(0.0) as u32)
}

/// Raise the tower one level and re-derive its stats and effects.
pub fn apply_upgrade(tower: &mut Tower, tower_type: &TowerType, cost: u32) {
    tower.level = (tower.level + 1).min(MAX_TOWER_LEVEL);
    tower.spent += cost;
    tower.stats = tower_type.stats_at(tower.level);
    tower.effects = tower_type.effects_at(tower.level);
}

/// Resources returned when the tower is sold.
pub fn sell_refund(tower: &Tower, economy: &Economy) -> u32 {
    (f64::from(tower.spent) * economy.sell_refund_mul)
        .round()
        .max(0.0) as u32
}

/// The most recently placed tower within pick radius of `pos`.
pub fn tower_at(towers: &[Tower], pos: Position) -> Option<TowerId> {
    towers
        .iter()
        .rev()
        .find(|t| t.position.distance_to(&pos) <= TOWER_PICK_RADIUS)
        .map(|t| t.id)
}

/// Action panel data for a placed tower.
pub fn panel_view(
    tower: &Tower,
    tower_type: &TowerType,
    economy: &Economy,
    resources: u32,
) -> TowerPanelView {
    let upgrade_cost = upgrade_cost(tower, tower_type, economy);
    TowerPanelView {
        id: tower.id,
        name: tower_type.name.clone(),
        level: tower.level,
        range: tower.stats.range,
        damage: tower.stats.damage,
        firerate: tower.stats.firerate,
        targeting: tower.targeting,
        upgrade_cost,
        can_upgrade: upgrade_cost.is_some_and(|c| resources >= c),
        sell_refund: sell_refund(tower, economy),
        effects: tower.effects.clone(),
    }
}
