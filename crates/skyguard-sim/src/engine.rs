//! Simulation engine: one defense session.
//!
//! `SimulationEngine` owns the hecs world (enemies and projectiles), the
//! towers, the clock and the economy. It applies player commands, advances
//! simulated time through `tick`, and produces `SessionSnapshot`s.
//! Completely headless, so every rule is testable without a host.

use std::collections::VecDeque;
use std::sync::Arc;

use hecs::{Entity, World};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skyguard_core::balance::{BalanceConfig, TowerType};
use skyguard_core::commands::PlayerCommand;
use skyguard_core::components::{Enemy, SpawnEvent, Tower, TowerId};
use skyguard_core::constants::TIME_SCALE_NORMAL;
use skyguard_core::enums::{SessionPhase, TargetingMode};
use skyguard_core::error::{ActionError, PlacementRejection};
use skyguard_core::events::{GameEvent, GameOverReport};
use skyguard_core::score::RunStats;
use skyguard_core::state::{HudView, PlacementView, SessionSnapshot, TowerPanelView};
use skyguard_core::types::{FieldSize, Position};

use crate::clock::SimClock;
use crate::economy;
use crate::records::{self, NullStore, RecordStore};
use crate::systems;
use crate::systems::cleanup::Kill;
use crate::systems::effects::EffectBuffer;
use crate::systems::movement::Leak;
use crate::systems::snapshot::SnapshotParts;
use crate::wave::WaveState;

/// Configuration for starting a new session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub field: FieldSize,
    /// Initial time scale (1.0 or 2.0).
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            field: FieldSize::default(),
            time_scale: TIME_SCALE_NORMAL,
        }
    }
}

/// Tower type chosen for placement plus the last hover point.
#[derive(Debug, Clone, Copy, Default)]
struct PlacementSelection {
    type_index: Option<usize>,
    pointer: Option<Position>,
}

/// The simulation engine. Owns the ECS world and all session state.
pub struct SimulationEngine {
    world: World,
    balance: Arc<BalanceConfig>,
    field: FieldSize,
    clock: SimClock,
    rng: ChaCha8Rng,
    store: Box<dyn RecordStore>,

    health: i32,
    resources: u32,
    wave: u32,
    enemies_remaining: u32,
    enemies_total: u32,
    spawn_queue: VecDeque<SpawnEvent>,
    towers: Vec<Tower>,
    next_tower_id: u32,
    next_projectile_seq: u64,
    effects: EffectBuffer,
    placement: PlacementSelection,
    selected_tower: Option<TowerId>,
    wave_state: WaveState,
    run: RunStats,

    started: bool,
    wave_cleared: bool,
    game_over: bool,
    closed: bool,
    report: Option<GameOverReport>,

    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Build a fresh session from the balance economy.
    pub fn new(config: SimConfig, balance: Arc<BalanceConfig>, store: Box<dyn RecordStore>) -> Self {
        let economy = balance.economy;
        let mut engine = Self {
            world: World::new(),
            field: config.field,
            clock: SimClock::new(config.time_scale),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            store,
            health: economy.start_health,
            resources: economy.start_resources,
            wave: 1,
            enemies_remaining: 0,
            enemies_total: 0,
            spawn_queue: VecDeque::new(),
            towers: Vec::new(),
            next_tower_id: 0,
            next_projectile_seq: 0,
            effects: EffectBuffer::new(),
            placement: PlacementSelection::default(),
            selected_tower: None,
            wave_state: WaveState::default(),
            run: RunStats {
                started_at: records::unix_now_ms(),
                ..RunStats::default()
            },
            started: false,
            wave_cleared: false,
            game_over: false,
            closed: false,
            report: None,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            balance,
        };
        info!(
            "session ready: health {}, resources {}, {} tower types",
            engine.health,
            engine.resources,
            engine.balance.towers.len()
        );
        engine.events.push(GameEvent::SessionStarted {
            health: engine.health,
            resources: engine.resources,
        });
        engine
    }

    /// Session with the built-in balance and no record persistence.
    pub fn with_defaults(config: SimConfig) -> Self {
        Self::new(config, Arc::new(BalanceConfig::default()), Box::new(NullStore))
    }

    // --- Frame and tick ---

    /// Queue a player command for the next frame.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// One host frame: apply queued commands, advance by the clamped and
    /// scaled real delta, and return the resulting snapshot.
    pub fn frame(&mut self, real_delta_ms: f64) -> SessionSnapshot {
        self.process_commands();
        let sim_delta = self.clock.frame_delta(real_delta_ms);
        self.tick(sim_delta);
        self.snapshot()
    }

    /// Advance simulated time by `sim_delta_ms`. The only entry point that
    /// moves gameplay forward. No-op before the defense starts, while
    /// paused, and after game over.
    pub fn tick(&mut self, sim_delta_ms: f64) {
        if self.closed || self.game_over || !self.started || self.clock.paused() {
            return;
        }

        // 1. Clock
        self.clock.advance(sim_delta_ms);
        let now = self.clock.now();

        // 2. Spawn due enemies
        systems::spawner::run(&mut self.world, &mut self.spawn_queue, now);

        // 3. Movement and leaks
        let leaks = systems::movement::run(
            &mut self.world,
            now,
            sim_delta_ms,
            self.field.width,
            &mut self.despawn_buffer,
        );
        for leak in leaks {
            self.apply_leak(leak);
        }
        if self.health <= 0 {
            self.trigger_game_over();
            return;
        }

        // 4. Towers fire
        systems::combat::run(
            &mut self.world,
            &mut self.towers,
            now,
            &mut self.effects,
            &mut self.next_projectile_seq,
        );
        systems::projectiles::enforce_limit(&mut self.world);

        // 5. Projectiles
        systems::projectiles::run(
            &mut self.world,
            now,
            sim_delta_ms,
            &mut self.effects,
            &mut self.despawn_buffer,
        );

        // 6. Reap kills
        for kill in systems::cleanup::reap(&mut self.world, &mut self.despawn_buffer) {
            self.apply_kill(kill);
        }

        // 7. Visual effects
        self.effects.prune(now);

        // 8. Wave completion
        self.check_wave_complete();
    }

    /// Take all events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(e) = self.handle_command(command) {
                debug!("command rejected: {e}");
                let code = match &e {
                    ActionError::Placement(reason) => Some(reason.code().to_string()),
                    _ => None,
                };
                self.events.push(GameEvent::ActionRejected {
                    reason: e.to_string(),
                    code,
                });
            }
        }
    }

    /// Apply one player command immediately.
    pub fn handle_command(&mut self, command: PlayerCommand) -> Result<(), ActionError> {
        match command {
            PlayerCommand::StartDefense => self.start_defense(),
            PlayerCommand::NextWave => self.next_wave(),
            PlayerCommand::ReturnToMenu => {
                self.teardown();
                Ok(())
            }
            PlayerCommand::SelectTowerType { index } => self.select_tower_type(index),
            PlayerCommand::ClearPlacementSelection => {
                self.clear_placement_selection();
                Ok(())
            }
            PlayerCommand::PointerMoved { x, y } => {
                self.pointer_moved(Position::new(x, y));
                Ok(())
            }
            PlayerCommand::PlaceTower { x, y } => self.place_tower(Position::new(x, y)).map(|_| ()),
            PlayerCommand::SelectPlacedTower { x, y } => {
                self.select_placed_tower(Position::new(x, y));
                Ok(())
            }
            PlayerCommand::CloseTowerActions => {
                self.close_tower_actions();
                Ok(())
            }
            PlayerCommand::UpgradeTower { tower_id } => self.upgrade_tower(tower_id).map(|_| ()),
            PlayerCommand::SellTower { tower_id } => self.sell_tower(tower_id).map(|_| ()),
            PlayerCommand::SetTargeting { tower_id, mode } => self.set_targeting(tower_id, mode),
            PlayerCommand::TogglePause => self.toggle_pause().map(|_| ()),
            PlayerCommand::ToggleSpeed => {
                self.toggle_speed();
                Ok(())
            }
            PlayerCommand::VisibilityLost => {
                self.visibility_lost();
                Ok(())
            }
            PlayerCommand::VisibilityRegained => {
                self.visibility_regained();
                Ok(())
            }
            PlayerCommand::ResizeField { width, height } => {
                self.resize_field(width, height);
                Ok(())
            }
        }
    }

    // --- Session flow ---

    /// Leave setup and launch wave 1.
    pub fn start_defense(&mut self) -> Result<(), ActionError> {
        let phase = self.phase();
        if phase != SessionPhase::Setup {
            return Err(ActionError::WrongPhase(phase));
        }
        self.started = true;
        self.start_wave();
        Ok(())
    }

    /// Launch the next wave. Only legal once the current wave is cleared.
    pub fn next_wave(&mut self) -> Result<(), ActionError> {
        self.ensure_active()?;
        if !self.started || !self.wave_cleared {
            return Err(ActionError::WrongPhase(self.phase()));
        }
        self.wave += 1;
        self.start_wave();
        Ok(())
    }

    fn start_wave(&mut self) {
        let events = systems::spawner::generate_wave(
            self.wave,
            &self.balance,
            self.field,
            self.clock.now(),
            &mut self.rng,
        );
        self.wave_state = WaveState::new(self.wave, &events, self.health);
        self.enemies_total = u32::try_from(events.len()).unwrap_or(u32::MAX);
        self.enemies_remaining = self.enemies_total;
        self.spawn_queue = events.into();
        self.wave_cleared = false;

        info!(
            "wave {} started: {} enemies ({} boss)",
            self.wave,
            self.enemies_total,
            self.wave_state.bosses()
        );
        self.events.push(GameEvent::WaveStarted {
            wave: self.wave,
            total_enemies: self.enemies_total,
            bosses: self.wave_state.bosses(),
        });
    }

    fn check_wave_complete(&mut self) {
        if self.wave_cleared
            || self.enemies_remaining != 0
            || !self.spawn_queue.is_empty()
            || self.world.query::<&Enemy>().iter().next().is_some()
        {
            return;
        }
        self.wave_cleared = true;
        if self.wave_state.summary_emitted {
            return;
        }
        self.wave_state.summary_emitted = true;
        self.run.waves_completed = self.run.waves_completed.max(self.wave);

        let summary = self.wave_state.summary(self.health);
        info!(
            "wave {} cleared: {}/{} destroyed, {} leaked, +{}",
            summary.wave, summary.kills, summary.total, summary.leaks, summary.reward
        );
        self.events.push(GameEvent::WaveComplete(summary));
    }

    fn apply_leak(&mut self, leak: Leak) {
        self.health -= leak.leak_damage as i32;
        self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
        self.wave_state.leaks += 1;
        self.run.leaks += 1;
        self.events.push(GameEvent::EnemyLeaked {
            kind: leak.kind,
            leak_damage: leak.leak_damage,
            health: self.health,
        });
    }

    fn apply_kill(&mut self, kill: Kill) {
        let now = self.clock.now();
        self.resources += kill.reward;
        self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
        self.wave_state.kills += 1;
        self.wave_state.reward += kill.reward;
        self.run.kills += 1;
        self.run.reward += kill.reward;
        self.effects.explosion(kill.position, now);
        self.effects.shockwave(kill.position, now);
        self.events.push(GameEvent::EnemyKilled {
            kind: kill.kind,
            reward: kill.reward,
        });
    }

    /// Terminal transition. Idempotent.
    fn trigger_game_over(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.clock.set_paused(true);

        let update = records::update_record(self.store.as_ref(), &self.run, records::unix_now_secs());
        let duration_ms = records::unix_now_ms().saturating_sub(self.run.started_at);
        let report = GameOverReport {
            wave: self.wave,
            duration_secs: (duration_ms + 500) / 1000,
            run: self.run,
            score: update.score,
            record: update.record,
            new_best_score: update.new_best_score,
        };
        info!(
            "game over on wave {}: score {}{}",
            self.wave,
            update.score,
            if update.new_best_score { " (new record)" } else { "" }
        );
        self.report = Some(report);
        self.events.push(GameEvent::GameOver(report));
    }

    /// Drop every transient entity. The host stops scheduling frames after.
    pub fn teardown(&mut self) {
        self.spawn_queue.clear();
        self.world.clear();
        self.effects.clear();
        self.placement = PlacementSelection::default();
        self.selected_tower = None;
        self.closed = true;
        info!("session closed on wave {}", self.wave);
    }

    // --- Placement ---

    pub fn select_tower_type(&mut self, index: usize) -> Result<(), ActionError> {
        self.ensure_active()?;
        if self.balance.tower_type(index).is_none() {
            return Err(ActionError::UnknownTowerType(index));
        }
        self.placement.type_index = Some(index);
        self.selected_tower = None;
        Ok(())
    }

    pub fn clear_placement_selection(&mut self) {
        self.placement = PlacementSelection::default();
    }

    pub fn pointer_moved(&mut self, pos: Position) {
        self.placement.pointer = Some(pos);
    }

    /// Check a placement for the selected tower type without placing it.
    pub fn placement_check(&self, pos: Position) -> Result<(), ActionError> {
        let index = self.placement.type_index.ok_or(ActionError::NoTypeSelected)?;
        let tower_type = self.tower_type(index)?;
        economy::validate_placement(pos, tower_type, self.field, self.resources, &self.towers)?;
        Ok(())
    }

    /// Place the selected tower type at `pos`.
    pub fn place_tower(&mut self, pos: Position) -> Result<TowerId, ActionError> {
        let index = self.placement.type_index.ok_or(ActionError::NoTypeSelected)?;
        self.place_tower_type(index, pos)
    }

    /// Place tower type `index` at `pos`, regardless of the current selection.
    pub fn place_tower_type(&mut self, index: usize, pos: Position) -> Result<TowerId, ActionError> {
        self.ensure_active()?;
        let tower_type = self.tower_type(index)?;
        economy::validate_placement(pos, tower_type, self.field, self.resources, &self.towers)?;

        let id = TowerId(self.next_tower_id);
        let tower = economy::build_tower(id, index, tower_type, pos);
        let cost = tower_type.cost;
        debug!("placed {} #{} at ({:.0}, {:.0}) for {cost}", tower_type.name, id.0, pos.x, pos.y);

        self.next_tower_id += 1;
        self.resources -= cost;
        self.towers.push(tower);
        self.placement.type_index = None;

        self.events.push(GameEvent::TowerPlaced {
            tower_id: id,
            type_index: index,
            cost,
        });
        Ok(id)
    }

    // --- Placed towers ---

    /// Open the action panel for the tower under `pos`, if any.
    pub fn select_placed_tower(&mut self, pos: Position) -> Option<TowerId> {
        self.selected_tower = economy::tower_at(&self.towers, pos);
        self.selected_tower
    }

    pub fn close_tower_actions(&mut self) {
        self.selected_tower = None;
    }

    /// Upgrade a tower one level. Returns the new level.
    pub fn upgrade_tower(&mut self, id: TowerId) -> Result<u8, ActionError> {
        self.ensure_active()?;
        let idx = self.tower_index(id)?;
        let type_index = self.towers[idx].type_index;
        let balance = Arc::clone(&self.balance);
        let tower_type = balance
            .tower_type(type_index)
            .ok_or(ActionError::UnknownTowerType(type_index))?;

        let cost = economy::upgrade_cost(&self.towers[idx], tower_type, &balance.economy)
            .ok_or(ActionError::MaxLevel(id))?;
        if self.resources < cost {
            return Err(ActionError::InsufficientResources {
                needed: cost,
                available: self.resources,
            });
        }

        self.resources -= cost;
        let tower = &mut self.towers[idx];
        economy::apply_upgrade(tower, tower_type, cost);
        let level = tower.level;
        debug!("tower #{} upgraded to level {level} for {cost}", id.0);
        self.events.push(GameEvent::TowerUpgraded {
            tower_id: id,
            level,
            cost,
        });
        Ok(level)
    }

    /// Sell a tower. Returns the refund.
    pub fn sell_tower(&mut self, id: TowerId) -> Result<u32, ActionError> {
        self.ensure_active()?;
        let idx = self.tower_index(id)?;
        let refund = economy::sell_refund(&self.towers[idx], &self.balance.economy);
        self.towers.remove(idx);
        self.resources += refund;
        if self.selected_tower == Some(id) {
            self.selected_tower = None;
        }
        debug!("tower #{} sold for {refund}", id.0);
        self.events.push(GameEvent::TowerSold {
            tower_id: id,
            refund,
        });
        Ok(refund)
    }

    pub fn set_targeting(&mut self, id: TowerId, mode: TargetingMode) -> Result<(), ActionError> {
        self.ensure_active()?;
        let idx = self.tower_index(id)?;
        self.towers[idx].targeting = mode;
        self.events.push(GameEvent::TargetingChanged { tower_id: id, mode });
        Ok(())
    }

    // --- Clock ---

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self) -> Result<bool, ActionError> {
        self.ensure_active()?;
        let paused = self.clock.toggle_pause();
        self.events.push(GameEvent::PauseChanged {
            paused,
            auto: false,
        });
        Ok(paused)
    }

    pub fn set_paused(&mut self, paused: bool) -> Result<(), ActionError> {
        self.ensure_active()?;
        if self.clock.paused() != paused {
            self.toggle_pause()?;
        }
        Ok(())
    }

    /// Flip the time scale between 1x and 2x. Returns the new scale.
    pub fn toggle_speed(&mut self) -> f64 {
        let time_scale = self.clock.toggle_speed();
        self.events.push(GameEvent::SpeedChanged { time_scale });
        time_scale
    }

    /// Host hidden: pause a running game and remember why.
    pub fn visibility_lost(&mut self) {
        if self.game_over || self.closed {
            return;
        }
        if self.clock.visibility_lost() {
            self.events.push(GameEvent::PauseChanged {
                paused: true,
                auto: true,
            });
        }
    }

    /// Host visible again: tell the player once, stay paused.
    pub fn visibility_regained(&mut self) {
        if self.clock.visibility_regained() {
            self.events.push(GameEvent::AutoPauseNotice);
        }
    }

    /// Resize the field. Towers stay where they are; non-positive sizes
    /// are ignored.
    pub fn resize_field(&mut self, width: f64, height: f64) {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            debug!("ignoring field size {width}x{height}");
            return;
        }
        self.field = FieldSize::new(width, height);
    }

    // --- Snapshot ---

    pub fn snapshot(&self) -> SessionSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotParts {
                time_ms: self.clock.now(),
                field: self.field,
                hud: self.hud(),
                towers: &self.towers,
                balance: &self.balance,
                effects: &self.effects,
                placement: self.placement_view(),
                selected_tower: self.tower_panel(),
            },
        )
    }

    fn hud(&self) -> HudView {
        HudView {
            phase: self.phase(),
            health: self.health,
            resources: self.resources,
            wave: self.wave,
            enemies_remaining: self.enemies_remaining,
            enemies_total: self.enemies_total,
            time_scale: self.clock.time_scale(),
            paused: self.clock.paused(),
            auto_paused: self.clock.auto_paused(),
            kills: self.run.kills,
            leaks: self.run.leaks,
        }
    }

    fn placement_view(&self) -> Option<PlacementView> {
        let index = self.placement.type_index?;
        let tower_type = self.balance.tower_type(index)?;
        let check = self.placement.pointer.map(|pos| {
            economy::validate_placement(pos, tower_type, self.field, self.resources, &self.towers)
        });
        Some(PlacementView {
            type_index: index,
            position: self.placement.pointer,
            range: tower_type.stats_at(1).range,
            valid: matches!(check, Some(Ok(()))),
            reason: match check {
                Some(Err(reason)) => Some(PlacementRejection::code(&reason).to_string()),
                _ => None,
            },
        })
    }

    /// Action panel for the selected tower.
    pub fn tower_panel(&self) -> Option<TowerPanelView> {
        let id = self.selected_tower?;
        let tower = self.towers.iter().find(|t| t.id == id)?;
        let tower_type = self.balance.tower_type(tower.type_index)?;
        Some(economy::panel_view(
            tower,
            tower_type,
            &self.balance.economy,
            self.resources,
        ))
    }

    // --- Accessors ---

    pub fn phase(&self) -> SessionPhase {
        if self.game_over {
            SessionPhase::GameOver
        } else if !self.started {
            SessionPhase::Setup
        } else if self.clock.paused() {
            SessionPhase::Paused
        } else if self.wave_cleared {
            SessionPhase::WaveClear
        } else {
            SessionPhase::Running
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn game_over_report(&self) -> Option<&GameOverReport> {
        self.report.as_ref()
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn resources(&self) -> u32 {
        self.resources
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn paused(&self) -> bool {
        self.clock.paused()
    }

    pub fn time_scale(&self) -> f64 {
        self.clock.time_scale()
    }

    pub fn field(&self) -> FieldSize {
        self.field
    }

    pub fn enemies_remaining(&self) -> u32 {
        self.enemies_remaining
    }

    pub fn enemies_total(&self) -> u32 {
        self.enemies_total
    }

    pub fn spawn_queue_len(&self) -> usize {
        self.spawn_queue.len()
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn selected_tower(&self) -> Option<TowerId> {
        self.selected_tower
    }

    pub fn run_stats(&self) -> &RunStats {
        &self.run
    }

    pub fn wave_state(&self) -> &WaveState {
        &self.wave_state
    }

    pub fn balance(&self) -> &BalanceConfig {
        &self.balance
    }

    /// Read-only view of the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    fn ensure_active(&self) -> Result<(), ActionError> {
        if self.game_over || self.closed {
            return Err(ActionError::GameOver);
        }
        Ok(())
    }

    fn tower_type(&self, index: usize) -> Result<&TowerType, ActionError> {
        self.balance
            .tower_type(index)
            .ok_or(ActionError::UnknownTowerType(index))
    }

    fn tower_index(&self, id: TowerId) -> Result<usize, ActionError> {
        self.towers
            .iter()
            .position(|t| t.id == id)
            .ok_or(ActionError::UnknownTower(id))
    }

    // --- Test hooks ---

    /// Replace the spawn queue (tests place enemies precisely).
    #[cfg(test)]
    pub(crate) fn clear_spawn_queue(&mut self) {
        self.spawn_queue.clear();
    }

    #[cfg(test)]
    pub(crate) fn spawn_test_enemy(&mut self, event: &SpawnEvent) -> Entity {
        systems::spawner::spawn_enemy(&mut self.world, event)
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub(crate) fn set_resources(&mut self, resources: u32) {
        self.resources = resources;
    }
}
