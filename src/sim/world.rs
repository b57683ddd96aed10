//! Game state and the per-frame driver
//!
//! `tick` is the only entry point the host calls per frame. Order:
//! input -> advance -> combat -> drops -> timers -> cleanup.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorIntent, ActorTag, Direction};
use super::encounter::{EncounterDescriptor, WaveController};
use super::event::GameEvent;
use super::pickup::PickupField;
use super::projectile::ProjectileManager;
use super::resolver::{CombatFrame, resolve_area_effect};
use super::skill::PlayerSkill;
use crate::assets::AssetCatalog;
use crate::consts::*;

/// Player actor id; enemy ids start after it
pub const PLAYER_ID: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Level cleared, next one loads after the breather
    LevelCleared,
    GameOver,
    Victory,
}

/// Input commands for one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal intent: -1 left, 0 none, 1 right
    pub move_x: i8,
    /// Vertical intent: -1 up, 0 none, 1 down
    pub move_y: i8,
    /// Fire held (auto-fire on cadence)
    pub fire: bool,
    /// Trigger the special skill
    pub use_skill: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    rng: Pcg32,
    pub screen: Vec2,
    pub player: Actor,
    pub waves: WaveController,
    pub projectiles: ProjectileManager,
    pub pickups: PickupField,
    pub skill: PlayerSkill,
    pub phase: GamePhase,
    pub score: u64,
    /// Frames simulated
    pub frame: u64,
    breather_ms: f32,
    catalog: AssetCatalog,
    events: Vec<GameEvent>,
}

impl GameState {
    /// New game on the default screen. Call `start` to load level 1.
    pub fn new(seed: u64, encounters: Vec<EncounterDescriptor>, catalog: AssetCatalog) -> Self {
        Self::with_screen(seed, encounters, catalog, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    pub fn with_screen(
        seed: u64,
        encounters: Vec<EncounterDescriptor>,
        catalog: AssetCatalog,
        width: f32,
        height: f32,
    ) -> Self {
        let screen = Vec2::new(width, height);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            screen,
            player: Self::spawn_player(&catalog, screen),
            waves: WaveController::new(encounters, catalog.clone(), PLAYER_ID + 1),
            projectiles: ProjectileManager::new(catalog.clone()),
            pickups: PickupField::new(),
            skill: PlayerSkill::new(),
            phase: GamePhase::Playing,
            score: 0,
            frame: 0,
            breather_ms: 0.0,
            catalog,
            events: Vec::new(),
        }
    }

    fn spawn_player(catalog: &AssetCatalog, screen: Vec2) -> Actor {
        Actor::player(PLAYER_ID, screen / 2.0)
            .with_animations(catalog.animations(ActorTag::Player.asset_key()))
    }

    /// Load the first level
    pub fn start(&mut self) {
        log::info!("Starting game (seed {})", self.seed);
        self.phase = GamePhase::Playing;
        self.waves.load_level(1, &mut self.events);
    }

    /// Fresh run with the same level data and a new seed
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.player = Self::spawn_player(&self.catalog, self.screen);
        self.projectiles.clear();
        self.projectiles.set_player_style(Default::default());
        self.pickups.clear();
        self.skill.reset();
        self.score = 0;
        self.frame = 0;
        self.breather_ms = 0.0;
        self.start();
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.screen = Vec2::new(width, height);
        self.player.pos = self.player.pos.clamp(Vec2::ZERO, self.screen);
    }
}

/// Advance the game by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing | GamePhase::LevelCleared => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver | GamePhase::Victory => return,
        GamePhase::Playing | GamePhase::LevelCleared => {}
    }

    state.frame += 1;
    let first_new_event = state.events.len();

    // Input
    state
        .player
        .step(Direction::from_axes(input.move_x, input.move_y), state.screen);
    if state.player.ready_to_fire(dt_ms, input.fire) {
        let power = state.player.power_level();
        state.projectiles.fire_player(state.player.pos, power);
    }
    if input.use_skill && !state.player.is_destroyed() {
        state
            .skill
            .activate(state.player.pos, state.waves.enemies_mut(), &mut state.events);
    }

    // Advance
    state.projectiles.advance();
    state
        .projectiles
        .cull_out_of_bounds(state.screen.x, state.screen.y, CULL_MARGIN);

    let mut intents = Vec::new();
    state.waves.advance(dt_ms, state.player.pos, &mut intents);
    for intent in intents {
        match intent {
            ActorIntent::FireAimed { origin, target } => {
                state.projectiles.fire_aimed(origin, target);
            }
            ActorIntent::FireBurst { origin } => {
                state.projectiles.fire_burst(origin);
            }
            ActorIntent::AreaAttack(effect) => {
                state.events.push(GameEvent::BossSkill {
                    origin: effect.origin,
                    radius: effect.radius,
                    target: effect.target,
                });
                resolve_area_effect(&effect, &mut state.player, &mut state.events);
            }
        }
    }
    state.pickups.advance();

    // Combat
    CombatFrame {
        player: &mut state.player,
        enemies: state.waves.enemies_mut(),
        projectiles: &mut state.projectiles,
        pickups: &mut state.pickups,
        events: &mut state.events,
    }
    .resolve();

    // Drops from enemies destroyed this frame
    for enemy in state.waves.enemies_mut() {
        let Some(drop_rate) = enemy.take_drop() else {
            continue;
        };
        if let Some(kind) = PickupField::roll_drop(&mut state.rng, drop_rate) {
            let item_id = state.pickups.spawn(kind, enemy.pos);
            state.events.push(GameEvent::ItemDropped {
                item_id,
                kind,
                pos: enemy.pos,
            });
        }
    }

    // Timers
    state.player.update_timers(dt_ms, &mut state.events);
    state.waves.update_timers(dt_ms, &mut state.events);
    state.skill.update(dt_ms, &mut state.events);
    state.projectiles.update(dt_ms);

    // Cleanup
    state.waves.cleanup(&mut state.events);
    state.pickups.cleanup(state.screen.y, CULL_MARGIN);

    let mut player_lost = false;
    let mut level_cleared = false;
    for event in &state.events[first_new_event..] {
        match event {
            GameEvent::Destroyed { tag, .. } => match tag {
                ActorTag::BasicEnemy => state.score += ENEMY_SCORE,
                ActorTag::Boss => state.score += BOSS_SCORE,
                ActorTag::Player => player_lost = true,
            },
            GameEvent::LevelComplete { .. } => level_cleared = true,
            _ => {}
        }
    }

    if player_lost {
        log::info!("Game over, score {}", state.score);
        state.phase = GamePhase::GameOver;
        return;
    }

    if level_cleared && state.phase == GamePhase::Playing {
        state.phase = GamePhase::LevelCleared;
        state.breather_ms = LEVEL_BREATHER_MS;
        return;
    }

    if state.phase == GamePhase::LevelCleared {
        state.breather_ms -= dt_ms;
        if state.breather_ms <= 0.0 {
            state.breather_ms = 0.0;
            state.phase = if state.waves.next_level(&mut state.events) {
                GamePhase::Playing
            } else {
                log::info!("Victory, score {}", state.score);
                GamePhase::Victory
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::encounter::{EnemySpawn, default_encounters};
    use crate::sim::pickup::PickupKind;

    const DT: f32 = 16.0;

    fn started(encounters: Vec<EncounterDescriptor>) -> GameState {
        let mut state = GameState::new(7, encounters, AssetCatalog::new());
        state.start();
        state
    }

    fn single_enemy_level(x: f32, y: f32) -> Vec<EncounterDescriptor> {
        vec![EncounterDescriptor {
            level: 1,
            enemies: vec![EnemySpawn::at(x, y, x, y)],
            boss: None,
        }]
    }

    fn count(events: &[GameEvent], name: &str) -> usize {
        events.iter().filter(|e| e.name() == name).count()
    }

    #[test]
    fn test_start_loads_level_one() {
        let mut state = started(default_encounters());
        assert_eq!(state.waves.enemies().len(), 5);
        assert_eq!(state.drain_events(), vec![GameEvent::LevelLoaded { level: 1 }]);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_player_moves_and_fires() {
        let mut state = started(single_enemy_level(100.0, 50.0));
        let start = state.player.pos;
        let input = TickInput {
            move_x: 1,
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.player.pos, start + Vec2::new(PLAYER_STEP, 0.0));
        assert_eq!(state.projectiles.active().len(), 1);

        // Cadence holds the next volley
        tick(&mut state, &input, DT);
        assert_eq!(state.projectiles.active().len(), 1);
    }

    #[test]
    fn test_level_complete_exactly_once_then_next() {
        let mut encounters = single_enemy_level(400.0, 100.0);
        encounters.push(EncounterDescriptor {
            level: 2,
            enemies: vec![EnemySpawn::at(100.0, 100.0, 100.0, 100.0)],
            boss: None,
        });
        let mut state = started(encounters);
        state.waves.enemies_mut()[0].apply_damage(5);

        let mut events = Vec::new();
        let idle = TickInput::default();
        let mut ticks = 0;
        while state.waves.current_level() == 1 && ticks < 400 {
            tick(&mut state, &idle, DT);
            events.extend(state.drain_events());
            ticks += 1;
        }

        assert_eq!(count(&events, "levelComplete"), 1);
        assert_eq!(count(&events, "destroyed"), 1);
        assert_eq!(state.score, ENEMY_SCORE);
        assert_eq!(state.waves.current_level(), 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(events.contains(&GameEvent::LevelLoaded { level: 2 }));
    }

    #[test]
    fn test_victory_after_last_level() {
        let mut state = started(single_enemy_level(400.0, 100.0));
        state.waves.enemies_mut()[0].apply_damage(5);
        let idle = TickInput::default();
        let mut events = Vec::new();
        for _ in 0..300 {
            tick(&mut state, &idle, DT);
            events.extend(state.drain_events());
        }
        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(count(&events, "gameComplete"), 1);
    }

    #[test]
    fn test_game_over_when_player_destroyed() {
        let mut state = started(single_enemy_level(100.0, 50.0));
        state.player.apply_damage(PLAYER_MAX_HP);
        let idle = TickInput::default();
        for _ in 0..100 {
            tick(&mut state, &idle, DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);

        // Frozen once over
        let frame = state.frame;
        tick(&mut state, &idle, DT);
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = started(single_enemy_level(100.0, 50.0));
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let pos = state.player.pos;
        tick(
            &mut state,
            &TickInput {
                move_x: 1,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.player.pos, pos);
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_skill_input_damages_nearby() {
        let mut state = started(single_enemy_level(0.0, 0.0));
        let near = state.player.pos + Vec2::new(60.0, 0.0);
        state.waves.enemies_mut()[0].pos = near;
        let skill = TickInput {
            use_skill: true,
            ..Default::default()
        };
        tick(&mut state, &skill, DT);
        assert!(state.waves.enemies()[0].is_destroyed());
        assert_eq!(count(state.events(), "skillUsed"), 1);
        assert!(!state.skill.is_ready());
    }

    #[test]
    fn test_certain_drop_spawns_item() {
        let mut encounters = single_enemy_level(100.0, 50.0);
        encounters[0].enemies[0].drop_rate = Some(1.0);
        let mut state = started(encounters);
        state.waves.enemies_mut()[0].apply_damage(1);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.pickups.items().len(), 1);
        assert_eq!(count(state.events(), "itemDropped"), 1);
    }

    #[test]
    fn test_same_seed_same_drops() {
        let run = |seed: u64| -> Vec<PickupKind> {
            let mut encounters = default_encounters();
            for spawn in &mut encounters[0].enemies {
                spawn.drop_rate = Some(1.0);
            }
            let mut state = GameState::new(seed, encounters, AssetCatalog::new());
            state.start();
            for enemy in state.waves.enemies_mut() {
                enemy.apply_damage(1);
            }
            tick(&mut state, &TickInput::default(), DT);
            state.pickups.items().iter().map(|i| i.kind).collect()
        };
        assert_eq!(run(99), run(99));
        assert_eq!(run(99).len(), 5);
    }

    #[test]
    fn test_boss_area_attack_reaches_player() {
        let mut state = GameState::new(
            1,
            vec![EncounterDescriptor {
                level: 1,
                enemies: Vec::new(),
                boss: Some(crate::sim::encounter::BossSpawn {
                    x: 400.0,
                    y: 200.0,
                    hp: Some(10),
                    speed: Some(0.0),
                    attack_cooldown: Some(DT),
                }),
            }],
            AssetCatalog::new(),
        );
        state.start();
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(count(state.events(), "bossSkill"), 1);
        assert_eq!(count(state.events(), "areaHit"), 1);
        assert_eq!(state.player.hp(), PLAYER_MAX_HP - 1);
    }
}
