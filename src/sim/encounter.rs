//! Level data and the live enemy set
//!
//! Level data is a JSON array of encounters. When it is missing or invalid
//! the built-in three-level set is used instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorIntent, ActorTag};
use super::event::GameEvent;
use crate::assets::AssetCatalog;
use crate::consts::*;
use crate::error::GameError;

/// One basic enemy in an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub hp: Option<u32>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub drop_rate: Option<f32>,
    #[serde(default)]
    pub target_x: Option<f32>,
    #[serde(default)]
    pub target_y: Option<f32>,
}

impl EnemySpawn {
    /// Spawn at (x, y) walking to (tx, ty)
    pub fn at(x: f32, y: f32, tx: f32, ty: f32) -> Self {
        Self {
            x,
            y,
            hp: None,
            speed: None,
            drop_rate: None,
            target_x: Some(tx),
            target_y: Some(ty),
        }
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = Some(hp);
        self
    }

    fn build(&self, id: u32) -> Actor {
        let pos = Vec2::new(self.x, self.y);
        let target = Vec2::new(self.target_x.unwrap_or(self.x), self.target_y.unwrap_or(self.y));
        Actor::basic_enemy(
            id,
            pos,
            self.hp.unwrap_or(ENEMY_HP),
            self.speed.unwrap_or(ENEMY_SPEED),
            self.drop_rate.unwrap_or(ENEMY_DROP_RATE),
            target,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossSpawn {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub hp: Option<u32>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub attack_cooldown: Option<f32>,
}

impl BossSpawn {
    fn build(&self, id: u32) -> Actor {
        Actor::boss(
            id,
            Vec2::new(self.x, self.y),
            self.hp.unwrap_or(BOSS_HP),
            self.speed.unwrap_or(BOSS_SPEED),
            self.attack_cooldown.unwrap_or(BOSS_SKILL_COOLDOWN_MS),
        )
    }
}

/// Enemy and boss composition for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterDescriptor {
    pub level: u32,
    #[serde(alias = "creps", default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub boss: Option<BossSpawn>,
}

/// Parse level JSON into encounters sorted by level number
pub fn parse_encounters(json: &str) -> Result<Vec<EncounterDescriptor>, GameError> {
    let mut encounters: Vec<EncounterDescriptor> = serde_json::from_str(json)?;
    if encounters.is_empty() {
        return Err(GameError::EmptyLevelData);
    }
    encounters.sort_by_key(|e| e.level);
    Ok(encounters)
}

/// Parse level JSON, falling back to the built-in set on any failure
pub fn load_or_default(json: Option<&str>) -> Vec<EncounterDescriptor> {
    let Some(json) = json else {
        log::warn!("No level data available, using built-in levels");
        return default_encounters();
    };
    match parse_encounters(json) {
        Ok(encounters) => {
            log::info!("Loaded {} levels", encounters.len());
            encounters
        }
        Err(e) => {
            log::warn!("Failed to load levels ({}), using built-in levels", e);
            default_encounters()
        }
    }
}

/// Built-in three-level set
pub fn default_encounters() -> Vec<EncounterDescriptor> {
    let row = |y: f32, ty: f32, xs: &[f32], hp: Option<u32>| -> Vec<EnemySpawn> {
        xs.iter()
            .map(|&x| {
                let spawn = EnemySpawn::at(x, y, x, ty);
                match hp {
                    Some(hp) => spawn.with_hp(hp),
                    None => spawn,
                }
            })
            .collect()
    };
    let front = [100.0, 200.0, 300.0, 400.0, 500.0];
    let back = [150.0, 250.0, 350.0, 450.0];

    let mut second = row(100.0, 300.0, &front, Some(2));
    second.extend(row(150.0, 350.0, &back, Some(2)));

    vec![
        EncounterDescriptor {
            level: 1,
            enemies: row(100.0, 300.0, &front, None),
            boss: None,
        },
        EncounterDescriptor {
            level: 2,
            enemies: second,
            boss: None,
        },
        EncounterDescriptor {
            level: 3,
            enemies: row(100.0, 300.0, &front, Some(3)),
            boss: Some(BossSpawn {
                x: 300.0,
                y: 150.0,
                hp: Some(10),
                speed: Some(1.5),
                attack_cooldown: None,
            }),
        },
    ]
}

/// Owns the live enemy set for the current encounter
#[derive(Debug, Clone)]
pub struct WaveController {
    encounters: Vec<EncounterDescriptor>,
    current_level: u32,
    enemies: Vec<Actor>,
    boss_id: Option<u32>,
    level_complete: bool,
    next_id: u32,
    catalog: AssetCatalog,
}

impl WaveController {
    /// Actor ids start at `first_id` so they never collide with the player's
    pub fn new(encounters: Vec<EncounterDescriptor>, catalog: AssetCatalog, first_id: u32) -> Self {
        Self {
            encounters,
            current_level: 0,
            enemies: Vec::new(),
            boss_id: None,
            level_complete: false,
            next_id: first_id,
            catalog,
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the live set with level `n`. False if no such level exists.
    pub fn load_level(&mut self, n: u32, events: &mut Vec<GameEvent>) -> bool {
        self.clear();
        self.current_level = n;

        let Some(encounter) = self.encounters.iter().find(|e| e.level == n).cloned() else {
            log::error!("Level {} not found", n);
            return false;
        };

        for spawn in &encounter.enemies {
            let id = self.allocate_id();
            let mut enemy = spawn
                .build(id)
                .with_animations(self.catalog.animations(ActorTag::BasicEnemy.asset_key()));
            enemy.start_moving();
            self.enemies.push(enemy);
        }

        if let Some(boss) = &encounter.boss {
            let id = self.allocate_id();
            let boss = boss
                .build(id)
                .with_animations(self.catalog.animations(ActorTag::Boss.asset_key()));
            self.boss_id = Some(id);
            self.enemies.push(boss);
        }

        self.level_complete = false;
        log::info!(
            "Level {} loaded: {} enemies{}",
            n,
            self.enemies.len(),
            if self.boss_id.is_some() { " incl. boss" } else { "" }
        );
        events.push(GameEvent::LevelLoaded { level: n });

        // Nothing to fight: the level is already clear
        self.check_complete(events);
        true
    }

    /// Load the next level, or announce the end of the game
    pub fn next_level(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let next = self.current_level + 1;
        if !self.encounters.iter().any(|e| e.level == next) {
            self.clear();
            log::info!("All {} levels cleared", self.current_level);
            events.push(GameEvent::GameComplete);
            return false;
        }
        self.load_level(next, events)
    }

    /// Per-frame AI for every live enemy
    pub fn advance(&mut self, dt_ms: f32, player_pos: Vec2, intents: &mut Vec<ActorIntent>) {
        for enemy in &mut self.enemies {
            enemy.advance(dt_ms, player_pos, intents);
        }
    }

    /// Advance state timers; destruction notifications land in `events`
    pub fn update_timers(&mut self, dt_ms: f32, events: &mut Vec<GameEvent>) {
        for enemy in &mut self.enemies {
            enemy.update_timers(dt_ms, events);
        }
    }

    /// Remove enemies whose destruction notification has fired
    pub fn cleanup(&mut self, events: &mut Vec<GameEvent>) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|e| !e.is_removable());
        let removed = before - self.enemies.len();

        if let Some(boss_id) = self.boss_id
            && !self.enemies.iter().any(|e| e.id == boss_id)
        {
            self.boss_id = None;
        }

        if removed > 0 {
            self.check_complete(events);
        }
        removed
    }

    fn check_complete(&mut self, events: &mut Vec<GameEvent>) {
        if self.enemies.is_empty() && !self.level_complete {
            self.level_complete = true;
            log::info!("Level {} complete", self.current_level);
            events.push(GameEvent::LevelComplete {
                level: self.current_level,
            });
        }
    }

    fn clear(&mut self) {
        self.enemies.clear();
        self.boss_id = None;
    }

    pub fn enemies(&self) -> &[Actor] {
        &self.enemies
    }

    pub(crate) fn enemies_mut(&mut self) -> &mut [Actor] {
        &mut self.enemies
    }

    pub fn boss(&self) -> Option<&Actor> {
        let id = self.boss_id?;
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn level_count(&self) -> usize {
        self.encounters.len()
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_complete(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelComplete { .. }))
            .count()
    }

    fn controller() -> WaveController {
        WaveController::new(default_encounters(), AssetCatalog::new(), 1)
    }

    #[test]
    fn test_load_level_one() {
        let mut waves = controller();
        let mut events = Vec::new();
        assert!(waves.load_level(1, &mut events));
        assert_eq!(waves.enemies().len(), 5);
        assert!(waves.boss().is_none());
        assert_eq!(events, vec![GameEvent::LevelLoaded { level: 1 }]);
    }

    #[test]
    fn test_level_three_has_boss() {
        let mut waves = controller();
        let mut events = Vec::new();
        waves.load_level(3, &mut events);
        assert_eq!(waves.enemies().len(), 6);
        let boss = waves.boss().expect("boss present");
        assert_eq!(boss.hp(), 10);
        assert_eq!(boss.tag(), ActorTag::Boss);
    }

    #[test]
    fn test_complete_fires_once_after_empty() {
        let mut waves = controller();
        let mut events = Vec::new();
        waves.load_level(1, &mut events);
        events.clear();

        let ids: Vec<u32> = waves.enemies().iter().map(|e| e.id).collect();
        for (i, _) in ids.iter().enumerate() {
            waves.enemies_mut()[i].apply_damage(1);
        }

        // Destroyed but notifications pending: still not complete
        waves.update_timers(500.0, &mut events);
        waves.cleanup(&mut events);
        assert_eq!(count_complete(&events), 0);
        assert_eq!(waves.enemies().len(), 5);

        waves.update_timers(500.0, &mut events);
        waves.cleanup(&mut events);
        assert!(waves.enemies().is_empty());
        assert_eq!(count_complete(&events), 1);
        assert!(waves.is_level_complete());

        waves.update_timers(500.0, &mut events);
        waves.cleanup(&mut events);
        assert_eq!(count_complete(&events), 1);
    }

    #[test]
    fn test_partial_clear_not_complete() {
        let mut waves = controller();
        let mut events = Vec::new();
        waves.load_level(1, &mut events);
        waves.enemies_mut()[0].apply_damage(1);
        waves.update_timers(DESTRUCTION_DELAY_MS, &mut events);
        assert_eq!(waves.cleanup(&mut events), 1);
        assert_eq!(waves.enemies().len(), 4);
        assert_eq!(count_complete(&events), 0);
    }

    #[test]
    fn test_next_level_and_game_complete() {
        let mut waves = controller();
        let mut events = Vec::new();
        waves.load_level(1, &mut events);
        assert!(waves.next_level(&mut events));
        assert_eq!(waves.current_level(), 2);
        assert_eq!(waves.enemies().len(), 9);
        assert!(waves.next_level(&mut events));
        assert!(!waves.next_level(&mut events));
        assert_eq!(events.last(), Some(&GameEvent::GameComplete));
    }

    #[test]
    fn test_reload_clears_enemies() {
        let mut waves = controller();
        let mut events = Vec::new();
        waves.load_level(3, &mut events);
        waves.load_level(1, &mut events);
        assert_eq!(waves.enemies().len(), 5);
        assert!(waves.boss().is_none());
    }

    #[test]
    fn test_parse_camel_case() {
        let json = r#"[
            {"level": 2, "creps": [{"x": 10, "y": 20}]},
            {"level": 1, "creps": [{"x": 1, "y": 2, "hp": 4, "dropRate": 0.5, "targetX": 5, "targetY": 6}],
             "boss": {"x": 300, "y": 150, "attackCooldown": 4000}}
        ]"#;
        let encounters = parse_encounters(json).expect("valid json");
        assert_eq!(encounters[0].level, 1);
        let spawn = &encounters[0].enemies[0];
        assert_eq!(spawn.hp, Some(4));
        assert_eq!(spawn.drop_rate, Some(0.5));
        assert_eq!(spawn.target_x, Some(5.0));
        assert_eq!(
            encounters[0].boss.as_ref().and_then(|b| b.attack_cooldown),
            Some(4000.0)
        );
        assert_eq!(encounters[1].enemies[0].hp, None);
    }

    #[test]
    fn test_shipped_levels_parse() {
        let encounters = parse_encounters(include_str!("../../assets/levels/levels.json"))
            .expect("shipped levels parse");
        assert_eq!(encounters.len(), 3);
        assert_eq!(encounters[1].enemies.len(), 9);
        assert!(encounters[2].boss.is_some());
    }

    #[test]
    fn test_fallback_to_defaults() {
        assert_eq!(load_or_default(None).len(), 3);
        assert_eq!(load_or_default(Some("not json")).len(), 3);
        assert_eq!(load_or_default(Some("[]")).len(), 3);
        assert!(matches!(parse_encounters("[]"), Err(GameError::EmptyLevelData)));
    }

    #[test]
    fn test_missing_target_stays_in_place() {
        let spawn = EnemySpawn {
            x: 10.0,
            y: 20.0,
            hp: None,
            speed: None,
            drop_rate: None,
            target_x: None,
            target_y: None,
        };
        let enemy = spawn.build(1);
        assert_eq!(enemy.hp(), ENEMY_HP);
        match &enemy.kind {
            crate::sim::actor::ActorKind::BasicEnemy(data) => {
                assert_eq!(data.target, Vec2::new(10.0, 20.0));
            }
            _ => panic!("expected basic enemy"),
        }
    }
}
