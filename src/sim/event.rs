//! Outbound game notifications
//!
//! The simulation pushes events into a queue during `tick`; the host drains
//! it once per frame and routes them to HUD, audio and score.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::ActorTag;
use super::pickup::PickupKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Destruction delay elapsed; the actor is being removed
    Destroyed { id: u32, tag: ActorTag, pos: Vec2 },
    /// A player projectile hit an enemy or the boss
    BulletHit {
        projectile_id: u32,
        target_id: u32,
        damage: u32,
    },
    /// An enemy or boss projectile hit the player
    PlayerHit { projectile_id: u32, damage: u32 },
    /// The player touched an enemy body
    PlayerCollision { enemy_id: u32 },
    ItemDropped {
        item_id: u32,
        kind: PickupKind,
        pos: Vec2,
    },
    ItemCollected { item_id: u32, kind: PickupKind },
    /// Boss area attack fired
    BossSkill {
        origin: Vec2,
        radius: f32,
        target: Vec2,
    },
    /// The player was inside a boss area attack
    AreaHit { source_id: u32, damage: u32 },
    BossDamaged { hp: u32, max_hp: u32 },
    PlayerLevelChanged { level: u32 },
    LevelLoaded { level: u32 },
    LevelComplete { level: u32 },
    GameComplete,
    /// Player special fired; the host shows the blast effect
    SkillUsed {
        origin: Vec2,
        radius: f32,
        cooldown_ms: f32,
    },
    SkillReady,
    SkillCooldownUpdate { remaining_ms: f32 },
}

impl GameEvent {
    /// Stable event name for host-side routing
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Destroyed { .. } => "destroyed",
            GameEvent::BulletHit { .. } => "bulletHit",
            GameEvent::PlayerHit { .. } => "playerHit",
            GameEvent::PlayerCollision { .. } => "playerCollision",
            GameEvent::ItemDropped { .. } => "itemDropped",
            GameEvent::ItemCollected { .. } => "itemCollected",
            GameEvent::BossSkill { .. } => "bossSkill",
            GameEvent::AreaHit { .. } => "areaHit",
            GameEvent::BossDamaged { .. } => "bossDamaged",
            GameEvent::PlayerLevelChanged { .. } => "playerLevelChanged",
            GameEvent::LevelLoaded { .. } => "levelLoaded",
            GameEvent::LevelComplete { .. } => "levelComplete",
            GameEvent::GameComplete => "gameComplete",
            GameEvent::SkillUsed { .. } => "skillUsed",
            GameEvent::SkillReady => "skillReady",
            GameEvent::SkillCooldownUpdate { .. } => "skillCooldownUpdate",
        }
    }
}
