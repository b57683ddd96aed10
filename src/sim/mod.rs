//! Combat simulation module
//!
//! All gameplay logic lives here. This module stays free of platform code:
//! - Elapsed time is passed in, every wait is a countdown
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - Results leave through the `GameEvent` queue

pub mod actor;
pub mod collision;
pub mod encounter;
pub mod event;
pub mod pickup;
pub mod projectile;
pub mod resolver;
pub mod skill;
pub mod world;

pub use actor::{Actor, ActorKind, ActorState, ActorTag, AreaEffect, DamageOutcome, Direction};
pub use collision::{Hitbox, circles_overlap, rect_circle_overlap};
pub use encounter::{
    BossSpawn, EncounterDescriptor, EnemySpawn, WaveController, default_encounters,
    load_or_default, parse_encounters,
};
pub use event::GameEvent;
pub use pickup::{Pickup, PickupField, PickupKind};
pub use projectile::{BulletStyle, Faction, Projectile, ProjectileManager, player_fan};
pub use resolver::{CombatFrame, resolve_area_effect};
pub use skill::PlayerSkill;
pub use world::{GamePhase, GameState, PLAYER_ID, TickInput, tick};
