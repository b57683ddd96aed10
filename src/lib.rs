//! Nebula Strike - A browser arcade shooter
//!
//! Core modules:
//! - `sim`: Combat simulation (projectiles, actors, collisions, waves)
//! - `assets`: Texture/animation lookup with placeholder fallback
//! - `renderer`: Canvas 2D drawing of a simulation snapshot
//! - `audio`: Procedural sound effects driven by game events
//! - `settings`: Persisted player preferences

pub mod assets;
pub mod audio;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default playfield size (replaced by the canvas size at startup)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Projectiles further than this outside the screen are culled
    pub const CULL_MARGIN: f32 = 50.0;

    /// Collision radii
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const BOSS_RADIUS: f32 = 40.0;

    /// Player defaults
    pub const PLAYER_MAX_HP: u32 = 3;
    pub const PLAYER_STEP: f32 = 2.0; // px per call, per axis
    pub const PLAYER_MAX_POWER: u32 = 6;
    pub const PLAYER_FIRE_INTERVAL_MS: f32 = 250.0;

    /// Actor timers (ms)
    pub const DESTRUCTION_DELAY_MS: f32 = 1000.0;
    pub const INVULNERABLE_MS: f32 = 2000.0;
    pub const LEVEL_UP_MS: f32 = 500.0;

    /// Basic enemy defaults
    pub const ENEMY_HP: u32 = 1;
    pub const ENEMY_SPEED: f32 = 1.0;
    pub const ENEMY_DROP_RATE: f32 = 0.3;
    pub const ENEMY_ARRIVE_DISTANCE: f32 = 5.0;
    pub const ENEMY_FIRE_INTERVAL_MS: f32 = 2500.0;

    /// Boss defaults
    pub const BOSS_HP: u32 = 10;
    pub const BOSS_SPEED: f32 = 1.0;
    pub const BOSS_SKILL_COOLDOWN_MS: f32 = 5000.0;
    pub const BOSS_SKILL_WINDOW_MS: f32 = 1000.0;
    pub const BOSS_SKILL_RADIUS: f32 = 150.0;
    pub const BOSS_FIRE_INTERVAL_MS: f32 = 3000.0;
    pub const BOSS_BURST_COUNT: u32 = 8;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 5.0; // px per call
    pub const PROJECTILE_DAMAGE: u32 = 1;
    pub const BOSS_PROJECTILE_SPEED: f32 = 3.0;
    pub const BOSS_PROJECTILE_DAMAGE: u32 = 2;
    pub const HITBOX_PADDING: f32 = 2.0;
    pub const PROJECTILE_FADE_MS: f32 = 300.0;

    /// Pickups
    pub const PICKUP_FALL_SPEED: f32 = 1.0;

    /// Player special skill
    pub const SKILL_COOLDOWN_MS: f32 = 5000.0;
    pub const SKILL_RADIUS: f32 = 100.0;
    pub const SKILL_BOSS_DAMAGE: u32 = 2;
    pub const SKILL_ENEMY_DAMAGE: u32 = 3;

    /// Pause between a cleared level and loading the next one
    pub const LEVEL_BREATHER_MS: f32 = 2000.0;

    /// Score per kill
    pub const ENEMY_SCORE: u64 = 100;
    pub const BOSS_SCORE: u64 = 1000;
}

/// Degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Unit vector for a heading in radians (screen space, +y down)
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Heading in degrees from `from` toward `to`
#[inline]
pub fn aim_degrees(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}
