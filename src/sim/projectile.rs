//! Projectile spawning, movement and deferred removal
//!
//! `destroy` flags a projectile immediately, which makes it inert for
//! collisions. The entry stays in the active list while its fade plays and
//! is spliced out by `update` once the fade finishes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Hitbox, rect_circle_overlap};
use crate::assets::{AssetCatalog, SpriteInfo};
use crate::consts::*;
use crate::{aim_degrees, deg_to_rad, heading_vector};

/// Who fired a projectile; decides what it can hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
    Boss,
}

impl Faction {
    /// Player shots hit enemies; everything else hits the player
    #[inline]
    pub fn targets_player(self) -> bool {
        !matches!(self, Faction::Player)
    }
}

/// Player bullet coloring, switched by color pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletStyle {
    #[default]
    Standard,
    Blue,
    Violet,
}

/// Player volley layout per power level: (dx, dy, heading degrees)
const PLAYER_FAN: [&[(f32, f32, f32)]; PLAYER_MAX_POWER as usize] = [
    &[(0.0, -20.0, -90.0)],
    &[(-10.0, -20.0, -90.0), (10.0, -20.0, -90.0)],
    &[(-20.0, -20.0, -90.0), (0.0, -20.0, -90.0), (20.0, -20.0, -90.0)],
    &[(0.0, -20.0, -90.0), (-10.0, -20.0, -110.0), (10.0, -20.0, -70.0)],
    &[
        (-5.0, -20.0, -90.0),
        (5.0, -20.0, -90.0),
        (-15.0, -15.0, -120.0),
        (15.0, -15.0, -60.0),
    ],
    &[
        (0.0, -20.0, -90.0),
        (-10.0, -20.0, -100.0),
        (10.0, -20.0, -80.0),
        (-20.0, -15.0, -120.0),
        (20.0, -15.0, -60.0),
    ],
];

/// Volley layout for a power level (clamped to 1..=6)
pub fn player_fan(power_level: u32) -> &'static [(f32, f32, f32)] {
    let idx = power_level.clamp(1, PLAYER_MAX_POWER) as usize - 1;
    PLAYER_FAN[idx]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Radians, screen space (+y down)
    pub heading: f32,
    pub speed: f32,
    pub damage: u32,
    pub faction: Faction,
    /// Visual level (player bullets), also scales damage
    pub level: u32,
    pub style: BulletStyle,
    pub sprite: SpriteInfo,
    pub hitbox: Hitbox,
    destroyed: bool,
    /// Remaining fade after destruction
    fade_ms: f32,
}

impl Projectile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        origin: Vec2,
        heading_degrees: f32,
        faction: Faction,
        damage: u32,
        speed: f32,
        level: u32,
        sprite: SpriteInfo,
    ) -> Self {
        let level = level.max(1);
        Self {
            id,
            pos: origin,
            heading: deg_to_rad(heading_degrees),
            speed,
            damage: damage.saturating_mul(level.div_ceil(2)),
            faction,
            level,
            style: BulletStyle::Standard,
            sprite,
            hitbox: Hitbox::from_sprite(sprite.width, sprite.height),
            destroyed: false,
            fade_ms: 0.0,
        }
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Move one step along the heading
    pub fn advance(&mut self) {
        if self.destroyed {
            return;
        }
        self.pos += heading_vector(self.heading) * self.speed;
        self.hitbox = Hitbox::from_sprite(self.sprite.width, self.sprite.height);
    }

    /// Hit test against a circular target. Always false once destroyed.
    pub fn overlaps(&self, target: Vec2, radius: f32) -> bool {
        if self.destroyed {
            return false;
        }
        rect_circle_overlap(self.pos, self.hitbox, target, radius)
    }

    /// Flag as destroyed and start the fade. Returns false if already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.fade_ms = PROJECTILE_FADE_MS;
        true
    }

    /// Fade progress 0..1 for rendering the burst
    pub fn fade_progress(&self) -> f32 {
        if !self.destroyed {
            return 0.0;
        }
        1.0 - (self.fade_ms / PROJECTILE_FADE_MS).clamp(0.0, 1.0)
    }

    fn out_of_bounds(&self, width: f32, height: f32, margin: f32) -> bool {
        self.pos.x < -margin
            || self.pos.x > width + margin
            || self.pos.y < -margin
            || self.pos.y > height + margin
    }
}

/// Owns every live projectile
#[derive(Debug, Clone, Default)]
pub struct ProjectileManager {
    projectiles: Vec<Projectile>,
    next_id: u32,
    player_style: BulletStyle,
    catalog: AssetCatalog,
}

impl ProjectileManager {
    pub fn new(catalog: AssetCatalog) -> Self {
        Self {
            projectiles: Vec::new(),
            next_id: 1,
            player_style: BulletStyle::Standard,
            catalog,
        }
    }

    fn sprite_for(&self, faction: Faction, level: u32) -> SpriteInfo {
        let mut sprite = match faction {
            Faction::Player => {
                let key = format!("bullet_player_{}", level);
                let sprite = self.catalog.sprite(&key);
                if sprite.placeholder {
                    self.catalog.sprite("bullet_player")
                } else {
                    sprite
                }
            }
            Faction::Enemy => self.catalog.sprite("bullet_enemy"),
            Faction::Boss => self.catalog.sprite("bullet_boss"),
        };
        if faction == Faction::Player {
            match self.player_style {
                BulletStyle::Standard => {}
                BulletStyle::Blue => sprite.tint = 0x3399FF,
                BulletStyle::Violet => sprite.tint = 0x9933FF,
            }
        }
        sprite
    }

    /// Create and register one projectile. Returns its id.
    pub fn spawn(
        &mut self,
        origin: Vec2,
        heading_degrees: f32,
        faction: Faction,
        damage: u32,
        speed: f32,
        level: u32,
    ) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        let sprite = self.sprite_for(faction, level);
        let mut projectile =
            Projectile::new(id, origin, heading_degrees, faction, damage, speed, level, sprite);
        if faction == Faction::Player {
            projectile.style = self.player_style;
        }
        self.projectiles.push(projectile);
        id
    }

    /// Player volley for the current power level. Returns the new ids.
    pub fn fire_player(&mut self, player_pos: Vec2, power_level: u32) -> Vec<u32> {
        let level = power_level.clamp(1, PLAYER_MAX_POWER);
        player_fan(level)
            .iter()
            .map(|&(dx, dy, heading)| {
                self.spawn(
                    player_pos + Vec2::new(dx, dy),
                    heading,
                    Faction::Player,
                    PROJECTILE_DAMAGE,
                    PROJECTILE_SPEED,
                    level,
                )
            })
            .collect()
    }

    /// Single enemy shot aimed at `target`
    pub fn fire_aimed(&mut self, origin: Vec2, target: Vec2) -> u32 {
        self.spawn(
            origin,
            aim_degrees(origin, target),
            Faction::Enemy,
            PROJECTILE_DAMAGE,
            PROJECTILE_SPEED,
            1,
        )
    }

    /// Boss ring of evenly spaced shots
    pub fn fire_burst(&mut self, origin: Vec2) -> Vec<u32> {
        (0..BOSS_BURST_COUNT)
            .map(|i| {
                let heading = i as f32 * 360.0 / BOSS_BURST_COUNT as f32;
                self.spawn(
                    origin,
                    heading,
                    Faction::Boss,
                    BOSS_PROJECTILE_DAMAGE,
                    BOSS_PROJECTILE_SPEED,
                    1,
                )
            })
            .collect()
    }

    /// Move every live projectile one step
    pub fn advance(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.advance();
        }
    }

    /// Destroy projectiles more than `margin` outside the screen
    pub fn cull_out_of_bounds(&mut self, width: f32, height: f32, margin: f32) {
        for projectile in &mut self.projectiles {
            if !projectile.destroyed && projectile.out_of_bounds(width, height, margin) {
                projectile.destroy();
            }
        }
    }

    /// Destroy by id. Idempotent; false if unknown or already destroyed.
    pub fn destroy(&mut self, id: u32) -> bool {
        self.projectiles
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.destroy())
            .unwrap_or(false)
    }

    /// Advance fades and drop projectiles whose fade has finished.
    /// Returns how many were removed.
    pub fn update(&mut self, dt_ms: f32) -> usize {
        for projectile in self.projectiles.iter_mut().filter(|p| p.destroyed) {
            projectile.fade_ms -= dt_ms;
        }
        let before = self.projectiles.len();
        self.projectiles
            .retain(|p| !(p.destroyed && p.fade_ms <= 0.0));
        before - self.projectiles.len()
    }

    /// Every registered projectile, including destroyed ones still fading
    pub fn active(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub(crate) fn active_mut(&mut self) -> &mut [Projectile] {
        &mut self.projectiles
    }

    /// Asset lookup shared with the renderer
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn player_style(&self) -> BulletStyle {
        self.player_style
    }

    /// Style for player projectiles spawned from now on
    pub fn set_player_style(&mut self, style: BulletStyle) {
        self.player_style = style;
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headings_deg(mgr: &ProjectileManager) -> Vec<f32> {
        mgr.active()
            .iter()
            .map(|p| p.heading.to_degrees().round())
            .collect()
    }

    #[test]
    fn test_level_one_single_shot_up() {
        let mut mgr = ProjectileManager::default();
        let ids = mgr.fire_player(Vec2::new(400.0, 500.0), 1);
        assert_eq!(ids.len(), 1);
        assert_eq!(headings_deg(&mgr), vec![-90.0]);
        assert_eq!(mgr.active()[0].pos, Vec2::new(400.0, 480.0));
    }

    #[test]
    fn test_level_four_fan() {
        let mut mgr = ProjectileManager::default();
        let ids = mgr.fire_player(Vec2::new(400.0, 500.0), 4);
        assert_eq!(ids.len(), 3);
        assert_eq!(headings_deg(&mgr), vec![-90.0, -110.0, -70.0]);
    }

    #[test]
    fn test_fan_counts_per_level() {
        let counts: Vec<usize> = (1..=8).map(|lvl| player_fan(lvl).len()).collect();
        assert_eq!(counts, vec![1, 2, 3, 3, 4, 5, 5, 5]);
        assert_eq!(player_fan(0).len(), 1);
    }

    #[test]
    fn test_fan_is_symmetric() {
        for level in 1..=PLAYER_MAX_POWER {
            let fan = player_fan(level);
            let sum: f32 = fan.iter().map(|&(_, _, h)| h + 90.0).sum();
            assert!(sum.abs() < 1e-4, "level {} fan not symmetric", level);
        }
    }

    #[test]
    fn test_damage_scales_with_level() {
        let mut mgr = ProjectileManager::default();
        mgr.fire_player(Vec2::ZERO, 1);
        mgr.fire_player(Vec2::ZERO, 3);
        mgr.fire_player(Vec2::ZERO, 6);
        let damages: Vec<u32> = mgr.active().iter().map(|p| p.damage).collect();
        assert_eq!(damages[0], 1);
        assert!(damages[1..4].iter().all(|&d| d == 2));
        assert!(damages[4..].iter().all(|&d| d == 3));
    }

    #[test]
    fn test_huge_level_saturates_damage() {
        let mut mgr = ProjectileManager::default();
        mgr.spawn(Vec2::ZERO, -90.0, Faction::Player, 3, 5.0, u32::MAX);
        assert_eq!(mgr.active()[0].damage, u32::MAX);
    }

    #[test]
    fn test_advance_moves_along_heading() {
        let mut mgr = ProjectileManager::default();
        mgr.spawn(Vec2::new(100.0, 100.0), 0.0, Faction::Enemy, 1, 5.0, 1);
        mgr.advance();
        let p = &mgr.active()[0];
        assert!((p.pos.x - 105.0).abs() < 1e-4);
        assert!((p.pos.y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_destroy_idempotent_and_inert() {
        let mut mgr = ProjectileManager::default();
        let id = mgr.spawn(Vec2::new(100.0, 100.0), -90.0, Faction::Player, 1, 5.0, 1);
        assert!(mgr.active()[0].overlaps(Vec2::new(100.0, 100.0), 20.0));

        assert!(mgr.destroy(id));
        assert!(!mgr.destroy(id));
        let p = &mgr.active()[0];
        assert!(p.is_destroyed());
        assert!(!p.overlaps(Vec2::new(100.0, 100.0), 20.0));

        // Destroyed projectiles stay put
        let before = p.pos;
        mgr.advance();
        assert_eq!(mgr.active()[0].pos, before);
    }

    #[test]
    fn test_removal_after_fade() {
        let mut mgr = ProjectileManager::default();
        let id = mgr.spawn(Vec2::ZERO, 0.0, Faction::Enemy, 1, 5.0, 1);
        mgr.spawn(Vec2::ZERO, 0.0, Faction::Enemy, 1, 5.0, 1);
        mgr.destroy(id);

        assert_eq!(mgr.update(299.0), 0);
        assert_eq!(mgr.active().len(), 2);
        assert_eq!(mgr.update(1.0), 1);
        assert_eq!(mgr.active().len(), 1);
        assert_ne!(mgr.active()[0].id, id);
    }

    #[test]
    fn test_cull_out_of_bounds() {
        let mut mgr = ProjectileManager::default();
        mgr.spawn(Vec2::new(400.0, -49.0), -90.0, Faction::Player, 1, 0.0, 1);
        mgr.spawn(Vec2::new(400.0, -51.0), -90.0, Faction::Player, 1, 0.0, 1);
        mgr.spawn(Vec2::new(851.0, 300.0), 0.0, Faction::Enemy, 1, 0.0, 1);
        mgr.cull_out_of_bounds(800.0, 600.0, 50.0);
        let destroyed: Vec<bool> = mgr.active().iter().map(|p| p.is_destroyed()).collect();
        assert_eq!(destroyed, vec![false, true, true]);
    }

    #[test]
    fn test_boss_burst() {
        let mut mgr = ProjectileManager::default();
        let ids = mgr.fire_burst(Vec2::new(300.0, 150.0));
        assert_eq!(ids.len(), 8);
        assert!(mgr.active().iter().all(|p| p.faction == Faction::Boss && p.damage == 2));
        assert_eq!(headings_deg(&mgr)[2], 90.0);
    }

    #[test]
    fn test_aimed_shot() {
        let mut mgr = ProjectileManager::default();
        mgr.fire_aimed(Vec2::new(0.0, 0.0), Vec2::new(0.0, 100.0));
        assert_eq!(headings_deg(&mgr), vec![90.0]);
        assert!(mgr.active()[0].faction.targets_player());
    }

    #[test]
    fn test_player_style_applies_to_new_shots() {
        let mut mgr = ProjectileManager::default();
        mgr.fire_player(Vec2::ZERO, 1);
        mgr.set_player_style(BulletStyle::Violet);
        mgr.fire_player(Vec2::ZERO, 1);
        assert_eq!(mgr.active()[0].style, BulletStyle::Standard);
        assert_eq!(mgr.active()[1].style, BulletStyle::Violet);
        assert_eq!(mgr.active()[1].sprite.tint, 0x9933FF);
    }
}
