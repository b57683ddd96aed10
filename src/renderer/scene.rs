//! Shape generation from simulation state

use glam::Vec2;

use crate::assets::SpriteInfo;
use crate::settings::Settings;
use crate::sim::{ActorState, ActorTag, GameEvent, GameState, PickupKind};

/// RGBA, 0..1
pub type Color = [f32; 4];

/// 0xRRGGBB tint to a color with the given alpha
pub fn tint_color(tint: u32, alpha: f32) -> Color {
    [
        ((tint >> 16) & 0xFF) as f32 / 255.0,
        ((tint >> 8) & 0xFF) as f32 / 255.0,
        (tint & 0xFF) as f32 / 255.0,
        alpha,
    ]
}

/// Flat draw primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled rectangle rotated around its center
    Rect {
        center: Vec2,
        size: Vec2,
        rotation: f32,
        color: Color,
    },
    /// Filled disc
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Circle outline
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
}

/// Short-lived visuals spawned by events (blast rings, hit shake)
#[derive(Debug, Clone, Default)]
pub struct EffectLayer {
    blasts: Vec<Blast>,
    pub shake: f32,
}

#[derive(Debug, Clone)]
struct Blast {
    center: Vec2,
    radius: f32,
    color: Color,
    remaining_ms: f32,
}

const BLAST_MS: f32 = 400.0;

impl EffectLayer {
    /// Spawn visuals for this frame's events
    pub fn absorb(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::BossSkill { origin, radius, .. } => self.blasts.push(Blast {
                    center: *origin,
                    radius: *radius,
                    color: tint_color(0xFF00FF, 0.6),
                    remaining_ms: BLAST_MS,
                }),
                GameEvent::SkillUsed { origin, radius, .. } => self.blasts.push(Blast {
                    center: *origin,
                    radius: *radius,
                    color: tint_color(0x00FFFF, 0.6),
                    remaining_ms: BLAST_MS,
                }),
                GameEvent::PlayerHit { .. }
                | GameEvent::PlayerCollision { .. }
                | GameEvent::AreaHit { .. } => self.shake = self.shake.max(6.0),
                _ => {}
            }
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        for blast in &mut self.blasts {
            blast.remaining_ms -= dt_ms;
        }
        self.blasts.retain(|b| b.remaining_ms > 0.0);

        self.shake *= 0.9;
        if self.shake < 0.1 {
            self.shake = 0.0;
        }
    }

    pub fn len(&self) -> usize {
        self.blasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blasts.is_empty()
    }
}

fn sprite_rect(pos: Vec2, sprite: &SpriteInfo, rotation: f32, alpha: f32) -> Shape {
    Shape::Rect {
        center: pos,
        size: Vec2::new(sprite.width, sprite.height),
        rotation,
        color: tint_color(sprite.tint, alpha),
    }
}

fn actor_alpha(state: ActorState, time_ms: f32) -> f32 {
    match state {
        // Blink while hurt or immune
        ActorState::TakingDamage | ActorState::Invulnerable => {
            if (time_ms / 100.0) as u32 % 2 == 0 { 1.0 } else { 0.3 }
        }
        ActorState::Destroyed => 0.4,
        _ => 1.0,
    }
}

/// Every shape for one frame, back to front
pub fn build_scene(
    state: &GameState,
    effects: &EffectLayer,
    settings: &Settings,
    time_ms: f32,
) -> Vec<Shape> {
    let catalog = state.projectiles.catalog();
    let mut shapes = Vec::with_capacity(
        state.projectiles.active().len() + state.waves.enemies().len() + state.pickups.items().len() + 8,
    );

    for item in state.pickups.items() {
        let sprite = catalog.sprite(item.kind.texture_key());
        shapes.push(sprite_rect(item.pos, &sprite, 0.0, 1.0));
        if item.kind == PickupKind::Heal {
            shapes.push(Shape::Ring {
                center: item.pos,
                radius: sprite.width * 0.6,
                width: 1.0,
                color: tint_color(0xFFFFFF, 0.5),
            });
        }
    }

    for enemy in state.waves.enemies() {
        let sprite = catalog.sprite(enemy.tag().asset_key());
        let alpha = actor_alpha(enemy.state(), time_ms);
        shapes.push(sprite_rect(enemy.pos, &sprite, 0.0, alpha));

        if let Some(skill) = enemy.boss_skill()
            && skill.attacking
        {
            shapes.push(Shape::Ring {
                center: enemy.pos,
                radius: skill.radius,
                width: 3.0,
                color: tint_color(0xFF00FF, 0.4),
            });
        }
        if settings.show_hitboxes {
            shapes.push(Shape::Ring {
                center: enemy.pos,
                radius: enemy.radius,
                width: 1.0,
                color: tint_color(0x00FF00, 0.8),
            });
        }
    }

    let player = &state.player;
    if !player.is_removable() {
        let sprite = catalog.sprite(ActorTag::Player.asset_key());
        let alpha = actor_alpha(player.state(), time_ms);
        shapes.push(sprite_rect(player.pos, &sprite, 0.0, alpha));
        if player.state() == ActorState::LevelingUp {
            shapes.push(Shape::Ring {
                center: player.pos,
                radius: player.radius + 6.0,
                width: 2.0,
                color: tint_color(0x00FF00, 0.8),
            });
        }
        if settings.show_hitboxes {
            shapes.push(Shape::Ring {
                center: player.pos,
                radius: player.radius,
                width: 1.0,
                color: tint_color(0x00FF00, 0.8),
            });
        }
    }

    for projectile in state.projectiles.active() {
        if projectile.is_destroyed() {
            // Expanding, fading burst
            let t = projectile.fade_progress();
            shapes.push(Shape::Circle {
                center: projectile.pos,
                radius: projectile.sprite.width * (0.5 + t),
                color: tint_color(projectile.sprite.tint, 1.0 - t),
            });
            continue;
        }
        // Sprites point up at heading -90 degrees
        let rotation = projectile.heading + std::f32::consts::FRAC_PI_2;
        shapes.push(sprite_rect(projectile.pos, &projectile.sprite, rotation, 1.0));
    }

    if !settings.reduced_motion {
        for blast in &effects.blasts {
            let t = 1.0 - blast.remaining_ms / BLAST_MS;
            let mut color = blast.color;
            color[3] *= 1.0 - t;
            shapes.push(Shape::Ring {
                center: blast.center,
                radius: blast.radius * (0.3 + 0.7 * t),
                width: 4.0,
                color,
            });
        }
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCatalog;
    use crate::sim::{TickInput, default_encounters, tick};

    fn state() -> GameState {
        let mut state = GameState::new(3, default_encounters(), AssetCatalog::new());
        state.start();
        state
    }

    #[test]
    fn test_scene_counts() {
        let mut state = state();
        tick(
            &mut state,
            &TickInput {
                fire: true,
                ..Default::default()
            },
            16.0,
        );
        let shapes = build_scene(&state, &EffectLayer::default(), &Settings::default(), 0.0);
        // 5 enemies + player + 1 shot
        assert_eq!(shapes.len(), 7);
    }

    #[test]
    fn test_hitbox_overlay() {
        let state = state();
        let settings = Settings {
            show_hitboxes: true,
            ..Default::default()
        };
        let shapes = build_scene(&state, &EffectLayer::default(), &settings, 0.0);
        let rings = shapes.iter().filter(|s| matches!(s, Shape::Ring { .. })).count();
        assert_eq!(rings, 6);
    }

    #[test]
    fn test_blasts_expire() {
        let mut effects = EffectLayer::default();
        effects.absorb(&[GameEvent::SkillUsed {
            origin: Vec2::ZERO,
            radius: 100.0,
            cooldown_ms: 5000.0,
        }]);
        assert_eq!(effects.len(), 1);
        effects.update(BLAST_MS);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_hit_shakes() {
        let mut effects = EffectLayer::default();
        effects.absorb(&[GameEvent::PlayerHit {
            projectile_id: 1,
            damage: 1,
        }]);
        assert!(effects.shake > 0.0);
        for _ in 0..100 {
            effects.update(16.0);
        }
        assert_eq!(effects.shake, 0.0);
    }

    #[test]
    fn test_tint_color() {
        assert_eq!(tint_color(0xFF0000, 0.5), [1.0, 0.0, 0.0, 0.5]);
    }
}
