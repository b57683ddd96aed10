//! Player special ability: an instant radial blast on a cooldown

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorTag, DamageOutcome};
use super::collision::within_radius;
use super::event::GameEvent;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSkill {
    pub cooldown_ms: f32,
    pub radius: f32,
    pub boss_damage: u32,
    pub enemy_damage: u32,
    remaining_ms: f32,
}

impl Default for PlayerSkill {
    fn default() -> Self {
        Self {
            cooldown_ms: SKILL_COOLDOWN_MS,
            radius: SKILL_RADIUS,
            boss_damage: SKILL_BOSS_DAMAGE,
            enemy_damage: SKILL_ENEMY_DAMAGE,
            remaining_ms: 0.0,
        }
    }
}

impl PlayerSkill {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    /// Cooldown left in ms (0 when ready)
    pub fn remaining(&self) -> f32 {
        self.remaining_ms.max(0.0)
    }

    /// Fire the blast around `origin`. Returns false while cooling down.
    pub fn activate(
        &mut self,
        origin: Vec2,
        enemies: &mut [Actor],
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !self.is_ready() {
            return false;
        }

        let mut hits = 0;
        for enemy in enemies.iter_mut() {
            if enemy.is_destroyed() || !within_radius(origin, self.radius, enemy.pos) {
                continue;
            }
            let is_boss = enemy.tag() == ActorTag::Boss;
            let damage = if is_boss {
                self.boss_damage
            } else {
                self.enemy_damage
            };
            if enemy.apply_damage(damage) == DamageOutcome::Ignored {
                continue;
            }
            hits += 1;
            if is_boss {
                events.push(GameEvent::BossDamaged {
                    hp: enemy.hp(),
                    max_hp: enemy.max_hp(),
                });
            }
        }

        log::debug!("Skill fired at ({:.0}, {:.0}), {} hit", origin.x, origin.y, hits);
        self.remaining_ms = self.cooldown_ms;
        events.push(GameEvent::SkillUsed {
            origin,
            radius: self.radius,
            cooldown_ms: self.cooldown_ms,
        });
        true
    }

    /// Count down the cooldown, announcing progress and re-arming
    pub fn update(&mut self, dt_ms: f32, events: &mut Vec<GameEvent>) {
        if self.is_ready() {
            return;
        }
        self.remaining_ms -= dt_ms;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
            events.push(GameEvent::SkillReady);
        } else {
            events.push(GameEvent::SkillCooldownUpdate {
                remaining_ms: self.remaining_ms,
            });
        }
    }

    pub fn reset(&mut self) {
        self.remaining_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crowd() -> Vec<Actor> {
        vec![
            Actor::basic_enemy(1, Vec2::new(50.0, 0.0), 5, 1.0, 0.0, Vec2::ZERO),
            Actor::basic_enemy(2, Vec2::new(150.0, 0.0), 5, 1.0, 0.0, Vec2::ZERO),
            Actor::boss(3, Vec2::new(0.0, 90.0), 10, 1.0, 5000.0),
        ]
    }

    #[test]
    fn test_damages_only_within_radius() {
        let mut skill = PlayerSkill::new();
        let mut enemies = crowd();
        let mut events = Vec::new();

        assert!(skill.activate(Vec2::ZERO, &mut enemies, &mut events));
        assert_eq!(enemies[0].hp(), 2);
        assert_eq!(enemies[1].hp(), 5);
        assert_eq!(enemies[2].hp(), 8);
        assert!(events.contains(&GameEvent::BossDamaged { hp: 8, max_hp: 10 }));
        assert!(matches!(events.last(), Some(GameEvent::SkillUsed { .. })));
    }

    #[test]
    fn test_blocked_during_cooldown() {
        let mut skill = PlayerSkill::new();
        let mut enemies = crowd();
        let mut events = Vec::new();

        skill.activate(Vec2::ZERO, &mut enemies, &mut events);
        assert!(!skill.is_ready());
        assert!(!skill.activate(Vec2::ZERO, &mut enemies, &mut events));
        assert_eq!(enemies[0].hp(), 2);
    }

    #[test]
    fn test_cooldown_rearms_with_ready_event() {
        let mut skill = PlayerSkill::new();
        let mut events = Vec::new();
        skill.activate(Vec2::ZERO, &mut [], &mut events);
        events.clear();

        skill.update(4000.0, &mut events);
        assert_eq!(events, vec![GameEvent::SkillCooldownUpdate { remaining_ms: 1000.0 }]);
        assert_eq!(skill.remaining(), 1000.0);

        skill.update(1000.0, &mut events);
        assert_eq!(events.last(), Some(&GameEvent::SkillReady));
        assert!(skill.is_ready());

        // Ready skills stay quiet
        let count = events.len();
        skill.update(16.0, &mut events);
        assert_eq!(events.len(), count);
    }

    #[test]
    fn test_skips_destroyed_enemies() {
        let mut skill = PlayerSkill::new();
        let mut enemies = crowd();
        enemies[0].apply_damage(5);
        let mut events = Vec::new();
        skill.activate(Vec2::ZERO, &mut enemies, &mut events);
        assert_eq!(enemies[0].hp(), 0);
    }
}
